use crate::{
    ast::{Expr, LiteralValue},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Evaluator},
            function::core::{Builtin, CallSite},
        },
        value::{
            batch::Batch,
            core::{Value, ValueCategory},
        },
    },
};

impl Evaluator<'_> {
    /// Evaluates a literal expression.
    ///
    /// Literals never consume randomness, so the result is always a constant
    /// batch.
    pub(crate) fn eval_literal(value: &LiteralValue, times: usize) -> Batch {
        Batch::repeat(Value::from(value), times)
    }

    /// Evaluates a reference by name.
    ///
    /// `value` and `number` evaluate to their category objects. Any other
    /// name is looked up in the grammar table at the time of evaluation.
    ///
    /// # Errors
    /// - `RuleNotFound` if no rule has this name.
    /// - `CyclicRule` if the rule is already being expanded, which would
    ///   never terminate.
    pub(crate) fn eval_variable(&mut self, name: &str, line: usize, times: usize) -> EvalResult<Batch> {
        if let Some(category) = ValueCategory::from_default(name) {
            return Ok(Batch::repeat(Value::Category(category), times));
        }

        let body = self.grammar
                       .get(name)
                       .cloned()
                       .ok_or_else(|| RuntimeError::RuleNotFound { name: name.to_string(),
                                                                   line })?;

        if self.rules.iter().any(|active| active == name) {
            return Err(RuntimeError::CyclicRule { name: name.to_string(),
                                                  line });
        }

        self.eval_rule(name, &body, times)
    }

    /// Evaluates a rule body with `name` as the innermost enclosing rule.
    pub(crate) fn eval_rule(&mut self, name: &str, body: &Expr, times: usize) -> EvalResult<Batch> {
        self.rules.push(name.to_string());
        let result = self.evaluate(body, times);
        self.rules.pop();
        result
    }

    /// Evaluates a candidate list.
    ///
    /// The list is constant if every element is; otherwise one list is
    /// assembled per repetition from the elements' values at that position.
    pub(crate) fn eval_list(&mut self, elements: &[Expr], times: usize) -> EvalResult<Batch> {
        let columns = elements.iter()
                              .map(|element| self.evaluate(element, times))
                              .collect::<EvalResult<Vec<_>>>()?;

        if columns.iter().all(Batch::is_constant) {
            let items = columns.iter().filter_map(Batch::representative).cloned().collect::<Vec<_>>();
            return Ok(Batch::repeat(Value::from(items), times));
        }

        let rows = (0..times).map(|index| {
                                 Value::from(columns.iter()
                                                    .filter_map(|column| column.get(index))
                                                    .cloned()
                                                    .collect::<Vec<_>>())
                             })
                             .collect();
        Ok(Batch::Many(rows))
    }

    /// Evaluates a builtin call, with or without a receiver.
    ///
    /// The receiver is evaluated first. A category object only selects the
    /// method table; any other receiver selects the table of its own
    /// category and becomes the first argument. If every argument turns out
    /// constant the builtin's vectorized form produces all `times` results at
    /// once; otherwise the scalar form runs once per repetition.
    ///
    /// # Errors
    /// - `UnknownFunction` or `InvalidOperandCategory` if the name does not
    ///   resolve.
    /// - `ArityMismatch` if the argument count is not accepted.
    /// - Any error raised by an argument or by the builtin itself.
    pub(crate) fn eval_function_call(&mut self,
                                     name: &str,
                                     receiver: Option<&Expr>,
                                     arguments: &[Expr],
                                     line: usize,
                                     times: usize)
                                     -> EvalResult<Batch> {
        let mut columns = Vec::with_capacity(arguments.len() + 1);

        let builtin = match receiver {
            None => Builtin::lookup(name).ok_or_else(|| RuntimeError::UnknownFunction { name: name.to_string(),
                                                                                          line })?,
            Some(receiver) => {
                let object = self.evaluate(receiver, times)?;
                if let Some(Value::Category(category)) = object.representative() {
                    Builtin::resolve_method(*category, name, line)?
                } else {
                    // An empty non-constant batch has nothing to dispatch on.
                    let category = object.representative().map_or(ValueCategory::Numeric, Value::category);
                    columns.push(object);
                    Builtin::resolve_method(category, name, line)?
                }
            },
        };

        builtin.check_arity(columns.len() + arguments.len(), line)?;

        for argument in arguments {
            columns.push(self.evaluate(argument, times)?);
        }

        let mut site = CallSite { rng: &mut self.rng,
                                  pool: self.pool,
                                  rule: self.rules.last().map(String::as_str),
                                  line };

        if columns.iter().all(Batch::is_constant) {
            let args = columns.iter().filter_map(Batch::representative).cloned().collect::<Vec<_>>();
            return builtin.call_times(&args, times, &mut site);
        }

        let mut row = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(times);
        for index in 0..times {
            row.clear();
            row.extend(columns.iter().filter_map(|column| column.get(index)).cloned());
            let (value, _constant) = builtin.call_scalar(&row, &mut site)?;
            values.push(value);
        }
        Ok(Batch::Many(values))
    }
}
