use std::{collections::HashMap, sync::Arc};

use tracing::debug;

use crate::{
    ast::Expr,
    interpreter::{
        evaluator::function::core::Builtin,
        value::core::{Value, ValueCategory},
    },
};

/// The table of named rules.
///
/// Bodies are stored already inlined: every reference to a rule that existed
/// when the body was defined is replaced by an [`Expr::Rule`] node sharing
/// that rule's body, and randomness-free builtin calls over literals are
/// collapsed into literals. A body therefore captures the definitions that
/// were current at assignment time. References to rules that did not exist
/// yet stay as [`Expr::Variable`] and are looked up when evaluated.
///
/// ## Example
/// ```
/// use rulegen::{ast::{Expr, Statement},
///               interpreter::{evaluator::grammar::Grammar, parser::statement::parse_program}};
///
/// let program = parse_program("greeting = \"Hello\"\nprint(1, append(greeting, \", world\"))").unwrap();
/// let mut grammar = Grammar::new();
///
/// let Statement::Assignment { name, value, .. } = &program[0] else { panic!() };
/// grammar.define(name, value);
///
/// let Statement::Print { expr, .. } = &program[1] else { panic!() };
/// assert_eq!(grammar.inline(expr),
///            Expr::Literal { value: "Hello, world".into(),
///                            line:  2, });
/// ```
#[derive(Debug, Default)]
pub struct Grammar {
    rules: HashMap<String, Arc<Expr>>,
}

impl Grammar {
    /// Creates an empty grammar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `body`, replacing any previous definition.
    ///
    /// Rules that captured the previous definition keep it.
    pub fn define(&mut self, name: &str, body: &Expr) {
        let body = self.inline(body);
        debug!(rule = name,
               constant = matches!(body, Expr::Literal { .. }),
               redefined = self.rules.contains_key(name),
               "rule defined");
        self.rules.insert(name.to_string(), Arc::new(body));
    }

    /// Returns the current body of a rule.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<Expr>> {
        self.rules.get(name)
    }

    /// Whether a rule with this name is defined.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Number of defined rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolves rule references in `expr` against the current table and
    /// folds what has become constant.
    ///
    /// The builtin defaults `value` and `number` always refer to the category
    /// objects and are never replaced.
    #[must_use]
    pub fn inline(&self, expr: &Expr) -> Expr {
        match expr {
            Expr::Literal { .. } | Expr::Rule { .. } => expr.clone(),
            Expr::Variable { name, line } => self.inline_variable(expr, name, *line),
            Expr::List { elements, line } => {
                Expr::List { elements: elements.iter().map(|e| self.inline(e)).collect(),
                             line:     *line, }
            },
            Expr::FunctionCall { name,
                                 receiver,
                                 arguments,
                                 line, } => {
                let receiver = receiver.as_ref().map(|r| Box::new(self.inline(r)));
                let arguments: Vec<Expr> = arguments.iter().map(|a| self.inline(a)).collect();

                match fold_call(name, receiver.as_deref(), &arguments, *line) {
                    Some(folded) => folded,
                    None => Expr::FunctionCall { name: name.clone(),
                                                 receiver,
                                                 arguments,
                                                 line: *line },
                }
            },
        }
    }

    fn inline_variable(&self, expr: &Expr, name: &str, line: usize) -> Expr {
        if ValueCategory::from_default(name).is_some() {
            return expr.clone();
        }

        match self.rules.get(name) {
            Some(body) => match body.as_ref() {
                Expr::Literal { value, .. } => Expr::Literal { value: value.clone(),
                                                               line },
                _ => Expr::Rule { name: name.to_string(),
                                  body: Arc::clone(body),
                                  line },
            },
            None => expr.clone(),
        }
    }
}

/// Collapses a call to a deterministic builtin whose operands are all
/// literals.
///
/// Returns `None` whenever the call cannot be decided ahead of time,
/// including calls that would fail; those are left for the evaluator to
/// report.
fn fold_call(name: &str, receiver: Option<&Expr>, arguments: &[Expr], line: usize) -> Option<Expr> {
    let mut values = Vec::with_capacity(arguments.len() + 1);

    let builtin = match receiver {
        None => Builtin::lookup(name)?,
        Some(Expr::Variable { name: object, .. }) => {
            Builtin::for_method(ValueCategory::from_default(object)?, name)?
        },
        Some(Expr::Literal { value, .. }) => {
            let value = Value::from(value);
            let builtin = Builtin::for_method(value.category(), name)?;
            values.push(value);
            builtin
        },
        Some(_) => return None,
    };

    for argument in arguments {
        match argument {
            Expr::Literal { value, .. } => values.push(Value::from(value)),
            _ => return None,
        }
    }

    let folded = builtin.fold(&values)?;
    Some(Expr::Literal { value: folded.to_literal()?,
                         line })
}
