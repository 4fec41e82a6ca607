use rand::{RngCore, SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use crate::{
    ast::{Expr, Statement},
    config::EngineConfig,
    error::{Error, RuntimeError},
    interpreter::{
        evaluator::{grammar::Grammar, partition::WorkPartitioner, unique::UniquenessPool},
        parser::statement::parse_program,
        value::batch::Batch,
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Stores the state of one generation run.
///
/// This struct holds the grammar table, the uniqueness pool shared by every
/// `one_of_unique` call site, the engine settings and the master random
/// source from which every worker's random source is derived.
///
/// ## Usage
///
/// `Context` is created once per run and fed statements in source order.
/// Rule definitions and uniqueness state persist across statements.
///
/// ```
/// use rulegen::{config::EngineConfig, interpreter::evaluator::core::Context};
///
/// let mut ctx = Context::new(EngineConfig { seed: Some(3),
///                                           ..EngineConfig::default() });
///
/// let lines = ctx.run("dice = number.between(1, 6)\nprint(4, dice)").unwrap();
///
/// assert_eq!(lines.len(), 4);
/// assert!(lines.iter().all(|l| (1..=6).contains(&l.parse::<i64>().unwrap())));
/// ```
pub struct Context {
    /// Rules defined so far.
    pub grammar: Grammar,
    pool:        UniquenessPool,
    config:      EngineConfig,
    partitioner: WorkPartitioner,
    rng:         StdRng,
}

impl Context {
    /// Creates a context with an empty grammar and a fresh uniqueness pool.
    ///
    /// The master random source is seeded from `config.seed`, or from the
    /// operating system when no seed is given.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let rng = config.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
        let partitioner = WorkPartitioner::new(config.workers.resolve(), config.parallel_threshold);

        Self { grammar: Grammar::new(),
               pool: UniquenessPool::new(),
               config,
               partitioner,
               rng }
    }

    /// The settings this context was created with.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The run's uniqueness pool.
    #[must_use]
    pub const fn pool(&self) -> &UniquenessPool {
        &self.pool
    }

    /// Executes a single statement.
    ///
    /// # Returns
    /// - `None` for a rule definition.
    /// - `Some(lines)` for a `print`, one line per generated value. When
    ///   output is not materialized the values are still generated and the
    ///   list is empty.
    ///
    /// # Errors
    /// Any runtime fault raised while generating. A failed `print` produces
    /// no output at all.
    pub fn process_statement(&mut self, statement: &Statement) -> EvalResult<Option<Vec<String>>> {
        match statement {
            Statement::Assignment { name, value, .. } => {
                self.grammar.define(name, value);
                Ok(None)
            },
            Statement::Print { count, expr, line } => {
                info!(count, line, "print");
                let batch = self.generate(expr, *count)?;

                if self.config.materialize {
                    Ok(Some(batch.to_lines()))
                } else {
                    Ok(Some(Vec::new()))
                }
            },
        }
    }

    /// Generates `count` instances of `expr` against the current grammar.
    ///
    /// Large counts are split across worker threads.
    ///
    /// # Errors
    /// Any runtime fault raised by the expression.
    pub fn generate(&mut self, expr: &Expr, count: usize) -> EvalResult<Batch> {
        let expr = self.grammar.inline(expr);
        self.partitioner.run(&self.grammar, &self.pool, &expr, count, &mut self.rng)
    }

    /// Parses and executes a whole program, collecting the output of every
    /// `print` in order.
    ///
    /// Execution stops at the first fault.
    ///
    /// # Errors
    /// The first parse or runtime error encountered.
    pub fn run(&mut self, source: &str) -> Result<Vec<String>, Error> {
        let program = parse_program(source)?;
        let mut output = Vec::new();

        for statement in &program {
            if let Some(lines) = self.process_statement(statement)? {
                output.extend(lines);
            }
        }

        debug!(statements = program.len(), lines = output.len(), "program finished");
        Ok(output)
    }
}

/// Evaluates expressions for a given repeat-count on one worker.
///
/// Every worker owns its evaluator and random source; the grammar and the
/// uniqueness pool are shared by reference.
///
/// ## Example
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use rulegen::{ast::{Expr, LiteralValue},
///               interpreter::{evaluator::{core::Evaluator, grammar::Grammar, unique::UniquenessPool},
///                             value::core::Value}};
///
/// let grammar = Grammar::new();
/// let pool = UniquenessPool::new();
/// let mut evaluator = Evaluator::new(&grammar, &pool, StdRng::seed_from_u64(0));
///
/// let expr = Expr::Literal { value: LiteralValue::Integer(7),
///                            line:  1, };
/// let batch = evaluator.evaluate(&expr, 3).unwrap();
///
/// assert!(batch.is_constant());
/// assert_eq!(batch.into_values(), vec![Value::Integer(7); 3]);
/// ```
pub struct Evaluator<'a> {
    pub(crate) grammar: &'a Grammar,
    pub(crate) pool:    &'a UniquenessPool,
    pub(crate) rng:     StdRng,
    /// Rules currently being evaluated, innermost last.
    pub(crate) rules:   Vec<String>,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator over `grammar` drawing randomness from `rng`.
    #[must_use]
    pub const fn new(grammar: &'a Grammar, pool: &'a UniquenessPool, rng: StdRng) -> Self {
        Self { grammar,
               pool,
               rng,
               rules: Vec::new() }
    }

    /// Creates an evaluator whose random source is seeded from `master`.
    pub fn forked(grammar: &'a Grammar, pool: &'a UniquenessPool, master: &mut StdRng) -> Self {
        Self::new(grammar, pool, StdRng::seed_from_u64(master.next_u64()))
    }

    /// Evaluates an expression `times` times.
    ///
    /// This is the main entry point for expression evaluation. The evaluator
    /// dispatches based on expression variant: literals, rule references,
    /// candidate lists and builtin calls.
    ///
    /// # Parameters
    /// - `expr`: Expression to evaluate.
    /// - `times`: Number of instances to produce.
    ///
    /// # Returns
    /// A batch of exactly `times` values. The batch is constant only if the
    /// expression consumed no randomness.
    pub fn evaluate(&mut self, expr: &Expr, times: usize) -> EvalResult<Batch> {
        match expr {
            Expr::Literal { value, .. } => Ok(Self::eval_literal(value, times)),
            Expr::Variable { name, line } => self.eval_variable(name, *line, times),
            Expr::Rule { name, body, .. } => self.eval_rule(name, body, times),
            Expr::List { elements, .. } => self.eval_list(elements, times),
            Expr::FunctionCall { name,
                                 receiver,
                                 arguments,
                                 line, } => {
                self.eval_function_call(name, receiver.as_deref(), arguments, *line, times)
            },
        }
    }
}
