/// Core evaluation logic and context management.
///
/// Contains the driver-facing `Context`, the batched `Evaluator` and the
/// dispatch over expression kinds.
pub mod core;

/// Grammar table.
///
/// Stores rule definitions and runs the inlining and constant-folding pass
/// whenever a rule is defined.
pub mod grammar;

/// Utility functions for evaluation.
///
/// Evaluation of the individual expression kinds, including the choice
/// between a builtin's scalar and vectorized form.
pub mod utils;

/// Builtin functions.
///
/// The registry and the scalar and vectorized implementation of every builtin.
pub mod function;

/// Uniqueness pool.
///
/// Tracks the candidates that `one_of_unique` has not emitted yet, shared by
/// every worker of a run.
pub mod unique;

/// Work partitioning.
///
/// Splits large `print` statements across worker threads.
pub mod partition;
