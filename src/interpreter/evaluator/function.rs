/// The builtin registry.
///
/// Declares every builtin with its name, owning category, arity and its
/// scalar and vectorized implementations, and resolves function and method
/// names against it.
pub mod core;
/// `append` and `lower`.
///
/// The deterministic string builtins; the only ones the constant folder can
/// evaluate ahead of time.
pub mod text;
/// `one_of` and `one_of_unique`.
///
/// Random choice from a candidate list, with and without replacement.
pub mod choice;
/// `number.between` and `number.upto`.
///
/// Uniform random integers from an inclusive range.
pub mod number;
