use crate::interpreter::value::core::ValueCategory;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
/// Represents all faults that can occur while generating values.
pub enum RuntimeError {
    /// A name resolved to neither a builtin default nor a grammar rule.
    #[error("Error on line {line}: No such rule found '{name}'.")]
    RuleNotFound {
        /// The name of the rule.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Called a function that is not part of the builtin registry.
    #[error("Error on line {line}: Unknown function '{name}'.")]
    UnknownFunction {
        /// The name of the function.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// The wrong number of arguments was supplied to a builtin.
    #[error("Error on line {line}: '{name}' expects {expected} argument(s), but {found} were given.")]
    ArityMismatch {
        /// The name of the builtin.
        name:     &'static str,
        /// A description of the accepted argument counts.
        expected: String,
        /// The number of arguments actually supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A method was invoked on a value whose category does not support it.
    #[error(
        "Error on line {line}: Method '{method}' can not be used on a {found} value, it requires a {expected} value."
    )]
    InvalidOperandCategory {
        /// The name of the method.
        method:   String,
        /// The category the method belongs to.
        expected: ValueCategory,
        /// The category of the value it was used on.
        found:    ValueCategory,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// A unique draw found no remaining candidates.
    #[error("Error on line {line}: No more unique values to generate.")]
    UniquePoolExhausted {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A batched unique draw asked for more values than remain.
    #[error("Error on line {line}: Requested {requested} unique values, but only {remaining} remain.")]
    UniquePoolInsufficient {
        /// The number of values requested.
        requested: usize,
        /// The number of values still available.
        remaining: usize,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// A rule was reached again while it was still being resolved.
    #[error("Error on line {line}: Rule '{name}' refers to itself.")]
    CyclicRule {
        /// The name of the rule.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A numeric range contains no integers.
    #[error("Error on line {line}: The range [{low}, {high}] is empty.")]
    EmptyRange {
        /// Lower bound of the range.
        low:  i64,
        /// Upper bound of the range.
        high: i64,
        /// The source line where the error occurred.
        line: usize,
    },
    /// A random choice was requested from zero candidates.
    #[error("Error on line {line}: Cannot choose from an empty list.")]
    EmptyChoice {
        /// The source line where the error occurred.
        line: usize,
    },
}
