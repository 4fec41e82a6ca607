/// Parsing errors.
///
/// Defines all error types that can occur during lexing and parsing of a
/// grammar file. Parse errors include unknown characters, unterminated strings,
/// malformed statements and invalid `print` counts.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all faults that can be raised while generating values: unknown
/// rules and functions, arity and category mismatches, and exhausted
/// uniqueness pools.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// Any failure surfaced by the public entry points of the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source could not be tokenized or parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A statement failed while generating values.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    /// A grammar or output file could not be read or written.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// The file that was being accessed.
        path:   String,
        /// The underlying failure.
        source: std::io::Error,
    },
}
