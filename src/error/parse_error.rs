#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
/// Represents all errors that can occur during lexing or parsing.
pub enum ParseError {
    /// Found an unexpected token while parsing.
    #[error("Error on line {line}: Unexpected token: {token}.")]
    UnexpectedToken {
        /// The token encountered.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Reached the end of input unexpectedly.
    #[error("Error on line {line}: Unexpected end of input.")]
    UnexpectedEndOfInput {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A string literal was opened but never closed.
    #[error("Error on line {line}: String not terminated properly.")]
    UnterminatedString {
        /// The source line where the string starts.
        line: usize,
    },
    /// The first argument of `print` was not a non-negative integer.
    #[error("Error on line {line}: The count given to print must be a non-negative integer, found {found}.")]
    InvalidPrintCount {
        /// The literal that was supplied.
        found: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A literal value was too large to be represented safely.
    #[error("Error on line {line}: Literal is too large.")]
    LiteralTooLarge {
        /// The source line where the error occurred.
        line: usize,
    },
}

impl ParseError {
    /// Returns the source line the error refers to.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::UnexpectedToken { line, .. }
            | Self::UnexpectedEndOfInput { line }
            | Self::UnterminatedString { line }
            | Self::InvalidPrintCount { line, .. }
            | Self::LiteralTooLarge { line } => *line,
        }
    }
}
