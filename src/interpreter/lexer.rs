use logos::Logos;

use crate::error::ParseError;

/// Represents a lexical token in a grammar file.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Eq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// `print`
    #[token("print")]
    Print,
    /// Integer literal tokens, such as `42` or `-7`.
    #[regex(r"-?[0-9]+", parse_integer)]
    Integer(i64),
    /// String literal tokens, such as `"hello"`. The payload is unescaped and
    /// has its quotes stripped.
    #[regex(r#""([^"\\]|\\.)*""#, parse_string)]
    Str(String),
    /// Identifier tokens; rule or method names such as `name` or `between`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `// Comments.`
    #[regex(r"//[^\n\r]*", logos::skip, allow_greedy = true)]
    Comment,
    /// ```text
    /// /* Multi line comments. */
    /// ```
    #[regex(r"/\*([^*]|\*[^/])*\*/", |lex| {
        let comment      = lex.slice();
        let newlines     = comment.chars().filter(|&c| c == '\n').count();
        lex.extras.line += newlines;
        logos::Skip
    })]
    MultiLineComment,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `,`
    #[token(",")]
    Comma,
    /// `=`
    #[token("=")]
    Equals,
    /// `.`
    #[token(".")]
    Dot,
    /// Line breaks are insignificant but counted.
    #[token("\n", |lex| {
        lex.extras.line += 1;
        logos::Skip
    })]
    NewLine,
    /// Spaces, tabs, carriage returns and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting and diagnostics.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

/// Converts a whole source file into `(Token, line)` pairs.
///
/// # Errors
/// - `UnterminatedString` if a `"` is never closed.
/// - `LiteralTooLarge` if an integer does not fit in `i64`.
/// - `UnexpectedToken` for any other unrecognized character.
///
/// # Example
/// ```
/// use rulegen::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("print(2, \"hi\")").unwrap();
///
/// assert_eq!(tokens[0], (Token::Print, 1));
/// assert_eq!(tokens[4], (Token::Str("hi".to_string()), 1));
/// ```
pub fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer_with_extras(source, LexerExtras { line: 1 });

    while let Some(token) = lexer.next() {
        let line = lexer.extras.line;
        match token {
            Ok(tok) => tokens.push((tok, line)),
            Err(()) => {
                let slice = lexer.slice();
                let digits = slice.strip_prefix('-').unwrap_or(slice);
                return Err(if slice.starts_with('"') {
                               ParseError::UnterminatedString { line }
                           } else if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
                               ParseError::LiteralTooLarge { line }
                           } else {
                               ParseError::UnexpectedToken { token: slice.to_string(),
                                                             line }
                           });
            },
        }
    }

    Ok(tokens)
}

/// Parses an integer literal from the current token slice.
///
/// # Returns
/// - `Some(i64)`: The parsed integer value if successful.
/// - `None`: If the literal does not fit in an `i64`.
fn parse_integer(lex: &logos::Lexer<Token>) -> Option<i64> {
    lex.slice().parse().ok()
}

/// Strips the quotes from a string literal and resolves escape sequences.
///
/// Recognized escapes are `\"`, `\\`, `\n` and `\t`; any other escaped
/// character is kept as written. Newlines inside the literal advance the line
/// counter.
fn parse_string(lex: &mut logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    lex.extras.line += inner.chars().filter(|&c| c == '\n').count();

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other @ ('"' | '\\')) => out.push(other),
            Some(other) => {
                out.push('\\');
                out.push(other);
            },
            None => out.push('\\'),
        }
    }
    out
}
