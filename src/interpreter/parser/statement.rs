use std::iter::Peekable;

use crate::{
    ast::Statement,
    error::ParseError,
    interpreter::{
        lexer::{Token, tokenize},
        parser::{
            core::{ParseResult, parse_expression},
            utils::expect,
        },
    },
    util::num::i64_to_usize_checked,
};

/// Tokenizes and parses a whole grammar file.
///
/// # Errors
/// Returns the first lexing or parsing error encountered.
///
/// # Example
/// ```
/// use rulegen::{ast::Statement, interpreter::parser::statement::parse_program};
///
/// let program = parse_program("x = \"a\"\nprint(2, x)").unwrap();
///
/// assert_eq!(program.len(), 2);
/// assert!(matches!(program[1], Statement::Print { count: 2, .. }));
/// ```
pub fn parse_program(source: &str) -> ParseResult<Vec<Statement>> {
    let tokens = tokenize(source)?;
    let mut iter = tokens.iter().peekable();
    let mut statements = Vec::new();

    while iter.peek().is_some() {
        statements.push(parse_statement(&mut iter)?);
    }

    Ok(statements)
}

/// Parses a single statement.
///
/// A statement is one of:
/// - a rule assignment, `identifier = expression`;
/// - a print directive, `print(count, expression)`.
///
/// # Errors
/// Returns `UnexpectedToken` if the statement starts with anything else.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::Identifier(name), line)) => {
            expect(tokens,
                   &Token::Equals,
                   &format!("Expected '=' after rule name '{name}'"),
                   *line)?;
            let value = parse_expression(tokens)?;

            Ok(Statement::Assignment { name: name.clone(),
                                       value,
                                       line: *line })
        },
        Some((Token::Print, line)) => parse_print(tokens, *line),
        Some((tok, line)) => {
            Err(ParseError::UnexpectedToken { token: format!("Invalid start of statement {tok:?}"),
                                              line:  *line, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line: 0 }),
    }
}

/// Parses the remainder of `print(count, expression)` after the keyword.
///
/// # Errors
/// - `InvalidPrintCount` if the count is negative or not an integer literal.
/// - `UnexpectedToken` if the punctuation is malformed.
fn parse_print<'a, I>(tokens: &mut Peekable<I>, line: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)>
{
    expect(tokens, &Token::LParen, "Expected '(' after print", line)?;

    let count = match tokens.next() {
        Some((Token::Integer(n), count_line)) => {
            i64_to_usize_checked(*n,
                                 ParseError::InvalidPrintCount { found: n.to_string(),
                                                                 line:  *count_line, })?
        },
        Some((tok, count_line)) => {
            return Err(ParseError::InvalidPrintCount { found: format!("{tok:?}"),
                                                       line:  *count_line, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { line }),
    };

    expect(tokens, &Token::Comma, "Expected ',' after the count given to print", line)?;
    let expr = parse_expression(tokens)?;
    expect(tokens, &Token::RParen, "Expected ')' at the end of print", line)?;

    Ok(Statement::Print { count, expr, line })
}
