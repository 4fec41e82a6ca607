use std::iter::Peekable;

use crate::{
    error::ParseError,
    interpreter::{lexer::Token, parser::core::ParseResult},
};

/// Parses a comma-separated list of items until a closing token.
///
/// This utility is shared by list literals and function argument lists. It
/// repeatedly calls `parse_item` to parse one element, expecting either:
///
/// - a comma, to continue the list, or
/// - the specified closing token, to end it.
///
/// An immediately encountered closing token produces an empty list.
///
/// Grammar (simplified): `list := item ("," item)*`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `closing`: The token that terminates the list (e.g., `]` or `)`).
/// - `line`: Line of the opening token, reported if the input ends early.
///
/// # Errors
/// Returns a `ParseError` if:
/// - an item fails to parse,
/// - an unexpected token is encountered,
/// - the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    closing: &Token,
    line: usize)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a (Token, usize)>
{
    let mut items = Vec::new();
    if let Some((tok, _)) = tokens.peek()
       && tok == closing
    {
        tokens.next();

        return Ok(items);
    }
    loop {
        items.push(parse_item(tokens)?);
        match tokens.peek() {
            Some((Token::Comma, _)) => {
                tokens.next();
            },
            Some((tok, _)) if tok == closing => {
                tokens.next();
                break;
            },
            Some((tok, line)) => {
                return Err(ParseError::UnexpectedToken { token: format!("Expected ',' or {closing:?}, found {tok:?}"),
                                                         line:  *line, });
            },
            None => return Err(ParseError::UnexpectedEndOfInput { line }),
        }
    }
    Ok(items)
}

/// Parses a plain identifier and returns its name.
///
/// # Errors
/// Returns a `ParseError` if the next token is not an identifier or the input
/// ends unexpectedly.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>,
                                                              line: usize)
                                                              -> ParseResult<String>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((Token::Identifier(s), _)) => Ok(s.clone()),
        Some((tok, line)) => {
            Err(ParseError::UnexpectedToken { token: format!("Expected identifier, found {tok:?}"),
                                              line:  *line, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line }),
    }
}

/// Consumes the next token, which must equal `expected`.
///
/// Returns the line the token was found on.
///
/// # Errors
/// Returns `UnexpectedToken` with `context` in the message if a different
/// token is found, or `UnexpectedEndOfInput` if the stream is exhausted.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    expected: &Token,
                                                    context: &str,
                                                    line: usize)
                                                    -> ParseResult<usize>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((tok, found_line)) if tok == expected => Ok(*found_line),
        Some((tok, found_line)) => {
            Err(ParseError::UnexpectedToken { token: format!("{context}, found {tok:?}"),
                                              line:  *found_line, })
        },
        None => Err(ParseError::UnexpectedEndOfInput { line }),
    }
}
