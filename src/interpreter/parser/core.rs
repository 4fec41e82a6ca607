use std::iter::Peekable;

use crate::{
    ast::{Expr, LiteralValue},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::utils::{expect, parse_comma_separated, parse_identifier},
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a full expression.
///
/// An expression is a primary expression followed by any number of
/// `.method(arguments)` suffixes, which are folded left to right into
/// [`Expr::FunctionCall`] nodes carrying the left-hand side as receiver.
///
/// Grammar: `expression := primary ("." identifier "(" arguments ")")*`
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, line)` pairs.
///
/// # Returns
/// The parsed expression node.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)>
{
    let mut expr = parse_primary(tokens)?;

    while let Some((Token::Dot, line)) = tokens.peek() {
        let line = *line;
        tokens.next();

        let name = parse_identifier(tokens, line)?;
        expect(tokens,
               &Token::LParen,
               &format!("Expected '(' after method name '{name}'"),
               line)?;
        let arguments = parse_comma_separated(tokens, parse_expression, &Token::RParen, line)?;

        expr = Expr::FunctionCall { name,
                                    receiver: Some(Box::new(expr)),
                                    arguments,
                                    line };
    }

    Ok(expr)
}

/// Parses a primary (atomic) expression.
///
/// Grammar:
/// ```text
///     primary := integer
///              | string
///              | "[" (expression ("," expression)*)? "]"
///              | identifier
///              | identifier "(" arguments ")"
/// ```
///
/// # Errors
/// Returns `UnexpectedToken` for any token that can not start an expression
/// (including the `print` keyword) and `UnexpectedEndOfInput` when the stream
/// is exhausted.
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)>
{
    let (token, line) = tokens.next()
                              .ok_or(ParseError::UnexpectedEndOfInput { line: 0 })?;
    let line = *line;

    match token {
        Token::Integer(n) => Ok(Expr::Literal { value: LiteralValue::Integer(*n),
                                                line }),
        Token::Str(s) => Ok(Expr::Literal { value: LiteralValue::from(s.as_str()),
                                            line }),
        Token::LBracket => {
            let elements = parse_comma_separated(tokens, parse_expression, &Token::RBracket, line)?;
            Ok(Expr::List { elements, line })
        },
        Token::Identifier(name) => {
            if let Some((Token::LParen, _)) = tokens.peek() {
                tokens.next();
                let arguments =
                    parse_comma_separated(tokens, parse_expression, &Token::RParen, line)?;
                return Ok(Expr::FunctionCall { name: name.clone(),
                                               receiver: None,
                                               arguments,
                                               line });
            }
            Ok(Expr::Variable { name: name.clone(),
                                line })
        },
        tok => Err(ParseError::UnexpectedToken { token: format!("{tok:?}"),
                                                 line }),
    }
}
