/// Core parsing logic for expressions.
///
/// Contains the entry point for expression parsing, primary expressions and
/// the postfix `.method(...)` chain.
pub mod core;

/// Utility functions for the parser.
///
/// Provides helpers for comma-separated lists and identifiers.
pub mod utils;

/// Statement parsing.
///
/// Implements the two statement forms, rule assignments and `print`
/// directives, and the whole-program entry point.
pub mod statement;
