/// The evaluator module generates values from the AST.
///
/// The evaluator keeps the grammar table, evaluates expressions for a whole
/// batch of repetitions at once and splits large `print` statements across
/// worker threads.
///
/// # Responsibilities
/// - Stores rules and inlines and folds them when they are defined.
/// - Evaluates expressions in batches, using vectorized builtins for
///   constant arguments.
/// - Reports runtime errors such as unknown rules or exhausted uniqueness
///   pools.
pub mod evaluator;
/// The lexer module tokenizes grammar files for further parsing.
///
/// The lexer reads the raw source text and produces a stream of tokens
/// (literals, identifiers, punctuation and the `print` keyword), each tagged
/// with its line. Comments and whitespace are skipped.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser processes the token stream produced by the lexer and constructs
/// rule assignments and `print` statements, including chained method calls.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// This module declares the values rules produce (integers, text, candidate
/// lists and the category objects), their categories, and the `Batch` that
/// carries one value per requested repetition.
pub mod value;
