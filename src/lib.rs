//! # rulegen
//!
//! rulegen is a grammar-driven generator for large batches of randomized text.
//! A grammar file defines named rules built from literals, candidate lists
//! and builtin functions; `print(N, rule)` statements request `N` generated
//! instances, one output line each.
//!
//! ```
//! use rulegen::{config::EngineConfig, generate};
//!
//! let source = r#"
//!     greeting = append("hello ", one_of(["a", "b"]))
//!     print(3, greeting)
//! "#;
//!
//! let lines = generate(source, EngineConfig::default()).unwrap();
//!
//! assert_eq!(lines.len(), 3);
//! assert!(lines.iter().all(|l| l == "hello a" || l == "hello b"));
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use tracing::warn;

use crate::{config::EngineConfig, error::Error, interpreter::evaluator::core::Context};

/// Defines the structure of parsed grammar files.
///
/// This module declares the `Expr` and `Statement` enums that represent rule
/// definitions and `print` directives as a tree. The AST is built by the
/// parser, rewritten by the grammar table's inlining pass and traversed by the
/// evaluator.
pub mod ast;
/// Engine settings.
///
/// Worker count, discard mode, the parallelism threshold and the optional
/// seed, with their defaults.
pub mod config;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while lexing, parsing or
/// generating. Every error carries the line number of the construct that
/// caused it.
///
/// # Responsibilities
/// - Defines error enums for all failure modes (lexer, parser, evaluator).
/// - Attaches line numbers and detailed messages for context.
/// - Wraps both, plus I/O failures, in the crate-level `Error`.
pub mod error;
/// Orchestrates lexing, parsing and generation.
///
/// This module ties together the lexer, the parser, the evaluator and the
/// runtime value types. It exposes the `Context` that drives a run statement
/// by statement.
pub mod interpreter;
/// General utilities for safe numeric conversion.
pub mod util;

/// The standard rules loaded before every grammar file unless disabled.
pub const BOOTSTRAP: &str = include_str!("bootstrap.format");

/// Creates a context and loads the embedded bootstrap grammar into it.
///
/// A bootstrap that fails to load is reported as a warning; the context is
/// returned either way, possibly with only some of the standard rules
/// defined.
#[must_use]
pub fn bootstrapped_context(config: EngineConfig, bootstrap: Option<&str>) -> Context {
    let mut context = Context::new(config);

    if let Some(source) = bootstrap
       && let Err(error) = load_bootstrap(&mut context, source)
    {
        warn!(%error, "one or more default rules may not be available");
    }

    context
}

/// Runs a bootstrap grammar, discarding anything it prints.
///
/// # Errors
/// The first parse or runtime error in `source`. Rules defined before the
/// failing statement stay defined.
pub fn load_bootstrap(context: &mut Context, source: &str) -> Result<(), Error> {
    context.run(source).map(drop)
}

/// Generates the output of a grammar file.
///
/// The embedded [`BOOTSTRAP`] rules are available to `source`. Execution
/// stops at the first failing statement.
///
/// # Returns
/// One line per generated value, in statement order.
///
/// # Errors
/// The first parse or runtime error encountered.
///
/// # Examples
/// ```
/// use rulegen::{config::EngineConfig, error::{Error, RuntimeError}, generate};
///
/// let lines = generate("print(2, number.between(1, 1))", EngineConfig::default()).unwrap();
/// assert_eq!(lines, vec!["1", "1"]);
///
/// let res = generate("print(1, undefined_rule)", EngineConfig::default());
/// assert!(matches!(res, Err(Error::Runtime(RuntimeError::RuleNotFound { .. }))));
/// ```
pub fn generate(source: &str, config: EngineConfig) -> Result<Vec<String>, Error> {
    generate_with_bootstrap(source, config, Some(BOOTSTRAP))
}

/// Like [`generate`], with a custom bootstrap grammar or none at all.
pub fn generate_with_bootstrap(source: &str,
                               config: EngineConfig,
                               bootstrap: Option<&str>)
                               -> Result<Vec<String>, Error> {
    bootstrapped_context(config, bootstrap).run(source)
}
