use std::sync::Arc;

/// Represents a literal value in the language.
///
/// `LiteralValue` covers the raw constants that can appear directly in a
/// grammar file: integers and (already unescaped) strings. The constant folder
/// also produces literals when it collapses a randomness-free call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    /// A 64-bit signed integer literal.
    Integer(i64),
    /// A string literal with its quotes stripped.
    Text(Arc<str>),
}

impl From<i64> for LiteralValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<&str> for LiteralValue {
    fn from(value: &str) -> Self {
        Self::Text(Arc::from(value))
    }
}

impl From<String> for LiteralValue {
    fn from(value: String) -> Self {
        Self::Text(Arc::from(value))
    }
}

/// An abstract syntax tree (AST) node representing an expression.
///
/// Every expression can be evaluated for any repeat-count; see
/// [`crate::interpreter::evaluator::core::Evaluator::evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal value (integer or string).
    Literal {
        /// The constant value.
        value: LiteralValue,
        /// Line number in the source code.
        line:  usize,
    },
    /// Reference to a builtin default (`value`, `number`) or a grammar rule.
    Variable {
        /// Name of the referenced rule.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// Invocation of a builtin, e.g. `append("a", b)` or
    /// `number.between(1, 6)`.
    FunctionCall {
        /// Name of the function or method being called.
        name:      String,
        /// The object a method is called on, if the call used the
        /// `object.method(...)` form.
        receiver:  Option<Box<Self>>,
        /// Arguments to the function.
        arguments: Vec<Self>,
        /// Line number in the source code.
        line:      usize,
    },
    /// A candidate list such as `["red", "green", "blue"]`.
    List {
        /// Elements of the list.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// A rule reference that has already been resolved by the grammar table.
    ///
    /// Never produced by the parser. The body is shared with the grammar table
    /// entry, so nesting references costs nothing.
    Rule {
        /// Name of the rule the body belongs to.
        name: String,
        /// The rule's own (already inlined) body.
        body: Arc<Self>,
        /// Line number of the reference.
        line: usize,
    },
}

impl Expr {
    /// Gets the line number from `self`.
    /// ## Example
    /// ```
    /// use rulegen::ast::Expr;
    ///
    /// let expr = Expr::Variable { name: "x".to_string(),
    ///                             line: 5, };
    ///
    /// assert_eq!(expr.line_number(), 5);
    /// ```
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Literal { line, .. }
            | Self::Variable { line, .. }
            | Self::FunctionCall { line, .. }
            | Self::List { line, .. }
            | Self::Rule { line, .. } => *line,
        }
    }
}

/// Represents a top-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A rule definition, `name = expression`.
    Assignment {
        /// The name of the rule.
        name:  String,
        /// The expression the rule expands to.
        value: Expr,
        /// Line number in the source code.
        line:  usize,
    },
    /// A request for `count` generated instances of `expr`.
    Print {
        /// How many instances to generate.
        count: usize,
        /// The expression to generate.
        expr:  Expr,
        /// Line number in the source code.
        line:  usize,
    },
}

impl Statement {
    /// Gets the line number from `self`.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        match self {
            Self::Assignment { line, .. } | Self::Print { line, .. } => *line,
        }
    }
}
