use std::sync::Arc;

use crate::{ast::LiteralValue, error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// The category of a value, which decides the methods that can be called on
/// it.
///
/// Every value belongs to exactly one category. The builtin default objects
/// `value` and `number` are the categories themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueCategory {
    /// String-like values: text, lists and the `value` object.
    Text,
    /// Integer values and the `number` object.
    Numeric,
}

impl ValueCategory {
    /// Looks up a builtin default object by name.
    ///
    /// # Example
    /// ```
    /// use rulegen::interpreter::value::core::ValueCategory;
    ///
    /// assert_eq!(ValueCategory::from_default("number"), Some(ValueCategory::Numeric));
    /// assert_eq!(ValueCategory::from_default("greeting"), None);
    /// ```
    #[must_use]
    pub fn from_default(name: &str) -> Option<Self> {
        match name {
            "value" => Some(Self::Text),
            "number" => Some(Self::Numeric),
            _ => None,
        }
    }

    /// The name of the builtin default object for this category.
    #[must_use]
    pub const fn default_name(self) -> &'static str {
        match self {
            Self::Text => "value",
            Self::Numeric => "number",
        }
    }
}

impl std::fmt::Display for ValueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "string"),
            Self::Numeric => write!(f, "numeric"),
        }
    }
}

/// Represents a runtime value in the generator.
///
/// Values are cheap to clone; strings and lists are reference counted so the
/// same value can be repeated across a batch or shared between workers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// A 64-bit integer.
    Integer(i64),
    /// A piece of text.
    Text(Arc<str>),
    /// A list of candidate values, as written with `[a, b, c]`.
    List(Arc<[Self]>),
    /// One of the builtin default objects (`value` or `number`).
    Category(ValueCategory),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(Arc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(Arc::from(v))
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::List(Arc::from(v))
    }
}

impl From<&LiteralValue> for Value {
    fn from(v: &LiteralValue) -> Self {
        match v {
            LiteralValue::Integer(n) => Self::Integer(*n),
            LiteralValue::Text(s) => Self::Text(Arc::clone(s)),
        }
    }
}

impl Value {
    /// Returns the category that decides which methods apply to this value.
    ///
    /// # Example
    /// ```
    /// use rulegen::interpreter::value::core::{Value, ValueCategory};
    ///
    /// assert_eq!(Value::Integer(3).category(), ValueCategory::Numeric);
    /// assert_eq!(Value::from("abc").category(), ValueCategory::Text);
    /// ```
    #[must_use]
    pub const fn category(&self) -> ValueCategory {
        match self {
            Self::Integer(_) => ValueCategory::Numeric,
            Self::Text(_) | Self::List(_) => ValueCategory::Text,
            Self::Category(c) => *c,
        }
    }

    /// Converts the value to an `i64`, or fails with `InvalidOperandCategory`
    /// naming `method` if it is not an integer.
    ///
    /// # Example
    /// ```
    /// use rulegen::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Integer(10).as_integer("upto", 1).unwrap(), 10);
    /// assert!(Value::from("10").as_integer("upto", 1).is_err());
    /// ```
    pub fn as_integer(&self, method: &str, line: usize) -> EvalResult<i64> {
        match self {
            Self::Integer(n) => Ok(*n),
            other => Err(RuntimeError::InvalidOperandCategory { method: method.to_string(),
                                                                expected: ValueCategory::Numeric,
                                                                found: other.category(),
                                                                line }),
        }
    }

    /// Converts the value to a literal if it has a literal representation.
    ///
    /// Used by the constant folder; lists and category objects have none.
    #[must_use]
    pub fn to_literal(&self) -> Option<LiteralValue> {
        match self {
            Self::Integer(n) => Some(LiteralValue::Integer(*n)),
            Self::Text(s) => Some(LiteralValue::Text(Arc::clone(s))),
            Self::List(_) | Self::Category(_) => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::List(items) => {
                write!(f, "[")?;

                for (index, value) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }

                    write!(f, "{value}")?;
                }

                write!(f, "]")
            },
            Self::Category(_) => Ok(()),
        }
    }
}
