use rand::rngs::StdRng;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::EvalResult,
            function::{choice, number, text},
            unique::UniquenessPool,
        },
        value::{
            batch::Batch,
            core::{Value, ValueCategory},
        },
    },
};

/// Everything a builtin may need besides its arguments.
pub struct CallSite<'a> {
    /// The calling worker's random source.
    pub rng:  &'a mut StdRng,
    /// The run's shared uniqueness pool.
    pub pool: &'a UniquenessPool,
    /// The innermost rule being evaluated, if any.
    pub rule: Option<&'a str>,
    /// Line number for error reporting.
    pub line: usize,
}

/// Scalar form: one result per call, plus whether that result is constant.
type ScalarFn = fn(&[Value], &mut CallSite<'_>) -> EvalResult<(Value, bool)>;

/// Vectorized form: `count` results from single representative arguments.
type TimesFn = fn(&[Value], usize, &mut CallSite<'_>) -> EvalResult<Batch>;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `AtLeast(n)` means the builtin accepts `n` or more arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    AtLeast(usize),
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    #[must_use]
    pub const fn check(self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == m,
            Self::AtLeast(m) => n >= m,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(n) => write!(f, "exactly {n}"),
            Self::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Defines builtin functions by generating the `Builtin` enum and a lookup
/// table.
///
/// Each entry provides:
/// - the enum variant,
/// - the flat function name,
/// - the method name and the category that owns the method,
/// - the accepted argument counts,
/// - the scalar and the vectorized implementation.
///
/// The macro produces:
/// - `Builtin` (one variant per entry, in table order),
/// - `BuiltinDef` and `BUILTIN_TABLE` (static metadata, indexed by variant),
/// - `BUILTIN_FUNCTIONS` (public list of flat names).
macro_rules! builtin_functions {
    (
        $(
            $variant:ident => {
                name: $name:literal,
                method: $method:literal,
                category: $category:expr,
                arity: $arity:expr,
                scalar: $scalar:expr,
                times: $times:expr $(,)?
            }
        ),* $(,)?
    ) => {
        /// A builtin function, resolved once per call site.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Builtin {
            $(
                #[doc = concat!("`", $name, "`")]
                $variant,
            )*
        }
        struct BuiltinDef {
            builtin:  Builtin,
            name:     &'static str,
            method:   &'static str,
            category: ValueCategory,
            arity:    Arity,
            scalar:   ScalarFn,
            times:    TimesFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { builtin:  Builtin::$variant,
                             name:     $name,
                             method:   $method,
                             category: $category,
                             arity:    $arity,
                             scalar:   $scalar,
                             times:    $times, },
            )*
        ];
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    Append      => { name: "append",         method: "append",        category: ValueCategory::Text,
                     arity: Arity::AtLeast(0), scalar: text::append,          times: text::append_times },
    Lower       => { name: "lower",          method: "lower",         category: ValueCategory::Text,
                     arity: Arity::Exact(1),   scalar: text::lower,           times: text::lower_times },
    OneOf       => { name: "one_of",         method: "one_of",        category: ValueCategory::Text,
                     arity: Arity::AtLeast(1), scalar: choice::one_of,        times: choice::one_of_times },
    OneOfUnique => { name: "one_of_unique",  method: "one_of_unique", category: ValueCategory::Text,
                     arity: Arity::AtLeast(1), scalar: choice::one_of_unique, times: choice::one_of_unique_times },
    Between     => { name: "number.between", method: "between",       category: ValueCategory::Numeric,
                     arity: Arity::Exact(2),   scalar: number::between,       times: number::between_times },
    Upto        => { name: "number.upto",    method: "upto",          category: ValueCategory::Numeric,
                     arity: Arity::Exact(1),   scalar: number::upto,          times: number::upto_times },
}

/// Whether a method owned by `owner` can be called on a value of `category`.
///
/// Numeric values support their own methods and every text method.
const fn supports(category: ValueCategory, owner: ValueCategory) -> bool {
    matches!((category, owner),
             (_, ValueCategory::Text) | (ValueCategory::Numeric, ValueCategory::Numeric))
}

impl Builtin {
    fn def(self) -> &'static BuiltinDef {
        &BUILTIN_TABLE[self as usize]
    }

    /// Looks up a builtin by its flat name, e.g. `append` or
    /// `number.between`.
    ///
    /// # Example
    /// ```
    /// use rulegen::interpreter::evaluator::function::core::Builtin;
    ///
    /// assert_eq!(Builtin::lookup("number.upto"), Some(Builtin::Upto));
    /// assert_eq!(Builtin::lookup("upto"), None);
    /// ```
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        BUILTIN_TABLE.iter().find(|def| def.name == name).map(|def| def.builtin)
    }

    /// Looks up a method callable on a value of the given category.
    #[must_use]
    pub fn for_method(category: ValueCategory, method: &str) -> Option<Self> {
        BUILTIN_TABLE.iter()
                     .find(|def| def.method == method && supports(category, def.category))
                     .map(|def| def.builtin)
    }

    /// Resolves `object.method(...)` for an object of the given category.
    ///
    /// # Errors
    /// - `InvalidOperandCategory` if the method exists but belongs to a
    ///   category the object does not support.
    /// - `UnknownFunction` if no category has such a method.
    ///
    /// # Example
    /// ```
    /// use rulegen::{error::RuntimeError,
    ///               interpreter::{evaluator::function::core::Builtin, value::core::ValueCategory}};
    ///
    /// assert_eq!(Builtin::resolve_method(ValueCategory::Numeric, "lower", 1), Ok(Builtin::Lower));
    /// assert!(matches!(Builtin::resolve_method(ValueCategory::Text, "between", 1),
    ///                  Err(RuntimeError::InvalidOperandCategory { .. })));
    /// ```
    pub fn resolve_method(category: ValueCategory, method: &str, line: usize) -> EvalResult<Self> {
        if let Some(builtin) = Self::for_method(category, method) {
            return Ok(builtin);
        }

        match BUILTIN_TABLE.iter().find(|def| def.method == method) {
            Some(def) => Err(RuntimeError::InvalidOperandCategory { method: method.to_string(),
                                                                    expected: def.category,
                                                                    found: category,
                                                                    line }),
            None => Err(RuntimeError::UnknownFunction { name: format!("{}.{method}",
                                                                      category.default_name()),
                                                        line }),
        }
    }

    /// The flat name of the builtin.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.def().name
    }

    /// The argument counts the builtin accepts.
    #[must_use]
    pub fn arity(self) -> Arity {
        self.def().arity
    }

    /// Fails with `ArityMismatch` if `found` arguments are not accepted.
    pub fn check_arity(self, found: usize, line: usize) -> EvalResult<()> {
        let arity = self.arity();
        if arity.check(found) {
            return Ok(());
        }
        Err(RuntimeError::ArityMismatch { name: self.name(),
                                          expected: arity.to_string(),
                                          found,
                                          line })
    }

    /// The arguments of a fixed-arity builtin as an array.
    ///
    /// # Errors
    /// `ArityMismatch` if `args` does not hold exactly `N` values.
    pub fn exact_args<'v, const N: usize>(self, args: &'v [Value], line: usize) -> EvalResult<&'v [Value; N]> {
        args.try_into().map_err(|_| RuntimeError::ArityMismatch { name: self.name(),
                                                                   expected: Arity::Exact(N).to_string(),
                                                                   found: args.len(),
                                                                   line })
    }

    /// Produces one result from one row of arguments.
    ///
    /// # Errors
    /// `ArityMismatch` for an unaccepted argument count, otherwise whatever
    /// the builtin raises.
    pub fn call_scalar(self, args: &[Value], site: &mut CallSite<'_>) -> EvalResult<(Value, bool)> {
        self.check_arity(args.len(), site.line)?;
        (self.def().scalar)(args, site)
    }

    /// Produces `count` results from representative arguments.
    ///
    /// # Errors
    /// As [`Builtin::call_scalar`].
    pub fn call_times(self, args: &[Value], count: usize, site: &mut CallSite<'_>) -> EvalResult<Batch> {
        self.check_arity(args.len(), site.line)?;
        (self.def().times)(args, count, site)
    }

    /// Evaluates a deterministic builtin ahead of time.
    ///
    /// Returns `None` for builtins that consume randomness or for argument
    /// lists that would fail at call time, so that the fault is still raised
    /// when the call is actually evaluated.
    ///
    /// # Example
    /// ```
    /// use rulegen::interpreter::{evaluator::function::core::Builtin, value::core::Value};
    ///
    /// let folded = Builtin::Append.fold(&[Value::from("ab"), Value::Integer(1)]);
    ///
    /// assert_eq!(folded, Some(Value::from("ab1")));
    /// assert_eq!(Builtin::OneOf.fold(&[Value::from("x")]), None);
    /// ```
    #[must_use]
    pub fn fold(self, args: &[Value]) -> Option<Value> {
        if !self.arity().check(args.len()) {
            return None;
        }
        match self {
            Self::Append => Some(text::concat(args)),
            Self::Lower => args.first().map(text::lowercase),
            Self::OneOf | Self::OneOfUnique | Self::Between | Self::Upto => None,
        }
    }
}
