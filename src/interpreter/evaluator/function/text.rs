use crate::interpreter::{
    evaluator::{
        core::EvalResult,
        function::core::{Builtin, CallSite},
    },
    value::{batch::Batch, core::Value},
};

/// Concatenates the textual forms of all values.
///
/// # Example
/// ```
/// use rulegen::interpreter::{evaluator::function::text::concat, value::core::Value};
///
/// let joined = concat(&[Value::from("room "), Value::Integer(12), Value::from("b")]);
///
/// assert_eq!(joined, Value::from("room 12b"));
/// ```
#[must_use]
pub fn concat(args: &[Value]) -> Value {
    Value::from(args.iter().map(ToString::to_string).collect::<String>())
}

/// Lowercases the textual form of a value.
#[must_use]
pub fn lowercase(value: &Value) -> Value {
    Value::from(value.to_string().to_lowercase())
}

/// `append(a, b, ...)`: the arguments joined into one string.
pub fn append(args: &[Value], _: &mut CallSite<'_>) -> EvalResult<(Value, bool)> {
    Ok((concat(args), true))
}

pub fn append_times(args: &[Value], count: usize, _: &mut CallSite<'_>) -> EvalResult<Batch> {
    Ok(Batch::repeat(concat(args), count))
}

/// `lower(x)`: `x` as lowercase text.
pub fn lower(args: &[Value], site: &mut CallSite<'_>) -> EvalResult<(Value, bool)> {
    let [value] = Builtin::Lower.exact_args::<1>(args, site.line)?;
    Ok((lowercase(value), true))
}

pub fn lower_times(args: &[Value], count: usize, site: &mut CallSite<'_>) -> EvalResult<Batch> {
    let [value] = Builtin::Lower.exact_args::<1>(args, site.line)?;
    Ok(Batch::repeat(lowercase(value), count))
}

