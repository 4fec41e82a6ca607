/// Safely converts an `i64` to `usize` if and only if it is non-negative and
/// fits the platform's pointer width.
///
/// ## Errors
/// Returns `Err(error)` if the value is negative or too large.
///
/// ## Parameters
/// - `value`: The integer to convert.
/// - `error`: The error to return if the conversion is not lossless.
///
/// ## Example
/// ```
/// use rulegen::util::num::i64_to_usize_checked;
///
/// assert_eq!(i64_to_usize_checked(42, "negative!").unwrap(), 42);
/// assert!(i64_to_usize_checked(-1, "negative!").is_err());
/// ```
pub fn i64_to_usize_checked<E>(value: i64, error: E) -> Result<usize, E> {
    usize::try_from(value).map_err(|_| error)
}

