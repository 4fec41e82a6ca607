/// Numeric conversion helpers.
///
/// This module provides checked conversions between the integer types used by
/// the generator, such as `i64` literals coming from grammar files and the
/// `usize` counts used for batches.
///
/// All functions return a `Result`, which is `Ok` if the conversion is lossless
/// and an error otherwise.
pub mod num;
