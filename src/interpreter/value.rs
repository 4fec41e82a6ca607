/// Batch representation.
///
/// Defines `Batch`, the bounded sequence of values every evaluation step
/// produces, either a single value repeated a fixed number of times or a fully
/// materialized vector.
pub mod batch;

pub mod core;
