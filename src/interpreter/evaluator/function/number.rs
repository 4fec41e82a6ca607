use rand::{Rng, distributions::Uniform};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::EvalResult,
            function::core::{Builtin, CallSite},
        },
        value::{batch::Batch, core::Value},
    },
};

/// Validates an inclusive range, failing with `EmptyRange` when `low > high`.
fn range(low: i64, high: i64, line: usize) -> EvalResult<Uniform<i64>> {
    if low > high {
        return Err(RuntimeError::EmptyRange { low, high, line });
    }
    Ok(Uniform::new_inclusive(low, high))
}

fn between_range(args: &[Value], line: usize) -> EvalResult<Uniform<i64>> {
    let [low, high] = Builtin::Between.exact_args::<2>(args, line)?;
    let low = low.as_integer("between", line)?;
    let high = high.as_integer("between", line)?;
    range(low, high, line)
}

fn upto_range(args: &[Value], line: usize) -> EvalResult<Uniform<i64>> {
    let [high] = Builtin::Upto.exact_args::<1>(args, line)?;
    let high = high.as_integer("upto", line)?;
    range(0, high, line)
}

fn sample(range: Uniform<i64>, count: usize, site: &mut CallSite<'_>) -> Batch {
    Batch::Many((&mut *site.rng).sample_iter(range)
                                .take(count)
                                .map(Value::Integer)
                                .collect())
}

/// `number.between(a, b)`: a uniform integer in `[a, b]`.
pub fn between(args: &[Value], site: &mut CallSite<'_>) -> EvalResult<(Value, bool)> {
    let range = between_range(args, site.line)?;
    Ok((Value::Integer(site.rng.sample(range)), false))
}

pub fn between_times(args: &[Value], count: usize, site: &mut CallSite<'_>) -> EvalResult<Batch> {
    let range = between_range(args, site.line)?;
    Ok(sample(range, count, site))
}

/// `number.upto(n)`: a uniform integer in `[0, n]`.
pub fn upto(args: &[Value], site: &mut CallSite<'_>) -> EvalResult<(Value, bool)> {
    let range = upto_range(args, site.line)?;
    Ok((Value::Integer(site.rng.sample(range)), false))
}

pub fn upto_times(args: &[Value], count: usize, site: &mut CallSite<'_>) -> EvalResult<Batch> {
    let range = upto_range(args, site.line)?;
    Ok(sample(range, count, site))
}
