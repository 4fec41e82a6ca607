use rand::{Rng, distributions::Uniform, seq::SliceRandom};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::{core::EvalResult, function::core::CallSite, unique::UniqueKey},
        value::{batch::Batch, core::Value},
    },
};

/// The candidate list of a choice call.
///
/// A single list argument supplies the candidates itself; otherwise every
/// argument is one candidate.
///
/// # Example
/// ```
/// use rulegen::interpreter::{evaluator::function::choice::candidates, value::core::Value};
///
/// let list = Value::from(vec![Value::from("a"), Value::from("b")]);
///
/// assert_eq!(candidates(&[list]).len(), 2);
/// assert_eq!(candidates(&[Value::from("a"), Value::from("b"), Value::from("c")]).len(), 3);
/// ```
#[must_use]
pub fn candidates(args: &[Value]) -> &[Value] {
    match args {
        [Value::List(items)] => items,
        _ => args,
    }
}

fn non_empty<'a>(args: &'a [Value], site: &CallSite<'_>) -> EvalResult<&'a [Value]> {
    let candidates = candidates(args);
    if candidates.is_empty() {
        return Err(RuntimeError::EmptyChoice { line: site.line });
    }
    Ok(candidates)
}

/// `one_of(...)`: a uniformly random candidate.
pub fn one_of(args: &[Value], site: &mut CallSite<'_>) -> EvalResult<(Value, bool)> {
    let candidates = non_empty(args, site)?;
    let value = candidates.choose(&mut *site.rng)
                          .cloned()
                          .ok_or(RuntimeError::EmptyChoice { line: site.line })?;
    Ok((value, false))
}

pub fn one_of_times(args: &[Value], count: usize, site: &mut CallSite<'_>) -> EvalResult<Batch> {
    let candidates = non_empty(args, site)?;
    let indices = Uniform::from(0..candidates.len());
    let values = (&mut *site.rng).sample_iter(indices)
                                 .take(count)
                                 .map(|index| candidates[index].clone())
                                 .collect();
    Ok(Batch::Many(values))
}

/// `one_of_unique(...)`: a random candidate that this call site has not
/// produced before in the current run.
pub fn one_of_unique(args: &[Value], site: &mut CallSite<'_>) -> EvalResult<(Value, bool)> {
    let key = UniqueKey::new(site.rule, candidates(args));
    let value = site.pool.draw_unique(&key, &mut *site.rng, site.line)?;
    Ok((value, false))
}

pub fn one_of_unique_times(args: &[Value], count: usize, site: &mut CallSite<'_>) -> EvalResult<Batch> {
    if count == 1 {
        let (value, _) = one_of_unique(args, site)?;
        return Ok(Batch::Many(vec![value]));
    }

    let key = UniqueKey::new(site.rule, candidates(args));
    let values = site.pool.draw_unique_many(&key, count, &mut *site.rng, site.line)?;
    Ok(Batch::Many(values))
}
