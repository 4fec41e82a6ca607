use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use indexmap::IndexSet;
use rand::Rng;
use tracing::trace;

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
};

/// Identifies one uniqueness pool entry.
///
/// A call site inside a rule is keyed by the rule's name together with its
/// candidate list; a call outside any rule is keyed by the candidate list
/// alone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UniqueKey {
    rule:       Option<String>,
    candidates: Arc<[Value]>,
}

impl UniqueKey {
    /// Creates the key for a `one_of_unique` call site.
    #[must_use]
    pub fn new(rule: Option<&str>, candidates: &[Value]) -> Self {
        Self { rule:       rule.map(str::to_string),
               candidates: Arc::from(candidates), }
    }

    /// The rule the call site belongs to, if any.
    #[must_use]
    pub fn rule(&self) -> Option<&str> {
        self.rule.as_deref()
    }
}

type Entry = Arc<Mutex<IndexSet<Value>>>;

/// The remaining candidates of every pool entry at one point in time.
///
/// Taken with [`UniquenessPool::checkpoint`] and put back with
/// [`UniquenessPool::restore`].
#[derive(Debug)]
pub struct Checkpoint {
    entries: HashMap<UniqueKey, IndexSet<Value>>,
}

/// The candidates `one_of_unique` has not emitted yet, per key.
///
/// One pool lives for a whole run and is shared by reference between all
/// workers. The map lock is only held to find or create an entry; draws
/// serialize on the entry's own lock, so unrelated rules never contend.
/// An entry starts out as the de-duplicated candidate list and only shrinks.
///
/// ## Example
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use rulegen::interpreter::{evaluator::unique::{UniqueKey, UniquenessPool},
///                            value::core::Value};
///
/// let pool = UniquenessPool::new();
/// let key = UniqueKey::new(Some("coin"), &[Value::from("heads"), Value::from("tails")]);
/// let mut rng = StdRng::seed_from_u64(1);
///
/// let first = pool.draw_unique(&key, &mut rng, 1).unwrap();
/// let second = pool.draw_unique(&key, &mut rng, 1).unwrap();
///
/// assert_ne!(first, second);
/// assert!(pool.draw_unique(&key, &mut rng, 1).is_err());
/// ```
#[derive(Debug, Default)]
pub struct UniquenessPool {
    entries: Mutex<HashMap<UniqueKey, Entry>>,
}

impl UniquenessPool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns one uniformly chosen candidate.
    ///
    /// # Errors
    /// `UniquePoolExhausted` if every candidate of `key` has been emitted.
    pub fn draw_unique(&self, key: &UniqueKey, rng: &mut impl Rng, line: usize) -> EvalResult<Value> {
        let entry = self.entry(key);
        let mut remaining = lock(&entry);

        if remaining.is_empty() {
            return Err(RuntimeError::UniquePoolExhausted { line });
        }

        let index = rng.gen_range(0..remaining.len());
        remaining.swap_remove_index(index)
                 .ok_or(RuntimeError::UniquePoolExhausted { line })
    }

    /// Removes and returns `count` candidates sampled without replacement.
    ///
    /// Either all `count` values are removed or none are.
    ///
    /// # Errors
    /// `UniquePoolInsufficient` if fewer than `count` candidates remain; the
    /// entry is left untouched.
    pub fn draw_unique_many(&self,
                            key: &UniqueKey,
                            count: usize,
                            rng: &mut impl Rng,
                            line: usize)
                            -> EvalResult<Vec<Value>> {
        let entry = self.entry(key);
        let mut remaining = lock(&entry);

        if remaining.len() < count {
            return Err(RuntimeError::UniquePoolInsufficient { requested: count,
                                                              remaining: remaining.len(),
                                                              line });
        }

        let mut drawn = Vec::with_capacity(count);
        for _ in 0..count {
            let index = rng.gen_range(0..remaining.len());
            drawn.extend(remaining.swap_remove_index(index));
        }
        trace!(rule = key.rule(), count, left = remaining.len(), "unique draw");

        Ok(drawn)
    }

    /// How many candidates are left for `key`, or `None` if it was never
    /// drawn from.
    #[must_use]
    pub fn remaining(&self, key: &UniqueKey) -> Option<usize> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).map(|entry| lock(entry).len())
    }

    /// Copies the current state of every entry.
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Checkpoint { entries: entries.iter()
                                     .map(|(key, entry)| (key.clone(), lock(entry).clone()))
                                     .collect(), }
    }

    /// Returns every entry to the state recorded in `checkpoint`.
    ///
    /// Entries created after the checkpoint are dropped again. Must not run
    /// while other threads are drawing from the pool.
    ///
    /// ## Example
    /// ```
    /// use rand::{SeedableRng, rngs::StdRng};
    /// use rulegen::interpreter::{evaluator::unique::{UniqueKey, UniquenessPool},
    ///                            value::core::Value};
    ///
    /// let pool = UniquenessPool::new();
    /// let key = UniqueKey::new(None, &[Value::Integer(1), Value::Integer(2)]);
    /// let mut rng = StdRng::seed_from_u64(3);
    ///
    /// let checkpoint = pool.checkpoint();
    /// pool.draw_unique(&key, &mut rng, 1).unwrap();
    /// pool.restore(checkpoint);
    ///
    /// assert_eq!(pool.remaining(&key), None);
    /// ```
    pub fn restore(&self, checkpoint: Checkpoint) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|key, _| checkpoint.entries.contains_key(key));

        for (key, saved) in checkpoint.entries {
            match entries.get(&key) {
                Some(entry) => *lock(entry) = saved,
                None => {
                    entries.insert(key, Arc::new(Mutex::new(saved)));
                },
            }
        }
    }

    /// Finds the entry for `key`, creating it from the key's candidates on
    /// first use.
    fn entry(&self, key: &UniqueKey) -> Entry {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.entry(key.clone()).or_insert_with(|| {
                                                  Arc::new(Mutex::new(key.candidates
                                                                         .iter()
                                                                         .cloned()
                                                                         .collect()))
                                              });
        Arc::clone(entry)
    }
}

/// Entries are never left half-updated, so a poisoned lock is still usable.
fn lock(entry: &Mutex<IndexSet<Value>>) -> MutexGuard<'_, IndexSet<Value>> {
    entry.lock().unwrap_or_else(PoisonError::into_inner)
}
