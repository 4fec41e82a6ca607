use crate::interpreter::value::core::Value;

/// A finite sequence of generated values, one per requested repetition.
///
/// A `Repeat` batch holds a single value that was derived without consuming
/// randomness and stands for `count` copies of it; it is the only constant
/// form and the signal that selects a builtin's vectorized path. A `Many`
/// batch holds one value per repetition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Batch {
    /// `count` copies of the same constant value.
    Repeat {
        /// The repeated value.
        value: Value,
        /// How many times it is repeated.
        count: usize,
    },
    /// One independently generated value per repetition.
    Many(Vec<Value>),
}

impl Batch {
    /// Creates a constant batch of `count` copies of `value`.
    ///
    /// # Example
    /// ```
    /// use rulegen::interpreter::value::{batch::Batch, core::Value};
    ///
    /// let batch = Batch::repeat(Value::Integer(4), 3);
    ///
    /// assert!(batch.is_constant());
    /// assert_eq!(batch.into_values(), vec![Value::Integer(4); 3]);
    /// ```
    #[must_use]
    pub const fn repeat(value: Value, count: usize) -> Self {
        Self::Repeat { value, count }
    }

    /// Whether every element is the same randomness-free value.
    #[must_use]
    pub const fn is_constant(&self) -> bool {
        matches!(self, Self::Repeat { .. })
    }

    /// The number of repetitions this batch stands for.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Repeat { count, .. } => *count,
            Self::Many(values) => values.len(),
        }
    }

    /// Whether the batch holds zero repetitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the value at repetition `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Value> {
        match self {
            Self::Repeat { value, count } => (index < *count).then_some(value),
            Self::Many(values) => values.get(index),
        }
    }

    /// Returns a value standing for the whole batch when it is constant.
    ///
    /// For a non-constant batch this is simply the first element.
    #[must_use]
    pub fn representative(&self) -> Option<&Value> {
        match self {
            Self::Repeat { value, .. } => Some(value),
            Self::Many(values) => values.first(),
        }
    }

    /// Iterates over exactly [`Self::len`] values.
    #[must_use]
    pub const fn iter(&self) -> BatchIter<'_> {
        BatchIter { batch: self,
                    index: 0 }
    }

    /// Materializes the batch into one value per repetition.
    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        match self {
            Self::Repeat { value, count } => vec![value; count],
            Self::Many(values) => values,
        }
    }

    /// Stringifies every repetition, one output line each.
    ///
    /// # Example
    /// ```
    /// use rulegen::interpreter::value::{batch::Batch, core::Value};
    ///
    /// let batch = Batch::Many(vec![Value::Integer(1), Value::from("x")]);
    ///
    /// assert_eq!(batch.to_lines(), vec!["1".to_string(), "x".to_string()]);
    /// ```
    #[must_use]
    pub fn to_lines(&self) -> Vec<String> {
        match self {
            Self::Repeat { value, count } => vec![value.to_string(); *count],
            Self::Many(values) => values.iter().map(ToString::to_string).collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Batch {
    type IntoIter = BatchIter<'a>;
    type Item = &'a Value;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the values of a [`Batch`].
///
/// Always yields exactly `batch.len()` items, also for repeated batches.
#[derive(Debug, Clone)]
pub struct BatchIter<'a> {
    batch: &'a Batch,
    index: usize,
}

impl<'a> Iterator for BatchIter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.batch.get(self.index)?;
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.batch.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BatchIter<'_> {}
