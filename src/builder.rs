//! Builder pattern for creating Automaton instances.
//!
//! The `AutomatonBuilder` provides a fluent API for constructing an
//! [`Automaton`] with an initial pattern set, validating everything in
//! [`AutomatonBuilder::build`].

use crate::automaton::{Automaton, DEFAULT_BUCKET_COUNT};
use crate::error::Result;

/// Builder for constructing an [`Automaton`] with a fluent API.
///
/// # Example
///
/// ```rust
/// use daho::prelude::*;
///
/// let mut automaton = AutomatonBuilder::new()
///     .bucket_count(16)
///     .pattern("he")
///     .weighted_pattern("she", 3)
///     .build()?;
///
/// assert_eq!(automaton.request("ushers"), 4);
/// # Ok::<(), daho::AutomatonError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct AutomatonBuilder {
    bucket_count: Option<usize>,
    patterns: Vec<(Vec<u8>, i64)>,
}

impl AutomatonBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self {
        AutomatonBuilder {
            bucket_count: None,
            patterns: Vec::new(),
        }
    }

    /// Set the bucket count of every transition table.
    ///
    /// Defaults to [`DEFAULT_BUCKET_COUNT`]. A count of zero is rejected by
    /// [`build`](Self::build).
    pub fn bucket_count(mut self, bucket_count: usize) -> Self {
        self.bucket_count = Some(bucket_count);
        self
    }

    /// Queue one occurrence of `pattern`.
    pub fn pattern<P: AsRef<[u8]>>(self, pattern: P) -> Self {
        self.weighted_pattern(pattern, 1)
    }

    /// Queue `delta` occurrences of `pattern`.
    pub fn weighted_pattern<P: AsRef<[u8]>>(mut self, pattern: P, delta: i64) -> Self {
        self.patterns.push((pattern.as_ref().to_vec(), delta));
        self
    }

    /// Queue one occurrence of each pattern.
    pub fn patterns<I, P>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        self.patterns
            .extend(patterns.into_iter().map(|p| (p.as_ref().to_vec(), 1)));
        self
    }

    /// Build the `Automaton`.
    ///
    /// Patterns are inserted in the order they were queued.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the bucket count is zero
    /// - any queued pattern is empty
    /// - the trie cannot be allocated
    pub fn build(self) -> Result<Automaton> {
        let mut automaton = Automaton::new(self.bucket_count.unwrap_or(DEFAULT_BUCKET_COUNT))?;
        for (pattern, delta) in &self.patterns {
            automaton.insert(pattern, *delta)?;
        }
        Ok(automaton)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AutomatonError;

    #[test]
    fn test_builder_defaults() {
        let automaton = AutomatonBuilder::new().build().unwrap();
        assert_eq!(automaton.bucket_count(), DEFAULT_BUCKET_COUNT);
        assert!(automaton.is_empty());
    }

    #[test]
    fn test_builder_complete() {
        let mut automaton = AutomatonBuilder::new()
            .bucket_count(5)
            .weighted_pattern("hello", 2)
            .patterns(["abc", "a"])
            .build()
            .unwrap();

        assert_eq!(automaton.bucket_count(), 5);
        assert_eq!(automaton.pattern_count(), 3);
        assert_eq!(automaton.request("hello world aabc"), 5);
    }

    #[test]
    fn test_builder_zero_buckets() {
        let result = AutomatonBuilder::new().bucket_count(0).pattern("a").build();
        assert_eq!(result.unwrap_err(), AutomatonError::InvalidBucketCount(0));
    }

    #[test]
    fn test_builder_empty_pattern() {
        let result = AutomatonBuilder::new().pattern("a").pattern("").build();
        assert_eq!(result.unwrap_err(), AutomatonError::EmptyPattern);
    }

    #[test]
    fn test_builder_repeated_pattern_accumulates() {
        let automaton = AutomatonBuilder::new()
            .pattern("ab")
            .pattern("ab")
            .weighted_pattern("ab", -5)
            .build()
            .unwrap();
        assert_eq!(automaton.multiplicity("ab"), Some(-3));
    }
}
