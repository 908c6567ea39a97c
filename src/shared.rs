//! Thread-safe handle to a shared automaton.
//!
//! [`SharedAutomaton`] wraps an [`Automaton`] in `Arc<RwLock<...>>`. Clones
//! share one pattern set. Mutations take the write lock. Requests on a fresh
//! automaton only take the read lock, so any number of threads can count in
//! parallel; the first request after a mutation takes the write lock once to
//! rebuild.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockWriteGuard};

use crate::automaton::{Automaton, AutomatonStats};
use crate::error::Result;

/// A cloneable, thread-safe automaton handle.
///
/// # Example
///
/// ```rust
/// use daho::prelude::*;
/// use std::thread;
///
/// let shared = SharedAutomaton::new(8)?;
/// shared.insert("ab", 1)?;
///
/// let reader = shared.clone();
/// let count = thread::spawn(move || reader.request("abab")).join().unwrap();
/// assert_eq!(count, 2);
/// # Ok::<(), daho::AutomatonError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct SharedAutomaton {
    inner: Arc<RwLock<Automaton>>,
}

impl SharedAutomaton {
    /// Create an empty shared automaton.
    pub fn new(bucket_count: usize) -> Result<Self> {
        Ok(Self::from_automaton(Automaton::new(bucket_count)?))
    }

    /// Share an existing automaton.
    pub fn from_automaton(automaton: Automaton) -> Self {
        SharedAutomaton {
            inner: Arc::new(RwLock::new(automaton)),
        }
    }

    /// Add `delta` to the multiplicity of `pattern`.
    pub fn insert<P: AsRef<[u8]>>(&self, pattern: P, delta: i64) -> Result<()> {
        self.inner.write().insert(pattern, delta)
    }

    /// Withdraw `count` occurrences of `pattern`.
    pub fn withdraw<P: AsRef<[u8]>>(&self, pattern: P, count: i64) -> Result<()> {
        self.inner.write().withdraw(pattern, count)
    }

    /// Insert one occurrence of each pattern under a single write lock.
    pub fn extend<I, P>(&self, patterns: I) -> Result<usize>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        self.inner.write().extend(patterns)
    }

    /// Weighted number of pattern occurrences in `text`.
    pub fn request<T: AsRef<[u8]>>(&self, text: T) -> i64 {
        let text = text.as_ref();
        {
            let automaton = self.inner.read();
            if !automaton.is_stale() {
                return automaton.scan(text);
            }
        }

        let mut automaton = self.inner.write();
        // Another writer may have rebuilt in between
        automaton.ensure_built();
        let automaton = RwLockWriteGuard::downgrade(automaton);
        automaton.scan(text)
    }

    /// Change the bucket count of every transition table.
    pub fn resize(&self, bucket_count: usize) -> Result<()> {
        self.inner.write().resize(bucket_count)
    }

    /// Drop zero-multiplicity patterns and their unused nodes.
    pub fn compact(&self) -> Result<usize> {
        self.inner.write().compact()
    }

    /// Current bucket count.
    pub fn bucket_count(&self) -> usize {
        self.inner.read().bucket_count()
    }

    /// Current multiplicity of `pattern`.
    pub fn multiplicity<P: AsRef<[u8]>>(&self, pattern: P) -> Option<i64> {
        self.inner.read().multiplicity(pattern)
    }

    /// Number of distinct patterns ever inserted.
    pub fn pattern_count(&self) -> usize {
        self.inner.read().pattern_count()
    }

    /// Number of rebuilds performed so far.
    pub fn build_count(&self) -> u64 {
        self.inner.read().build_count()
    }

    /// Size and shape figures.
    pub fn stats(&self) -> AutomatonStats {
        self.inner.read().stats()
    }

    /// Run `f` with shared access to the automaton.
    pub fn with_read<R>(&self, f: impl FnOnce(&Automaton) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access to the automaton.
    pub fn with_write<R>(&self, f: impl FnOnce(&mut Automaton) -> R) -> R {
        f(&mut self.inner.write())
    }
}

impl From<Automaton> for SharedAutomaton {
    fn from(automaton: Automaton) -> Self {
        Self::from_automaton(automaton)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let shared = SharedAutomaton::new(4).unwrap();
        let other = shared.clone();

        shared.insert("abc", 2).unwrap();
        assert_eq!(other.multiplicity("abc"), Some(2));
        assert_eq!(other.request("abcabc"), 4);
    }

    #[test]
    fn test_request_rebuilds_once() {
        let shared = SharedAutomaton::new(4).unwrap();
        shared.extend(["a", "ab"]).unwrap();

        assert_eq!(shared.request("ab"), 2);
        assert_eq!(shared.request("ab"), 2);
        assert_eq!(shared.build_count(), 1);

        shared.withdraw("ab", 1).unwrap();
        assert_eq!(shared.request("ab"), 1);
        assert_eq!(shared.build_count(), 2);
    }

    #[test]
    fn test_resize_and_compact() {
        let shared: SharedAutomaton = Automaton::from_patterns(3, ["xy", "xyz"]).unwrap().into();
        shared.withdraw("xyz", 1).unwrap();
        shared.resize(9).unwrap();
        assert_eq!(shared.bucket_count(), 9);
        assert_eq!(shared.compact().unwrap(), 1);
        assert_eq!(shared.request("xyz"), 1);
        assert_eq!(shared.stats().nodes, 3);
    }

    #[test]
    fn test_with_read_and_write() {
        let shared = SharedAutomaton::default();
        shared.with_write(|a| a.add("q")).unwrap();
        assert!(shared.with_read(|a| a.is_stale()));
        assert_eq!(shared.request("qq"), 2);
        assert!(!shared.with_read(|a| a.is_stale()));
    }
}
