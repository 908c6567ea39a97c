//! Pattern multiplicity bookkeeping.

use rustc_hash::FxHashMap;

use crate::error::{AutomatonError, Result};

/// Outcome of applying a delta to a pattern's multiplicity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct RegistryUpdate {
    /// The pattern had never been registered before.
    pub(crate) is_new: bool,
    /// Multiplicity after the delta was applied.
    pub(crate) multiplicity: i64,
}

/// Map from pattern to its current multiplicity.
///
/// Entries are never removed by withdrawals: a pattern withdrawn down to zero
/// (or below) keeps its entry so a later insert finds it again. Only
/// compaction drops zero entries.
#[derive(Clone, Debug, Default)]
pub(crate) struct PatternRegistry {
    entries: FxHashMap<Box<[u8]>, i64>,
    zeroed: usize,
}

impl PatternRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Number of distinct patterns ever registered.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn contains(&self, pattern: &[u8]) -> bool {
        self.entries.contains_key(pattern)
    }

    pub(crate) fn multiplicity(&self, pattern: &[u8]) -> Option<i64> {
        self.entries.get(pattern).copied()
    }

    /// Number of registered patterns whose multiplicity is currently zero.
    pub(crate) fn zeroed(&self) -> usize {
        self.zeroed
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&[u8], i64)> + '_ {
        self.entries.iter().map(|(k, &v)| (&**k, v))
    }

    /// Add `delta` to the multiplicity of `pattern`, registering it if unseen.
    ///
    /// Fails only if a new entry cannot be allocated, in which case the
    /// registry is unchanged.
    pub(crate) fn apply(&mut self, pattern: &[u8], delta: i64) -> Result<RegistryUpdate> {
        if let Some(count) = self.entries.get_mut(pattern) {
            let before = *count;
            *count = count.wrapping_add(delta);
            let after = *count;
            match (before == 0, after == 0) {
                (true, false) => self.zeroed -= 1,
                (false, true) => self.zeroed += 1,
                _ => {}
            }
            return Ok(RegistryUpdate {
                is_new: false,
                multiplicity: after,
            });
        }

        let mut key = Vec::new();
        key.try_reserve_exact(pattern.len())
            .map_err(|_| AutomatonError::AllocationFailure("pattern registry"))?;
        key.extend_from_slice(pattern);
        self.entries
            .try_reserve(1)
            .map_err(|_| AutomatonError::AllocationFailure("pattern registry"))?;
        self.entries.insert(key.into_boxed_slice(), delta);
        if delta == 0 {
            self.zeroed += 1;
        }
        Ok(RegistryUpdate {
            is_new: true,
            multiplicity: delta,
        })
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.zeroed = 0;
    }
}
