//! Hashed per-node transition storage.
//!
//! Every node owns a [`TransitionTable`] mapping an input byte to a child
//! node. A table is an array of `bucket_count` chains; a byte lands in the
//! bucket given by its Fx hash modulo the bucket count, and collisions are
//! resolved by a short linear chain. The bucket count is chosen by the
//! automaton and applied uniformly to every table, so changing it means
//! rehashing every node.
//!
//! Tables of leaf nodes hold no buckets at all until their first child is
//! linked in; the bucket array is allocated at the automaton's bucket count
//! on first insertion.

use std::hash::Hasher;

use rustc_hash::FxHasher;
use smallvec::SmallVec;

use super::node::NodeId;
use crate::error::{AutomatonError, Result};

/// One bucket chain. Most buckets hold zero or one entry.
type Chain = SmallVec<[(u8, NodeId); 2]>;

/// Map a symbol to its bucket.
#[inline]
pub(crate) fn bucket_index(symbol: u8, bucket_count: usize) -> usize {
    debug_assert!(bucket_count > 0);
    let mut hasher = FxHasher::default();
    hasher.write_u8(symbol);
    (hasher.finish() as usize) % bucket_count
}

/// Hashed mapping from symbol to child node.
#[derive(Clone, Debug, Default)]
pub(crate) struct TransitionTable {
    buckets: Vec<Chain>,
    len: usize,
}

impl TransitionTable {
    /// Create an empty table without any buckets.
    pub(crate) fn new() -> Self {
        TransitionTable {
            buckets: Vec::new(),
            len: 0,
        }
    }

    /// Number of transitions stored.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated buckets (zero for a table that never held a child).
    #[cfg(test)]
    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Look up the child reached on `symbol`.
    #[inline]
    pub(crate) fn get(&self, symbol: u8) -> Option<NodeId> {
        if self.buckets.is_empty() {
            return None;
        }
        self.buckets[bucket_index(symbol, self.buckets.len())]
            .iter()
            .find(|(s, _)| *s == symbol)
            .map(|&(_, child)| child)
    }

    /// Make sure a later `set` of `symbol` will not allocate.
    ///
    /// Allocates the bucket array at `bucket_count` if the table has none yet,
    /// and room for one more entry in the target chain.
    pub(crate) fn reserve_slot(&mut self, symbol: u8, bucket_count: usize) -> Result<()> {
        if self.buckets.is_empty() {
            let mut buckets = Vec::new();
            buckets
                .try_reserve_exact(bucket_count)
                .map_err(|_| AutomatonError::AllocationFailure("transition table"))?;
            buckets.resize_with(bucket_count, Chain::new);
            self.buckets = buckets;
        }
        let idx = bucket_index(symbol, self.buckets.len());
        let chain = &mut self.buckets[idx];
        if !chain.iter().any(|(s, _)| *s == symbol) {
            chain
                .try_reserve(1)
                .map_err(|_| AutomatonError::AllocationFailure("transition chain"))?;
        }
        Ok(())
    }

    /// Link `symbol` to `child`, replacing any previous target.
    ///
    /// Returns the previous target, if any.
    pub(crate) fn set(
        &mut self,
        symbol: u8,
        child: NodeId,
        bucket_count: usize,
    ) -> Result<Option<NodeId>> {
        self.reserve_slot(symbol, bucket_count)?;
        let idx = bucket_index(symbol, self.buckets.len());
        let chain = &mut self.buckets[idx];
        if let Some(entry) = chain.iter_mut().find(|(s, _)| *s == symbol) {
            return Ok(Some(std::mem::replace(&mut entry.1, child)));
        }
        chain.push((symbol, child));
        self.len += 1;
        Ok(None)
    }

    /// Iterate over all `(symbol, child)` pairs in bucket order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (u8, NodeId)> + '_ {
        self.buckets.iter().flat_map(|chain| chain.iter().copied())
    }

    /// Build a copy of this table laid out over `bucket_count` buckets.
    ///
    /// This table is left untouched so callers can rehash a whole arena
    /// before committing any of it.
    pub(crate) fn rehashed(&self, bucket_count: usize) -> Result<TransitionTable> {
        let mut table = TransitionTable::new();
        for (symbol, child) in self.iter() {
            table.set(symbol, child, bucket_count)?;
        }
        Ok(table)
    }

    /// Length of the longest bucket chain.
    pub(crate) fn longest_chain(&self) -> usize {
        self.buckets.iter().map(|chain| chain.len()).max().unwrap_or(0)
    }
}
