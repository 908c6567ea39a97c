//! Dynamic weighted Aho-Corasick automaton.
//!
//! The automaton keeps a multiset of byte patterns and answers, for any text,
//! the weighted number of pattern occurrences in it: each occurrence of a
//! pattern contributes its current multiplicity, overlapping occurrences all
//! count, and several patterns ending at the same position all contribute.
//!
//! # Components
//!
//! - `transitions`: per-node hashed goto tables with an automaton-wide
//!   bucket count
//! - `build`: trie extension on insert and lazy breadth-first recomputation
//!   of fail links and aggregate weights
//! - `scan`: the linear-time text walk
//! - `registry`: pattern multiplicities
//!
//! # Staleness
//!
//! Inserts and withdrawals only extend the trie and adjust weights; they mark
//! the automaton stale. The next [`Automaton::request`] rebuilds every fail
//! link and aggregate weight in one pass, then scans. Bursts of updates
//! therefore cost one rebuild, not one per update.
//!
//! ```rust
//! use daho::Automaton;
//!
//! let mut automaton = Automaton::new(5)?;
//! automaton.insert("hello", 2)?;
//! automaton.add("abc")?;
//! assert_eq!(automaton.request("hello world aabc"), 3);
//!
//! automaton.withdraw("hello", 1)?;
//! assert_eq!(automaton.request("hello world aabc"), 2);
//! # Ok::<(), daho::AutomatonError>(())
//! ```

mod build;
mod node;
mod registry;
mod scan;
mod transitions;

use std::fmt;

use tracing::debug;

use crate::error::{AutomatonError, Result};
use node::{Node, NodeId};
use registry::PatternRegistry;

/// Bucket count used when none is given.
pub const DEFAULT_BUCKET_COUNT: usize = 10;

/// A dynamic multi-pattern counting automaton.
///
/// Nodes live in an arena and refer to each other by 32-bit ids; fail links
/// and transition entries are plain indices into that arena.
///
/// # Thread Safety
///
/// Mutation and querying take `&mut self`. Wrap the automaton in
/// [`SharedAutomaton`](crate::shared::SharedAutomaton) to share one pattern
/// set between threads.
///
/// # Performance
///
/// - Insert: O(m) for a pattern of length m
/// - Request: O(n) for a text of length n, plus one rebuild after mutations
/// - Rebuild: amortized linear in the total pattern length
/// - Resize: O(nodes × fan-out)
#[derive(Clone)]
pub struct Automaton {
    nodes: Vec<Node>,
    registry: PatternRegistry,
    bucket_count: usize,
    stale: bool,
    builds: u64,
}

/// Size and shape figures for an automaton.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AutomatonStats {
    /// Distinct patterns ever inserted (until compaction)
    pub patterns: usize,
    /// Nodes in the arena, root included
    pub nodes: usize,
    /// Goto transitions across all nodes
    pub transitions: usize,
    /// Configured bucket count
    pub bucket_count: usize,
    /// Longest bucket chain across all transition tables
    pub longest_chain: usize,
}

impl Automaton {
    /// Create an empty automaton whose transition tables use `bucket_count`
    /// buckets.
    ///
    /// # Errors
    ///
    /// Returns [`AutomatonError::InvalidBucketCount`] if `bucket_count` is 0.
    pub fn new(bucket_count: usize) -> Result<Self> {
        if bucket_count == 0 {
            return Err(AutomatonError::InvalidBucketCount(bucket_count));
        }
        Ok(Self::with_valid_bucket_count(bucket_count))
    }

    fn with_valid_bucket_count(bucket_count: usize) -> Self {
        Automaton {
            nodes: vec![Node::new()],
            registry: PatternRegistry::new(),
            bucket_count,
            stale: false,
            builds: 0,
        }
    }

    /// Create an automaton holding each of `patterns` once.
    pub fn from_patterns<I, P>(bucket_count: usize, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let mut automaton = Self::new(bucket_count)?;
        automaton.extend(patterns)?;
        Ok(automaton)
    }

    /// Add `delta` to the multiplicity of `pattern`.
    ///
    /// A negative delta withdraws occurrences. Multiplicities are not clamped:
    /// withdrawing more than was inserted leaves a negative multiplicity that
    /// subtracts from later counts.
    ///
    /// # Errors
    ///
    /// - [`AutomatonError::EmptyPattern`] if `pattern` is empty
    /// - [`AutomatonError::AllocationFailure`] if the trie cannot grow
    ///
    /// On error the automaton is unchanged.
    pub fn insert<P: AsRef<[u8]>>(&mut self, pattern: P, delta: i64) -> Result<()> {
        self.insert_bytes(pattern.as_ref(), delta).map(|_| ())
    }

    /// Insert one occurrence of `pattern`.
    pub fn add<P: AsRef<[u8]>>(&mut self, pattern: P) -> Result<()> {
        self.insert(pattern, 1)
    }

    /// Withdraw `count` occurrences of `pattern`.
    pub fn withdraw<P: AsRef<[u8]>>(&mut self, pattern: P, count: i64) -> Result<()> {
        self.insert(pattern, count.wrapping_neg())
    }

    /// Insert one occurrence of each pattern.
    ///
    /// Stops at the first failing pattern; the patterns before it stay
    /// inserted. Returns how many of the patterns were new to the automaton.
    pub fn extend<I, P>(&mut self, patterns: I) -> Result<usize>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<[u8]>,
    {
        let mut added = 0;
        for pattern in patterns {
            if self.insert_bytes(pattern.as_ref(), 1)?.is_new {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Weighted number of pattern occurrences in `text`.
    ///
    /// Rebuilds fail links and aggregate weights first if the automaton was
    /// mutated since the last request.
    pub fn request<T: AsRef<[u8]>>(&mut self, text: T) -> i64 {
        self.ensure_built();
        self.scan(text.as_ref())
    }

    /// Change the bucket count of every transition table.
    ///
    /// Matching results are unaffected. Fail links and aggregates stay valid,
    /// so this does not make the automaton stale.
    ///
    /// # Errors
    ///
    /// - [`AutomatonError::InvalidBucketCount`] if `bucket_count` is 0
    /// - [`AutomatonError::AllocationFailure`] if the new tables cannot be
    ///   allocated; every new table is built before any is swapped in, so the
    ///   automaton is unchanged
    pub fn resize(&mut self, bucket_count: usize) -> Result<()> {
        if bucket_count == 0 {
            return Err(AutomatonError::InvalidBucketCount(bucket_count));
        }
        if bucket_count == self.bucket_count {
            return Ok(());
        }

        let mut tables = Vec::new();
        tables
            .try_reserve_exact(self.nodes.len())
            .map_err(|_| AutomatonError::AllocationFailure("transition table"))?;
        for node in &self.nodes {
            tables.push(node.transitions.rehashed(bucket_count)?);
        }
        for (node, table) in self.nodes.iter_mut().zip(tables) {
            node.transitions = table;
        }

        let previous = std::mem::replace(&mut self.bucket_count, bucket_count);
        debug!(
            from = previous,
            to = bucket_count,
            nodes = self.nodes.len(),
            "resized transition tables"
        );
        Ok(())
    }

    /// Current bucket count of the transition tables.
    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// Current multiplicity of `pattern`, or `None` if it was never inserted.
    pub fn multiplicity<P: AsRef<[u8]>>(&self, pattern: P) -> Option<i64> {
        self.registry.multiplicity(pattern.as_ref())
    }

    /// Number of distinct patterns ever inserted, including those withdrawn
    /// down to zero.
    pub fn pattern_count(&self) -> usize {
        self.registry.len()
    }

    /// Number of nodes in the arena, root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Check if no pattern has been inserted.
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Iterate over every registered pattern and its multiplicity, in no
    /// particular order.
    pub fn patterns(&self) -> impl Iterator<Item = (&[u8], i64)> + '_ {
        self.registry.iter()
    }

    /// Check if fail links and aggregates are out of date.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Number of rebuilds performed so far.
    pub fn build_count(&self) -> u64 {
        self.builds
    }

    /// Check if compaction would free anything.
    ///
    /// Returns `true` if some registered pattern has multiplicity zero.
    pub fn needs_compaction(&self) -> bool {
        self.registry.zeroed() > 0
    }

    /// Drop zero-multiplicity patterns and the nodes only they were using.
    ///
    /// Rebuilds the arena from the surviving patterns, inserted in sorted
    /// order. Request results are unchanged. Returns the number of nodes
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns [`AutomatonError::AllocationFailure`] if the new arena cannot
    /// be built; the automaton is then unchanged.
    pub fn compact(&mut self) -> Result<usize> {
        if !self.needs_compaction() {
            return Ok(0);
        }

        let mut live: Vec<(&[u8], i64)> = self.registry.iter().filter(|&(_, m)| m != 0).collect();
        live.sort_unstable();

        let mut compacted = Self::with_valid_bucket_count(self.bucket_count);
        compacted.builds = self.builds;
        for (pattern, multiplicity) in live {
            compacted.insert_bytes(pattern, multiplicity)?;
        }

        let removed = self.nodes.len().saturating_sub(compacted.nodes.len());
        let dropped = self.registry.len() - compacted.registry.len();
        *self = compacted;
        debug!(
            removed_nodes = removed,
            dropped_patterns = dropped,
            nodes = self.nodes.len(),
            "compacted automaton"
        );
        Ok(removed)
    }

    /// Remove every pattern and node, keeping the bucket count.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[NodeId::ROOT.index()] = Node::new();
        self.registry.clear();
        self.stale = false;
    }

    /// Size and shape figures.
    pub fn stats(&self) -> AutomatonStats {
        AutomatonStats {
            patterns: self.registry.len(),
            nodes: self.nodes.len(),
            transitions: self.nodes.iter().map(|n| n.transitions.len()).sum(),
            bucket_count: self.bucket_count,
            longest_chain: self
                .nodes
                .iter()
                .map(|n| n.transitions.longest_chain())
                .max()
                .unwrap_or(0),
        }
    }
}

impl Default for Automaton {
    fn default() -> Self {
        Self::with_valid_bucket_count(DEFAULT_BUCKET_COUNT)
    }
}

impl fmt::Debug for Automaton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Automaton")
            .field("patterns", &self.registry.len())
            .field("nodes", &self.nodes.len())
            .field("bucket_count", &self.bucket_count)
            .field("stale", &self.stale)
            .finish()
    }
}
