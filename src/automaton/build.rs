//! Trie extension and lazy failure-link construction.
//!
//! Inserting a pattern only touches the trie: the registry multiplicity and
//! the terminal node's own weight change, missing nodes are appended to the
//! arena, and the automaton is marked stale. Fail links and aggregate weights
//! are recomputed in one breadth-first pass the next time a query needs them.

use std::collections::VecDeque;

use tracing::{debug, trace};

use super::node::{Node, NodeId};
use super::registry::RegistryUpdate;
use super::Automaton;
use crate::error::{AutomatonError, Result};

/// Largest index a node may occupy in the arena.
#[cfg(not(test))]
const MAX_NODE_INDEX: usize = u32::MAX as usize;
#[cfg(test)]
const MAX_NODE_INDEX: usize = 1023;

impl Automaton {
    /// Register `delta` more occurrences of `pattern`, extending the trie as
    /// needed.
    ///
    /// Every fallible step (arena growth, the new chain's tables, the slot in
    /// the attach point's table, the registry entry) runs before anything
    /// reachable from root is modified.
    pub(crate) fn insert_bytes(&mut self, pattern: &[u8], delta: i64) -> Result<RegistryUpdate> {
        if pattern.is_empty() {
            return Err(AutomatonError::EmptyPattern);
        }

        // Follow the longest existing prefix
        let mut node = NodeId::ROOT;
        let mut depth = 0;
        while let Some(next) = pattern
            .get(depth)
            .and_then(|&symbol| self.nodes[node.index()].transitions.get(symbol))
        {
            node = next;
            depth += 1;
        }

        let (terminal, update) = if depth == pattern.len() {
            (node, self.registry.apply(pattern, delta)?)
        } else {
            debug_assert!(!self.registry.contains(pattern));
            let tail = &pattern[depth..];
            let first = self.nodes.len();
            if first + tail.len() - 1 > MAX_NODE_INDEX {
                return Err(AutomatonError::AllocationFailure("node arena"));
            }
            self.nodes
                .try_reserve(tail.len())
                .map_err(|_| AutomatonError::AllocationFailure("node arena"))?;
            let chain = self.new_chain(first, &tail[1..])?;
            self.nodes[node.index()]
                .transitions
                .reserve_slot(tail[0], self.bucket_count)?;
            let update = self.registry.apply(pattern, delta)?;

            // Slot and capacity reserved above
            self.nodes[node.index()]
                .transitions
                .set(tail[0], NodeId::new(first), self.bucket_count)?;
            self.nodes.extend(chain);
            trace!(
                depth,
                created = tail.len(),
                nodes = self.nodes.len(),
                "extended trie"
            );
            (NodeId::new(self.nodes.len() - 1), update)
        };

        let weight = &mut self.nodes[terminal.index()].own_weight;
        *weight = weight.wrapping_add(delta);
        self.stale = true;
        Ok(update)
    }

    /// Build the detached node chain for the symbols after the first missing
    /// one. Node `i` of the chain will live at arena index `first + i`.
    fn new_chain(&self, first: usize, rest: &[u8]) -> Result<Vec<Node>> {
        let mut chain = Vec::new();
        chain
            .try_reserve_exact(rest.len() + 1)
            .map_err(|_| AutomatonError::AllocationFailure("node arena"))?;
        for (offset, &symbol) in rest.iter().enumerate() {
            let mut node = Node::new();
            node.transitions
                .set(symbol, NodeId::new(first + offset + 1), self.bucket_count)?;
            chain.push(node);
        }
        chain.push(Node::new());
        Ok(chain)
    }

    /// Rebuild fail links and aggregate weights if anything changed since the
    /// last build.
    pub(crate) fn ensure_built(&mut self) {
        if self.stale {
            self.build();
        }
    }

    /// Recompute every fail link and aggregate weight breadth-first.
    ///
    /// A fail target always sits at a strictly smaller depth, so by the time a
    /// node is dequeued its fail target's aggregate is final.
    fn build(&mut self) {
        let mut queue = VecDeque::with_capacity(self.nodes.len());
        let mut children: Vec<(u8, NodeId)> = Vec::new();

        let root = &mut self.nodes[NodeId::ROOT.index()];
        root.fail = NodeId::ROOT;
        root.agg_weight = root.own_weight;
        children.extend(root.transitions.iter());
        for &(_, child) in &children {
            self.nodes[child.index()].fail = NodeId::ROOT;
            queue.push_back(child);
        }

        while let Some(id) = queue.pop_front() {
            let fail = self.nodes[id.index()].fail;
            let inherited = self.nodes[fail.index()].agg_weight;
            let node = &mut self.nodes[id.index()];
            node.agg_weight = node.own_weight.wrapping_add(inherited);

            children.clear();
            children.extend(node.transitions.iter());
            for &(symbol, child) in &children {
                let target = self.next_state(fail, symbol);
                self.nodes[child.index()].fail = target;
                queue.push_back(child);
            }
        }

        self.stale = false;
        self.builds += 1;
        debug!(
            nodes = self.nodes.len(),
            patterns = self.registry.len(),
            builds = self.builds,
            "rebuilt automaton"
        );
    }
}
