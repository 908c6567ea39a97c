//! Linear-time weighted scanning.

use super::node::NodeId;
use super::Automaton;

impl Automaton {
    /// The goto function: the state reached from `state` on `symbol`,
    /// following fail links until a transition exists or root is reached.
    #[inline]
    pub(crate) fn next_state(&self, mut state: NodeId, symbol: u8) -> NodeId {
        loop {
            if let Some(next) = self.nodes[state.index()].transitions.get(symbol) {
                return next;
            }
            if state.is_root() {
                return NodeId::ROOT;
            }
            state = self.nodes[state.index()].fail;
        }
    }

    /// Sum the aggregate weight of every state visited while reading `text`.
    ///
    /// The automaton must be fresh; callers go through
    /// [`Automaton::request`] or rebuild first.
    pub(crate) fn scan(&self, text: &[u8]) -> i64 {
        debug_assert!(!self.stale, "scan on a stale automaton");
        let mut state = NodeId::ROOT;
        let mut total: i64 = 0;
        for &symbol in text {
            state = self.next_state(state, symbol);
            total = total.wrapping_add(self.nodes[state.index()].agg_weight);
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh(patterns: &[(&str, i64)]) -> Automaton {
        let mut automaton = Automaton::new(5).unwrap();
        for &(pattern, weight) in patterns {
            automaton.insert(pattern, weight).unwrap();
        }
        automaton.ensure_built();
        automaton
    }

    #[test]
    fn test_scan_empty_text() {
        let automaton = fresh(&[("abc", 1)]);
        assert_eq!(automaton.scan(b""), 0);
    }

    #[test]
    fn test_scan_empty_automaton() {
        let automaton = fresh(&[]);
        assert_eq!(automaton.scan(b"anything at all"), 0);
    }

    #[test]
    fn test_scan_overlapping() {
        let automaton = fresh(&[("aa", 1)]);
        assert_eq!(automaton.scan(b"aaaa"), 3);
    }

    #[test]
    fn test_scan_nested_patterns() {
        let automaton = fresh(&[("he", 1), ("she", 1), ("his", 1), ("hers", 1)]);
        // ushers: she, he, hers
        assert_eq!(automaton.scan(b"ushers"), 3);
    }

    #[test]
    fn test_scan_recovers_after_mismatch() {
        let automaton = fresh(&[("abcd", 1), ("bce", 5)]);
        assert_eq!(automaton.scan(b"abce"), 5);
        assert_eq!(automaton.scan(b"abcabcd"), 1);
    }

    #[test]
    fn test_next_state_from_root_on_unknown_symbol() {
        let automaton = fresh(&[("x", 1)]);
        assert_eq!(automaton.next_state(NodeId::ROOT, b'q'), NodeId::ROOT);
    }

    #[test]
    fn test_scan_binary_symbols() {
        let mut automaton = Automaton::new(2).unwrap();
        automaton.insert([0u8, 255], 4).unwrap();
        automaton.ensure_built();
        assert_eq!(automaton.scan(&[0, 255, 0, 0, 255]), 8);
    }
}
