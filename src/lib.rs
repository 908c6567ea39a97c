//! # daho
//!
//! Dynamic weighted multi-pattern counting with Aho-Corasick automata.
//!
//! An [`Automaton`] holds a multiset of byte patterns. Patterns can be added
//! or withdrawn at any time, each with an integer multiplicity, and a request
//! returns the weighted number of pattern occurrences in a text in a single
//! linear pass, counting overlapping occurrences.
//!
//! Fail links are rebuilt lazily: a burst of updates followed by a request
//! costs one rebuild.
//!
//! ## Example
//!
//! ```rust
//! use daho::prelude::*;
//!
//! let mut automaton = Automaton::new(5)?;
//! automaton.insert("hello", 2)?;
//! automaton.insert("abc", 1)?;
//! assert_eq!(automaton.request("hello world aabc"), 3);
//!
//! automaton.insert("a", 1)?;
//! assert_eq!(automaton.request("hello world aabc"), 5);
//!
//! automaton.resize(15)?;
//! assert_eq!(automaton.request("hello world aabc"), 5);
//! # Ok::<(), daho::AutomatonError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod automaton;
pub mod builder;
pub mod error;
pub mod shared;

/// Command-line front end
#[cfg(feature = "cli")]
pub mod cli;

pub use automaton::{Automaton, AutomatonStats, DEFAULT_BUCKET_COUNT};
pub use builder::AutomatonBuilder;
pub use error::{AutomatonError, Result};
pub use shared::SharedAutomaton;

/// Common imports for convenient usage
pub mod prelude {
    pub use crate::automaton::{Automaton, AutomatonStats, DEFAULT_BUCKET_COUNT};
    pub use crate::builder::AutomatonBuilder;
    pub use crate::error::{AutomatonError, Result};
    pub use crate::shared::SharedAutomaton;
}
