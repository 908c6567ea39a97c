//! CLI argument definitions

use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

use crate::automaton::DEFAULT_BUCKET_COUNT;

#[derive(Parser)]
#[command(name = "daho")]
#[command(about = "Weighted multi-pattern counting with dynamic Aho-Corasick automata")]
#[command(version)]
pub struct Cli {
    /// Bucket count of every transition table
    #[arg(
        short = 'b',
        long,
        global = true,
        env = "DAHO_BUCKET_COUNT",
        default_value_t = DEFAULT_BUCKET_COUNT
    )]
    pub bucket_count: usize,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Count weighted pattern occurrences in texts
    Count {
        /// Pattern file: one pattern per line, optionally followed by a tab
        /// and an integer weight
        #[arg(short, long)]
        patterns: PathBuf,

        /// Texts to scan, taken as raw bytes; lines of stdin are scanned
        /// when none are given
        texts: Vec<OsString>,
    },

    /// Display automaton statistics for a pattern file
    Stats {
        /// Pattern file
        #[arg(short, long)]
        patterns: PathBuf,
    },
}
