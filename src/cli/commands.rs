//! CLI command implementations

use anyhow::{bail, Context, Result};
use colored::Colorize;
use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;
use tracing::{debug, info};

use crate::automaton::Automaton;

use super::args::Commands;

/// Execute a CLI command, reading texts from `input` when the command needs
/// them and none were given, and writing results to `out`.
pub fn execute<R: BufRead, W: Write>(
    command: Commands,
    bucket_count: usize,
    input: R,
    out: &mut W,
) -> Result<()> {
    match command {
        Commands::Count { patterns, texts } => {
            cmd_count(&patterns, bucket_count, &texts, input, out)
        }
        Commands::Stats { patterns } => cmd_stats(&patterns, bucket_count, out),
    }
}

/// Split `input` on `\n` into raw byte lines, dropping a trailing `\r`.
///
/// Lines need not be valid UTF-8.
fn byte_lines<R: BufRead>(input: R) -> impl Iterator<Item = io::Result<Vec<u8>>> {
    input.split(b'\n').map(|line| {
        line.map(|mut line| {
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            line
        })
    })
}

/// Parse one line of a pattern file.
///
/// Blank lines yield `None`. A line is either a bare pattern (weight 1) or a
/// pattern, a tab and a signed integer weight. Only the last tab separates
/// the weight, so patterns may themselves contain tabs. Patterns are raw
/// bytes; only the weight has to be text.
pub fn parse_pattern_line(line: &[u8]) -> Result<Option<(Vec<u8>, i64)>> {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    if line.is_empty() {
        return Ok(None);
    }

    let (pattern, weight) = match line.iter().rposition(|&b| b == b'\t') {
        Some(tab) => {
            let field = &line[tab + 1..];
            let weight = std::str::from_utf8(field)
                .ok()
                .and_then(|w| w.trim().parse::<i64>().ok())
                .with_context(|| {
                    format!("Invalid weight '{}'", String::from_utf8_lossy(field))
                })?;
            (&line[..tab], weight)
        }
        None => (line, 1),
    };

    if pattern.is_empty() {
        bail!("Empty pattern");
    }
    Ok(Some((pattern.to_vec(), weight)))
}

/// Load a pattern file into a new automaton.
pub fn load_patterns(path: &Path, bucket_count: usize) -> Result<Automaton> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut automaton = Automaton::new(bucket_count)?;

    for (number, line) in byte_lines(BufReader::new(file)).enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        let parsed = parse_pattern_line(&line)
            .with_context(|| format!("{}:{}", path.display(), number + 1))?;
        if let Some((pattern, weight)) = parsed {
            automaton
                .insert(&pattern, weight)
                .with_context(|| format!("{}:{}", path.display(), number + 1))?;
        }
    }

    info!(
        path = %path.display(),
        patterns = automaton.pattern_count(),
        nodes = automaton.node_count(),
        "loaded patterns"
    );
    Ok(automaton)
}

fn cmd_count<R: BufRead, W: Write>(
    patterns: &Path,
    bucket_count: usize,
    texts: &[OsString],
    input: R,
    out: &mut W,
) -> Result<()> {
    let mut automaton = load_patterns(patterns, bucket_count)?;

    if texts.is_empty() {
        debug!("reading texts from stdin");
        for line in byte_lines(input) {
            let line = line.context("Failed to read stdin")?;
            writeln!(out, "{}", automaton.request(&line))?;
        }
    } else {
        for text in texts {
            writeln!(out, "{}", automaton.request(text.as_encoded_bytes()))?;
        }
    }
    Ok(())
}

fn cmd_stats<W: Write>(patterns: &Path, bucket_count: usize, out: &mut W) -> Result<()> {
    let automaton = load_patterns(patterns, bucket_count)?;
    let stats = automaton.stats();

    writeln!(out, "{}", "Automaton Information".bold().underline())?;
    writeln!(out)?;
    writeln!(out, "  Path:          {}", patterns.display().to_string().cyan())?;
    writeln!(out, "  Patterns:      {}", stats.patterns.to_string().green())?;
    writeln!(out, "  Nodes:         {}", stats.nodes.to_string().green())?;
    writeln!(out, "  Transitions:   {}", stats.transitions.to_string().green())?;
    writeln!(out, "  Buckets:       {}", stats.bucket_count.to_string().green())?;
    writeln!(out, "  Longest chain: {}", stats.longest_chain.to_string().yellow())?;
    if automaton.needs_compaction() {
        writeln!(
            out,
            "  {}",
            "Some patterns have zero weight; compaction would shrink the trie".yellow()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_pattern() {
        assert_eq!(
            parse_pattern_line(b"hello").unwrap(),
            Some((b"hello".to_vec(), 1))
        );
    }

    #[test]
    fn test_parse_weighted_pattern() {
        assert_eq!(
            parse_pattern_line(b"hello\t-3").unwrap(),
            Some((b"hello".to_vec(), -3))
        );
        assert_eq!(
            parse_pattern_line(b"a\tb\t2\r").unwrap(),
            Some((b"a\tb".to_vec(), 2))
        );
    }

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(parse_pattern_line(b"").unwrap(), None);
        assert_eq!(parse_pattern_line(b"\r").unwrap(), None);
    }

    #[test]
    fn test_parse_non_utf8_pattern() {
        assert_eq!(
            parse_pattern_line(b"a\xffb\t4").unwrap(),
            Some((vec![b'a', 0xff, b'b'], 4))
        );
        assert_eq!(
            parse_pattern_line(b"\xfe\xff").unwrap(),
            Some((vec![0xfe, 0xff], 1))
        );
        assert!(parse_pattern_line(b"ab\t\xff").is_err());
    }

    #[test]
    fn test_byte_lines_strip_line_endings() {
        let lines: Vec<Vec<u8>> = byte_lines(&b"ab\r\n\xff\n\nlast"[..])
            .map(|line| line.unwrap())
            .collect();
        assert_eq!(
            lines,
            vec![b"ab".to_vec(), vec![0xff], Vec::new(), b"last".to_vec()]
        );
    }

    #[test]
    fn test_parse_rejects_bad_lines() {
        assert!(parse_pattern_line(b"hello\tmany").is_err());
        assert!(parse_pattern_line(b"\t4").is_err());
    }
}
