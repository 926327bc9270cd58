//! PACE 2024 one-sided crossing minimization text format.
//!
//! ```text
//! c optional comment lines
//! p ocr <fixed> <free> <edges>
//! <fixed-id> <free-id>
//! ...
//! ```
//!
//! Ids are 1-based; free ids are offset by the fixed count. The solution
//! format lists free ids in drawing order, one per line.

use std::io::Write;
use std::path::Path;

use crate::error::{CrossForgeError, Result};
use crate::graph::{BipartiteGraph, GraphBuilder};

/// Parses a graph from PACE text.
///
/// # Errors
///
/// [`CrossForgeError::Parse`] for a missing or malformed header, malformed
/// edge lines, out-of-range ids or fewer edges than announced;
/// [`CrossForgeError::ModelConstruction`] for duplicate edges.
///
/// # Examples
///
/// ```
/// use crossforge_core::pace;
///
/// let graph = pace::parse_str("c tiny\np ocr 2 2 2\n1 4\n2 3\n").unwrap();
/// assert_eq!(graph.free_count(), 2);
/// assert_eq!(graph.neighbors(0), &[1]);
/// assert_eq!(graph.neighbors(1), &[0]);
/// ```
pub fn parse_str(input: &str) -> Result<BipartiteGraph> {
    let mut lines = input
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('c'));

    let (header_line, header) = lines
        .next()
        .ok_or_else(|| CrossForgeError::parse(0, "missing 'p ocr' header"))?;
    let (fixed, free, edges) = parse_header(header_line, header)?;

    let mut builder = GraphBuilder::new(fixed, free);
    for _ in 0..edges {
        let Some((line_no, line)) = lines.next() else {
            return Err(CrossForgeError::parse(
                0,
                format!(
                    "expected {} edges, found {}",
                    edges,
                    builder.edge_count()
                ),
            ));
        };
        let mut tokens = line.split_whitespace();
        let a = parse_id(line_no, tokens.next())?;
        let b = parse_id(line_no, tokens.next())?;
        builder
            .add_pace_edge(a, b)
            .map_err(|e| CrossForgeError::parse(line_no, e.to_string()))?;
    }

    builder.build()
}

/// Reads and parses a PACE file.
pub fn read_file(path: impl AsRef<Path>) -> Result<BipartiteGraph> {
    let contents = std::fs::read_to_string(path)?;
    parse_str(&contents)
}

/// Writes `permutation` (0-based free indices) as PACE free ids, one per line.
pub fn write_permutation<W: Write>(
    out: &mut W,
    fixed_count: usize,
    permutation: &[usize],
) -> Result<()> {
    for &free in permutation {
        writeln!(out, "{}", free + fixed_count + 1)?;
    }
    Ok(())
}

/// Formats `permutation` as PACE solution text.
pub fn format_permutation(fixed_count: usize, permutation: &[usize]) -> String {
    permutation
        .iter()
        .map(|&free| format!("{}\n", free + fixed_count + 1))
        .collect()
}

fn parse_header(line_no: usize, header: &str) -> Result<(usize, usize, usize)> {
    let mut tokens = header.split_whitespace();
    if tokens.next() != Some("p") || tokens.next() != Some("ocr") {
        return Err(CrossForgeError::parse(
            line_no,
            format!("expected 'p ocr <fixed> <free> <edges>', got '{}'", header),
        ));
    }
    let fixed = parse_count(line_no, tokens.next(), "fixed")?;
    let free = parse_count(line_no, tokens.next(), "free")?;
    let edges = parse_count(line_no, tokens.next(), "edge")?;
    Ok((fixed, free, edges))
}

fn parse_count(line_no: usize, token: Option<&str>, what: &str) -> Result<usize> {
    let token =
        token.ok_or_else(|| CrossForgeError::parse(line_no, format!("missing {} count", what)))?;
    token.parse().map_err(|_| {
        CrossForgeError::parse(line_no, format!("invalid {} count '{}'", what, token))
    })
}

fn parse_id(line_no: usize, token: Option<&str>) -> Result<usize> {
    let token = token.ok_or_else(|| CrossForgeError::parse(line_no, "expected two vertex ids"))?;
    token
        .parse()
        .map_err(|_| CrossForgeError::parse(line_no, format!("invalid vertex id '{}'", token)))
}
