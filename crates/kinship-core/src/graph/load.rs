//! Edge-list parsing and node universe construction.
//!
//! # Input Format
//!
//! One edge per line, `parent, child`. Fields are split on commas and
//! trimmed. A line that does not yield exactly two fields is skipped and
//! recorded as a [`SkippedLine`]; skipping is the parsing policy, not an
//! error. Blank lines are ignored without being recorded. A leading UTF-8
//! byte order mark is stripped.
//!
//! Lines end at `\n`, `\r\n`, a lone `\r`, vertical tab, form feed, the
//! ASCII separators `\x1c`..`\x1e`, NEL, and the Unicode line and paragraph
//! separators. Line numbers in [`SkippedLine`] count those boundaries.
//!
//! # Node Order
//!
//! Nodes are indexed by first appearance across the edge list (parent before
//! child on each line), with the root appended last when no edge mentions
//! it. The resulting [`NodeUniverse`] is built once here and every later
//! stage indexes by it.
//!
//! # Cache Invalidation
//!
//! [`LoadedGraph::content_hash`] is a BLAKE3 hash over the ordered edge
//! list, so callers can skip recomputation when the input has not changed.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;
use std::path::Path;

use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{debug, instrument};

use crate::error::AnalysisError;

const BOM: char = '\u{feff}';

const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}',
    '\u{2029}',
];

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// A directed `parent → child` edge as it appeared in the input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub parent: String,
    pub child: String,
}

/// A non-blank input line that was not an edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number in the input.
    pub line_no: usize,
    /// The line with surrounding whitespace trimmed.
    pub content: String,
    /// How many comma-separated fields the line had.
    pub fields: usize,
}

/// Output of [`parse_edges`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedEdges {
    /// Edges in input order, duplicates kept.
    pub edges: Vec<Edge>,
    /// Lines that were skipped, in input order.
    pub skipped: Vec<SkippedLine>,
    /// `true` when the whole input trims to nothing.
    pub blank: bool,
}

/// Parse an edge list.
///
/// Never fails: lines that are not `parent, child` pairs are skipped and
/// reported in [`ParsedEdges::skipped`].
#[must_use]
pub fn parse_edges(text: &str) -> ParsedEdges {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    if text.trim().is_empty() {
        return ParsedEdges {
            blank: true,
            ..ParsedEdges::default()
        };
    }

    let mut parsed = ParsedEdges::default();
    for (i, line) in split_lines(text).into_iter().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if let [parent, child] = fields.as_slice() {
            parsed.edges.push(Edge {
                parent: (*parent).to_string(),
                child: (*child).to_string(),
            });
        } else {
            debug!(line = i + 1, fields = fields.len(), "skipping malformed edge line");
            parsed.skipped.push(SkippedLine {
                line_no: i + 1,
                content: line.to_string(),
                fields: fields.len(),
            });
        }
    }
    parsed
}

/// Split on every line boundary, `\r\n` counting once. A trailing
/// terminator does not start an extra line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !LINE_BREAKS.contains(&c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' && chars.next_if(|&(_, next)| next == '\n').is_some() {
            start += 1;
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Read an edge-list file as UTF-8 text.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] if the file is missing, unreadable or not
/// valid UTF-8.
pub fn read_edge_file(path: &Path) -> Result<String, AnalysisError> {
    std::fs::read_to_string(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// NodeUniverse
// ---------------------------------------------------------------------------

/// Stable bijection between node labels and dense indices `0..n`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeUniverse {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl NodeUniverse {
    fn intern(&mut self, label: &str) -> usize {
        if let Some(&idx) = self.index.get(label) {
            return idx;
        }
        let idx = self.labels.len();
        self.labels.push(label.to_string());
        self.index.insert(label.to_string(), idx);
        idx
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[must_use]
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    /// Label at `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    #[must_use]
    pub fn label(&self, idx: usize) -> &str {
        &self.labels[idx]
    }

    /// Labels in index order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Indices sorted by label. Used wherever a result must not depend on
    /// first-seen order.
    #[must_use]
    pub fn indices_by_label(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.labels.len()).collect();
        order.sort_unstable_by(|&a, &b| self.labels[a].cmp(&self.labels[b]));
        order
    }
}

// ---------------------------------------------------------------------------
// LoadedGraph
// ---------------------------------------------------------------------------

/// A parsed edge list bound to a root.
///
/// Holds the node universe, the ordered edges (duplicates kept), the
/// children map and a petgraph view for component analysis. The petgraph
/// node with index `i` carries the label of universe index `i`; duplicate
/// edges appear once in that view.
#[derive(Debug, Clone)]
pub struct LoadedGraph {
    universe: NodeUniverse,
    edges: Vec<(usize, usize)>,
    children: Vec<Vec<usize>>,
    graph: DiGraph<String, ()>,
    root: Option<usize>,
    skipped: Vec<SkippedLine>,
    content_hash: String,
    blank: bool,
}

impl LoadedGraph {
    /// Parse `text` and bind it to `root`.
    #[must_use]
    pub fn from_text(text: &str, root: &str) -> Self {
        Self::from_parsed(parse_edges(text), root)
    }

    /// Build from already-parsed edges.
    ///
    /// Blank input produces an empty universe with no root. Otherwise the
    /// root is always part of the universe, isolated if no edge names it.
    #[must_use]
    #[instrument(skip(parsed), fields(edges = parsed.edges.len(), skipped = parsed.skipped.len()))]
    pub fn from_parsed(parsed: ParsedEdges, root: &str) -> Self {
        let content_hash = compute_edge_hash(&parsed.edges);
        let mut universe = NodeUniverse::default();
        let mut edges = Vec::with_capacity(parsed.edges.len());

        for edge in &parsed.edges {
            let parent = universe.intern(&edge.parent);
            let child = universe.intern(&edge.child);
            edges.push((parent, child));
        }
        let root = (!parsed.blank).then(|| universe.intern(root));

        let mut children = vec![Vec::new(); universe.len()];
        for &(parent, child) in &edges {
            children[parent].push(child);
        }

        let mut graph = DiGraph::<String, ()>::with_capacity(universe.len(), edges.len());
        for label in universe.labels() {
            graph.add_node(label.clone());
        }
        for &(parent, child) in &edges {
            let (a, b) = (NodeIndex::new(parent), NodeIndex::new(child));
            if !graph.contains_edge(a, b) {
                graph.add_edge(a, b, ());
            }
        }

        debug!(nodes = universe.len(), "loaded edge list");

        Self {
            universe,
            edges,
            children,
            graph,
            root,
            skipped: parsed.skipped,
            content_hash,
            blank: parsed.blank,
        }
    }

    #[must_use]
    pub const fn universe(&self) -> &NodeUniverse {
        &self.universe
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.universe.len()
    }

    /// Number of edges including duplicates.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of distinct `(parent, child)` pairs.
    #[must_use]
    pub fn distinct_edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Edges as universe indices, in input order.
    #[must_use]
    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Direct children of `idx` in edge order, duplicates kept.
    #[must_use]
    pub fn children(&self, idx: usize) -> &[usize] {
        &self.children[idx]
    }

    #[must_use]
    pub const fn graph(&self) -> &DiGraph<String, ()> {
        &self.graph
    }

    /// Root index, `None` only for blank input.
    #[must_use]
    pub const fn root(&self) -> Option<usize> {
        self.root
    }

    #[must_use]
    pub fn root_label(&self) -> Option<&str> {
        self.root.map(|idx| self.universe.label(idx))
    }

    #[must_use]
    pub fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }

    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// `true` when the input trimmed to nothing.
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.blank
    }
}

/// BLAKE3 hash of the ordered edge list.
fn compute_edge_hash(edges: &[Edge]) -> String {
    let mut hasher = blake3::Hasher::new();
    for edge in edges {
        hasher.update(edge.parent.as_bytes());
        hasher.update(b"\x00");
        hasher.update(edge.child.as_bytes());
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(g: &LoadedGraph) -> Vec<&str> {
        g.universe().labels().iter().map(String::as_str).collect()
    }

    #[test]
    fn parses_trimmed_pairs() {
        let parsed = parse_edges("A , B\n  B,C  \n");
        assert_eq!(parsed.edges.len(), 2);
        assert_eq!(parsed.edges[0].parent, "A");
        assert_eq!(parsed.edges[0].child, "B");
        assert_eq!(parsed.edges[1].parent, "B");
        assert!(parsed.skipped.is_empty());
        assert!(!parsed.blank);
    }

    #[test]
    fn malformed_lines_are_skipped_and_recorded() {
        let parsed = parse_edges("A,B\nno comma here\nA,C,D\n\nB,D\n");
        assert_eq!(parsed.edges.len(), 2);
        assert_eq!(parsed.skipped.len(), 2);
        assert_eq!(parsed.skipped[0].line_no, 2);
        assert_eq!(parsed.skipped[0].fields, 1);
        assert_eq!(parsed.skipped[1].line_no, 3);
        assert_eq!(parsed.skipped[1].content, "A,C,D");
        assert_eq!(parsed.skipped[1].fields, 3);
    }

    #[test]
    fn blank_input_is_flagged() {
        assert!(parse_edges("").blank);
        assert!(parse_edges("  \n\t\n").blank);
        assert!(parse_edges("\u{feff}\n").blank);
        assert!(!parse_edges("junk").blank);
    }

    #[test]
    fn bom_is_stripped() {
        let parsed = parse_edges("\u{feff}A,B\r\nB,C\r\n");
        assert_eq!(parsed.edges[0].parent, "A");
        assert_eq!(parsed.edges[1].child, "C");
    }

    #[test]
    fn lone_carriage_returns_end_lines() {
        let parsed = parse_edges("A,B\rA,C\rB,D\r");
        assert_eq!(parsed.edges.len(), 3);
        assert!(parsed.skipped.is_empty());
        assert_eq!(parsed.edges[2].parent, "B");
        assert_eq!(parsed.edges[2].child, "D");
    }

    #[test]
    fn every_line_boundary_counts_once() {
        let parsed = parse_edges("A,B\rA,C\r\nbad\u{2028}B,D\u{0c}X\u{85}C,E\u{1e}D,F\u{0b}E,G\n");
        let edges: Vec<(&str, &str)> = parsed
            .edges
            .iter()
            .map(|e| (e.parent.as_str(), e.child.as_str()))
            .collect();
        assert_eq!(
            edges,
            [("A", "B"), ("A", "C"), ("B", "D"), ("C", "E"), ("D", "F"), ("E", "G")]
        );
        let skipped: Vec<usize> = parsed.skipped.iter().map(|s| s.line_no).collect();
        assert_eq!(skipped, [3, 5]);
    }

    #[test]
    fn split_lines_drops_only_the_final_terminator() {
        assert_eq!(split_lines("a\r\nb\n"), ["a", "b"]);
        assert_eq!(split_lines("a\n\nb"), ["a", "", "b"]);
        assert_eq!(split_lines("a\r\rb"), ["a", "", "b"]);
        assert!(split_lines("").is_empty());
    }

    #[test]
    fn node_order_is_first_seen_then_root() {
        let g = LoadedGraph::from_text("B,C\nA,B\n", "Z");
        assert_eq!(labels(&g), ["B", "C", "A", "Z"]);
        assert_eq!(g.root(), Some(3));
        assert_eq!(g.root_label(), Some("Z"));
    }

    #[test]
    fn root_already_present_is_not_duplicated() {
        let g = LoadedGraph::from_text("A,B\nA,C\n", "A");
        assert_eq!(labels(&g), ["A", "B", "C"]);
        assert_eq!(g.root(), Some(0));
    }

    #[test]
    fn isolated_root_is_added() {
        let g = LoadedGraph::from_text("not an edge", "R");
        assert_eq!(labels(&g), ["R"]);
        assert_eq!(g.edge_count(), 0);
        assert!(g.children(0).is_empty());
    }

    #[test]
    fn blank_input_has_empty_universe() {
        let g = LoadedGraph::from_text("   ", "A");
        assert!(g.is_blank());
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.root(), None);
    }

    #[test]
    fn duplicates_are_kept_in_children_but_not_graph() {
        let g = LoadedGraph::from_text("A,B\nA,B\nA,C\n", "A");
        assert_eq!(g.edge_count(), 3);
        assert_eq!(g.distinct_edge_count(), 2);
        assert_eq!(g.children(0), &[1, 1, 2]);
    }

    #[test]
    fn graph_view_indices_match_universe() {
        let g = LoadedGraph::from_text("X,Y\nY,Z\n", "X");
        for (i, label) in g.universe().labels().iter().enumerate() {
            assert_eq!(g.graph()[NodeIndex::new(i)], *label);
        }
    }

    #[test]
    fn content_hash_tracks_edges() {
        let a = LoadedGraph::from_text("A,B\n", "A");
        let b = LoadedGraph::from_text("A , B\n", "A");
        let c = LoadedGraph::from_text("A,C\n", "A");
        assert!(a.content_hash().starts_with("blake3:"));
        assert_eq!(a.content_hash(), b.content_hash());
        assert_ne!(a.content_hash(), c.content_hash());
    }

    #[test]
    fn indices_by_label_sorts_lexicographically() {
        let g = LoadedGraph::from_text("c,a\nb,a\n", "c");
        let sorted: Vec<&str> = g
            .universe()
            .indices_by_label()
            .into_iter()
            .map(|i| g.universe().label(i))
            .collect();
        assert_eq!(sorted, ["a", "b", "c"]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = read_edge_file(&dir.path().join("absent.csv")).expect_err("must fail");
        assert!(matches!(err, AnalysisError::Io { .. }));
    }
}
