#![forbid(unsafe_code)]
//! kinship-core library.
//!
//! Classifies every ordered node pair of a rooted edge list into five
//! structural relations and scores the result with a Shannon-entropy
//! measure. Stages run strictly forward:
//!
//! ```text
//! graph::load → graph::structure → relations → entropy
//! ```
//!
//! # Conventions
//!
//! - **Errors**: [`error::AnalysisError`] for pipeline failures, `anyhow::Result`
//!   for config loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod entropy;
pub mod error;
pub mod graph;
pub mod relations;

use std::path::Path;

use tracing::{info, instrument};

use crate::entropy::{EntropyReport, EntropyScore};
use crate::error::AnalysisError;
use crate::graph::{LoadedGraph, Structure, parse_edges, read_edge_file};
use crate::relations::RelationSet;

/// How to treat lines that are not `parent, child` pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LinePolicy {
    /// Skip and record them.
    #[default]
    Skip,
    /// Fail with [`AnalysisError::MalformedInput`].
    Strict,
}

/// Output of every pipeline stage for one input.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub graph: LoadedGraph,
    pub structure: Structure,
    pub relations: RelationSet,
    pub entropy: EntropyReport,
}

impl Analysis {
    /// The rounded `(H, h)` pair.
    #[must_use]
    pub const fn score(&self) -> EntropyScore {
        self.entropy.score
    }
}

/// Run the full pipeline on `text` with the given root, skipping malformed
/// lines.
///
/// # Errors
///
/// Returns [`AnalysisError::CycleDetected`] if the root reaches a cycle.
pub fn analyze(text: &str, root: &str) -> Result<Analysis, AnalysisError> {
    analyze_with(text, root, LinePolicy::Skip)
}

/// Run the full pipeline with an explicit malformed-line policy.
///
/// # Errors
///
/// Returns [`AnalysisError::MalformedInput`] under [`LinePolicy::Strict`]
/// when any line was skipped, or [`AnalysisError::CycleDetected`] if the
/// root reaches a cycle.
#[instrument(skip(text), fields(bytes = text.len()))]
pub fn analyze_with(text: &str, root: &str, policy: LinePolicy) -> Result<Analysis, AnalysisError> {
    let parsed = parse_edges(text);
    if policy == LinePolicy::Strict {
        if let Some(first) = parsed.skipped.first() {
            return Err(AnalysisError::MalformedInput {
                count: parsed.skipped.len(),
                first_line: first.line_no,
            });
        }
    }

    let graph = LoadedGraph::from_parsed(parsed, root);
    let structure = Structure::analyze(&graph)?;
    let relations = RelationSet::build(&graph, &structure);
    let entropy = entropy::evaluate(&graph, &relations);

    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        skipped = graph.skipped().len(),
        total = entropy.score.total,
        normalized = entropy.score.normalized,
        "analysis complete"
    );

    Ok(Analysis {
        graph,
        structure,
        relations,
        entropy,
    })
}

/// Read `path` and run the full pipeline.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] if the file cannot be read, otherwise as
/// [`analyze_with`].
pub fn analyze_file(path: &Path, root: &str, policy: LinePolicy) -> Result<Analysis, AnalysisError> {
    let text = read_edge_file(path)?;
    analyze_with(&text, root, policy)
}

/// Root to use when the caller has none: the parent of the first edge.
#[must_use]
pub fn default_root(text: &str) -> Option<String> {
    parse_edges(text).edges.into_iter().next().map(|edge| edge.parent)
}
