//! `kin stats`: size, shape and per-relation breakdown of one input.

use std::io::Write;

use clap::Args;
use kinship_core::Analysis;
use kinship_core::config::Config;
use serde::Serialize;

use super::{InputArgs, run_analysis};
use crate::output::{OutputMode, pretty_kv, pretty_section, render};

/// Arguments for `kin stats`.
#[derive(Args, Debug)]
pub struct StatsArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Serialize)]
struct SkippedLineOutput {
    line: usize,
    fields: usize,
}

#[derive(Debug, Serialize)]
struct RelationStats {
    relation: &'static str,
    name: &'static str,
    pairs: usize,
    contribution: f64,
}

#[derive(Debug, Serialize)]
struct EntropyStats {
    total: f64,
    normalized: f64,
    raw_total: f64,
    raw_normalized: f64,
    reference: f64,
}

/// Report payload for `kin stats`.
#[derive(Debug, Serialize)]
pub struct GraphStats {
    root: Option<String>,
    nodes: usize,
    edges: usize,
    distinct_edges: usize,
    skipped_lines: Vec<SkippedLineOutput>,
    max_depth: Option<usize>,
    unreachable_nodes: usize,
    relations: Vec<RelationStats>,
    entropy: EntropyStats,
    content_hash: String,
}

impl GraphStats {
    fn from_analysis(analysis: &Analysis) -> Self {
        let graph = &analysis.graph;
        let report = &analysis.entropy;

        Self {
            root: graph.root_label().map(str::to_string),
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            distinct_edges: graph.distinct_edge_count(),
            skipped_lines: graph
                .skipped()
                .iter()
                .map(|s| SkippedLineOutput {
                    line: s.line_no,
                    fields: s.fields,
                })
                .collect(),
            max_depth: analysis.structure.max_depth(),
            unreachable_nodes: analysis.structure.unreachable_count(),
            relations: analysis
                .relations
                .iter()
                .map(|(relation, matrix)| RelationStats {
                    relation: relation.short_name(),
                    name: relation.name(),
                    pairs: matrix.count(),
                    contribution: report.contribution(relation),
                })
                .collect(),
            entropy: EntropyStats {
                total: report.score.total,
                normalized: report.score.normalized,
                raw_total: report.raw_total,
                raw_normalized: report.raw_normalized,
                reference: report.reference,
            },
            content_hash: graph.content_hash().to_string(),
        }
    }
}

/// Execute `kin stats`.
pub fn run_stats(args: &StatsArgs, output: OutputMode, config: &Config) -> anyhow::Result<()> {
    let analysis = run_analysis(&args.input, config)?;
    let payload = GraphStats::from_analysis(&analysis);
    render(output, &payload, render_stats_human)
}

fn render_stats_human(s: &GraphStats, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Graph")?;
    pretty_kv(w, "root", s.root.as_deref().unwrap_or("-"))?;
    pretty_kv(w, "nodes", s.nodes.to_string())?;
    pretty_kv(
        w,
        "edges",
        format!("{} ({} distinct)", s.edges, s.distinct_edges),
    )?;
    pretty_kv(w, "skipped lines", s.skipped_lines.len().to_string())?;
    for skipped in &s.skipped_lines {
        writeln!(w, "  line {} ({} fields)", skipped.line, skipped.fields)?;
    }
    pretty_kv(
        w,
        "max depth",
        s.max_depth.map_or_else(|| "-".to_string(), |d| d.to_string()),
    )?;
    pretty_kv(w, "unreachable", s.unreachable_nodes.to_string())?;
    pretty_kv(w, "content hash", &s.content_hash)?;

    writeln!(w)?;
    pretty_section(w, "Relations")?;
    for r in &s.relations {
        writeln!(
            w,
            "{:<3} {:<16} {:>8} pairs  {:>8.4} bits",
            r.relation, r.name, r.pairs, r.contribution
        )?;
    }

    writeln!(w)?;
    pretty_section(w, "Entropy")?;
    pretty_kv(
        w,
        "H",
        format!("{:.1} ({:.6})", s.entropy.total, s.entropy.raw_total),
    )?;
    pretty_kv(
        w,
        "h",
        format!("{:.1} ({:.6})", s.entropy.normalized, s.entropy.raw_normalized),
    )?;
    pretty_kv(w, "H_ref", format!("{:.6}", s.entropy.reference))?;
    Ok(())
}
