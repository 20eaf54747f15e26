//! `kin entropy`: the rounded `(H, h)` pair.

use std::io::Write;

use clap::Args;
use kinship_core::config::Config;
use serde::Serialize;

use super::{InputArgs, run_analysis};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `kin entropy`.
#[derive(Args, Debug)]
pub struct EntropyArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Debug, Serialize)]
pub struct EntropyOutput {
    pub total: f64,
    pub normalized: f64,
    pub nodes: usize,
    pub skipped_lines: usize,
}

/// Execute `kin entropy`.
pub fn run_entropy(args: &EntropyArgs, output: OutputMode, config: &Config) -> anyhow::Result<()> {
    let analysis = run_analysis(&args.input, config)?;
    let score = analysis.score();
    let payload = EntropyOutput {
        total: score.total,
        normalized: score.normalized,
        nodes: analysis.graph.node_count(),
        skipped_lines: analysis.graph.skipped().len(),
    };

    render_mode(
        output,
        &payload,
        |p, w| writeln!(w, "{:.1} {:.1}", p.total, p.normalized),
        render_entropy_pretty,
    )
}

fn render_entropy_pretty(p: &EntropyOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Relational entropy")?;
    pretty_kv(w, "H", format!("{:.1}", p.total))?;
    pretty_kv(w, "h", format!("{:.1}", p.normalized))?;
    pretty_kv(w, "nodes", p.nodes.to_string())?;
    if p.skipped_lines > 0 {
        pretty_kv(w, "skipped lines", p.skipped_lines.to_string())?;
    }
    Ok(())
}
