//! `kin matrices`: print the relation matrices.
//!
//! Text and pretty output print each matrix as rows of `0`/`1` under a
//! title line, one row per node in universe order. JSON lists the node
//! order once and each relation's true pairs by label.

use std::io::Write;

use clap::Args;
use kinship_core::Analysis;
use kinship_core::config::Config;
use kinship_core::relations::{Relation, RelationMatrix};
use serde::Serialize;

use super::{InputArgs, run_analysis};
use crate::output::{OutputMode, pretty_rule, render_mode};

/// Arguments for `kin matrices`.
#[derive(Args, Debug)]
pub struct MatricesArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Only print these relations (`r1`..`r5` or a name such as `sibling`).
    /// Repeatable; all five by default.
    #[arg(long = "relation", value_name = "REL")]
    pub relations: Vec<Relation>,
}

#[derive(Debug, Serialize)]
pub struct MatricesOutput {
    pub nodes: Vec<String>,
    pub relations: Vec<MatrixOutput>,
}

#[derive(Debug, Serialize)]
pub struct MatrixOutput {
    pub relation: &'static str,
    pub name: &'static str,
    pub pairs: Vec<(String, String)>,
    #[serde(skip)]
    rows: Vec<String>,
}

/// Execute `kin matrices`.
pub fn run_matrices(args: &MatricesArgs, output: OutputMode, config: &Config) -> anyhow::Result<()> {
    let analysis = run_analysis(&args.input, config)?;
    let payload = build_output(&analysis, &selected(&args.relations));

    render_mode(
        output,
        &payload,
        render_matrices_text,
        render_matrices_pretty,
    )
}

fn selected(requested: &[Relation]) -> Vec<Relation> {
    if requested.is_empty() {
        return Relation::ALL.to_vec();
    }
    Relation::ALL
        .into_iter()
        .filter(|r| requested.contains(r))
        .collect()
}

fn build_output(analysis: &Analysis, relations: &[Relation]) -> MatricesOutput {
    let universe = analysis.graph.universe();
    let label = |i: usize| universe.label(i).to_string();

    let relations = relations
        .iter()
        .map(|&relation| {
            let matrix = analysis.relations.get(relation);
            MatrixOutput {
                relation: relation.short_name(),
                name: relation.name(),
                pairs: matrix.pairs().map(|(i, j)| (label(i), label(j))).collect(),
                rows: matrix_rows(matrix),
            }
        })
        .collect();

    MatricesOutput {
        nodes: universe.labels().to_vec(),
        relations,
    }
}

fn matrix_rows(matrix: &RelationMatrix) -> Vec<String> {
    (0..matrix.dim())
        .map(|i| {
            (0..matrix.dim())
                .map(|j| if matrix.get(i, j) { "1" } else { "0" })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn render_matrices_text(p: &MatricesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "nodes: {}", p.nodes.join(" "))?;
    for matrix in &p.relations {
        writeln!(w)?;
        writeln!(w, "{} {}", matrix.relation, matrix.name)?;
        for row in &matrix.rows {
            writeln!(w, "{row}")?;
        }
    }
    Ok(())
}

fn render_matrices_pretty(p: &MatricesOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let width = p.nodes.iter().map(String::len).max().unwrap_or(0).max(1);
    for (n, matrix) in p.relations.iter().enumerate() {
        if n > 0 {
            writeln!(w)?;
        }
        writeln!(w, "{} ({})", matrix.relation.to_uppercase(), matrix.name)?;
        pretty_rule(w)?;
        write!(w, "{:width$}", "")?;
        for label in &p.nodes {
            write!(w, " {label:>width$}")?;
        }
        writeln!(w)?;
        for (label, row) in p.nodes.iter().zip(&matrix.rows) {
            write!(w, "{label:>width$}")?;
            for cell in row.split(' ') {
                write!(w, " {cell:>width$}")?;
            }
            writeln!(w)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinship_core::analyze;

    fn text_for(input: &str, root: &str, relations: &[Relation]) -> String {
        let analysis = analyze(input, root).expect("acyclic");
        let payload = build_output(&analysis, &selected(relations));
        let mut buf = Vec::new();
        render_matrices_text(&payload, &mut buf).expect("write");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn selection_keeps_canonical_order() {
        assert_eq!(
            selected(&[Relation::Sibling, Relation::Direct]),
            [Relation::Direct, Relation::Sibling]
        );
        assert_eq!(selected(&[]), Relation::ALL);
    }

    #[test]
    fn direct_matrix_rows() {
        let text = text_for("A,B\nA,C\nB,D\n", "A", &[Relation::Direct]);
        assert_eq!(
            text,
            "nodes: A B C D\n\nr1 direct\n0 1 1 0\n0 0 0 1\n0 0 0 0\n0 0 0 0\n"
        );
    }

    #[test]
    fn json_pairs_use_labels() {
        let analysis = analyze("A,B\nA,C\n", "A").expect("acyclic");
        let payload = build_output(&analysis, &[Relation::Sibling]);
        let value = serde_json::to_value(&payload).expect("serialize");
        assert_eq!(value["nodes"], serde_json::json!(["A", "B", "C"]));
        assert_eq!(value["relations"][0]["relation"], "r5");
        assert_eq!(
            value["relations"][0]["pairs"],
            serde_json::json!([["B", "C"], ["C", "B"]])
        );
        assert!(value["relations"][0].get("rows").is_none());
    }
}
