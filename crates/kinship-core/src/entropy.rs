//! Relational entropy over the five relation matrices.
//!
//! # Formula
//!
//! With `n` nodes and `norm = n - 1`, every node `v` and relation `R`
//! contribute `-p·log2(p)` where `p = deg_R(v) / norm`; zero degrees
//! contribute nothing. The sum is `H`. The reference ceiling is
//! `H_ref = n · 5 / (e · ln 2)`, the maximum of `-p·log2(p)` summed over every
//! node and relation, and `h = H / H_ref`.
//!
//! Blank input and universes of at most one node score `(0.0, 0.0)` without
//! looking at the matrices.
//!
//! # Rounding
//!
//! Both values are rounded to one decimal from their exact binary value,
//! ties to even: `0.35` is stored just below itself and becomes `0.3`.
//!
//! # Determinism
//!
//! Nodes are summed in label order, not index order, so permuting the input
//! lines gives bit-identical results.

use std::f64::consts::{E, LN_2};

use serde::Serialize;
use tracing::{debug, instrument};

use crate::graph::load::LoadedGraph;
use crate::relations::{Relation, RelationSet};

/// The rounded `(H, h)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntropyScore {
    /// Total relational entropy `H`.
    pub total: f64,
    /// `H` divided by the reference ceiling.
    pub normalized: f64,
}

impl EntropyScore {
    pub const ZERO: Self = Self {
        total: 0.0,
        normalized: 0.0,
    };
}

/// Full result of [`evaluate`], including unrounded values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntropyReport {
    pub score: EntropyScore,
    /// `H` before rounding.
    pub raw_total: f64,
    /// `h` before rounding.
    pub raw_normalized: f64,
    /// Reference ceiling `H_ref`; zero for degenerate input.
    pub reference: f64,
    /// Unrounded share of `H` from each relation, R1..R5.
    pub per_relation: [f64; 5],
}

impl EntropyReport {
    const fn degenerate() -> Self {
        Self {
            score: EntropyScore::ZERO,
            raw_total: 0.0,
            raw_normalized: 0.0,
            reference: 0.0,
            per_relation: [0.0; 5],
        }
    }

    /// Contribution of one relation to `H`.
    #[must_use]
    pub fn contribution(&self, relation: Relation) -> f64 {
        Relation::ALL
            .iter()
            .position(|r| *r == relation)
            .map_or(0.0, |i| self.per_relation[i])
    }
}

/// `1 / (e · ln 2)`: the largest value of `-p·log2(p)` on `[0, 1]`.
pub const PEAK_SELF_INFORMATION: f64 = 1.0 / (E * LN_2);

/// Score `relations` over the universe of `graph`.
#[must_use]
#[instrument(skip_all, fields(nodes = graph.node_count()))]
#[allow(clippy::cast_precision_loss)]
pub fn evaluate(graph: &LoadedGraph, relations: &RelationSet) -> EntropyReport {
    let n = graph.node_count();
    if graph.is_blank() || n <= 1 {
        debug!("degenerate graph; entropy is zero");
        return EntropyReport::degenerate();
    }

    let norm = (n - 1) as f64;
    let mut total = 0.0;
    let mut per_relation = [0.0; 5];

    for v in graph.universe().indices_by_label() {
        for (slot, (_, matrix)) in relations.iter().enumerate() {
            let deg = matrix.row_degree(v);
            if deg == 0 {
                continue;
            }
            let p = deg as f64 / norm;
            let term = -p * p.log2();
            total += term;
            per_relation[slot] += term;
        }
    }

    let reference = PEAK_SELF_INFORMATION * n as f64 * Relation::ALL.len() as f64;
    let normalized = if reference > 0.0 { total / reference } else { 0.0 };
    debug!(total, normalized, reference, "entropy evaluated");

    EntropyReport {
        score: EntropyScore {
            total: round_tenths(total),
            normalized: round_tenths(normalized),
        },
        raw_total: total,
        raw_normalized: normalized,
        reference,
        per_relation,
    }
}

/// Round to one decimal place from the exact value, ties to even.
#[must_use]
pub fn round_tenths(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}
