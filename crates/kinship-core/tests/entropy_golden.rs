//! Golden `(H, h)` vectors for hand-checked topologies.
//!
//! Expected digits are pinned: a change to rounding, depth semantics or the
//! relation definitions that moves any of them is a behaviour change.

use kinship_core::entropy::EntropyScore;
use kinship_core::{LinePolicy, analyze, analyze_file};

fn score(text: &str, root: &str) -> (f64, f64) {
    let s = analyze(text, root).expect("acyclic input").score();
    (s.total, s.normalized)
}

// ===========================================================================
// Degenerate inputs
// ===========================================================================

#[test]
fn empty_text_scores_zero() {
    assert_eq!(score("", "A"), (0.0, 0.0));
    assert_eq!(score(" \n\t \n", "A"), (0.0, 0.0));
}

#[test]
fn isolated_root_without_edges_scores_zero() {
    assert_eq!(score("not an edge\nalso,not,one\n", "A"), (0.0, 0.0));
}

#[test]
fn single_edge_scores_zero() {
    // Each node relates to the only other node with p = 1, and 1·log2(1) = 0.
    assert_eq!(score("A,B\n", "A"), (0.0, 0.0));
}

// ===========================================================================
// Trees
//
//        A
//       / \
//      B   C
//      |
//      D
// ===========================================================================

#[test]
fn small_tree() {
    assert_eq!(score("A,B\nA,C\nB,D\n", "A"), (4.6, 0.4));
}

#[test]
fn small_tree_raw_values() {
    let report = analyze("A,B\nA,C\nB,D\n", "A").expect("acyclic").entropy;
    assert!((report.raw_total - 4.616_541_669_070_520_5).abs() < 1e-12);
    assert!((report.raw_normalized - 0.434_917_323_955_930_25).abs() < 1e-12);
}

#[test]
fn chain_of_five() {
    assert_eq!(score("A,B\nB,C\nC,D\nD,E\n", "A"), (6.6, 0.5));
}

#[test]
fn star_of_four_leaves() {
    assert_eq!(score("R,A\nR,B\nR,C\nR,D\n", "R"), (3.2, 0.2));
}

#[test]
fn complete_binary_tree_depth_two() {
    assert_eq!(score("1,2\n1,3\n2,4\n2,5\n3,6\n3,7\n", "1"), (8.9, 0.5));
}

#[test]
fn uneven_branches() {
    assert_eq!(score("A,B\nB,C\nA,D\nD,E\nE,F\n", "A"), (7.5, 0.5));
}

// ===========================================================================
// Non-tree inputs
// ===========================================================================

#[test]
fn diamond_dag() {
    assert_eq!(score("A,B\nA,C\nB,D\nC,D\n", "A"), (5.0, 0.5));
}

#[test]
fn root_outside_edge_list() {
    // Universe {A, B, Z}; A and B relate once each (R1, R2) with p = 1/2.
    let analysis = analyze("A,B\n", "Z").expect("acyclic");
    assert_eq!(analysis.graph.node_count(), 3);
    assert_eq!(
        analysis.score(),
        EntropyScore {
            total: 1.0,
            normalized: 0.1
        }
    );
}

#[test]
fn malformed_lines_are_ignored() {
    assert_eq!(score("A,B\nbad line\nA,C,D\n\nB,D\n", "A"), (3.0, 0.4));
}

#[test]
fn duplicate_edges_count_once() {
    assert_eq!(score("A,B\nA,B\nA,C\n", "A"), score("A,B\nA,C\n", "A"));
    assert_eq!(score("A,B\nA,B\nA,C\n", "A"), (2.0, 0.3));
}

#[test]
fn bom_and_padding_are_ignored() {
    assert_eq!(score("\u{feff}A , B\n A,C \n", "A"), (2.0, 0.3));
}

#[test]
fn carriage_return_line_endings() {
    assert_eq!(score("A,B\rA,C\rB,D\r", "A"), (4.6, 0.4));
    assert_eq!(score("A,B\r\nA,C\r\nB,D\r\n", "A"), (4.6, 0.4));
}

#[test]
fn file_input_matches_text_input() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("edges.csv");
    std::fs::write(&path, "A,B\nA,C\nB,D\n").expect("write edges");

    let analysis = analyze_file(&path, "A", LinePolicy::Skip).expect("readable");
    assert_eq!(
        (analysis.score().total, analysis.score().normalized),
        (4.6, 0.4)
    );
}
