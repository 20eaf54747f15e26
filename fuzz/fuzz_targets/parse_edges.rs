#![no_main]

use kinship_core::graph::{LoadedGraph, parse_edges};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let parsed = parse_edges(text);
    let lines = text.lines().count();
    assert!(parsed.edges.len() + parsed.skipped.len() <= lines);

    let graph = LoadedGraph::from_parsed(parsed, "root");
    assert!(graph.edges().iter().all(|&(p, c)| p < graph.node_count() && c < graph.node_count()));
});
