//! Cycle detection for loaded edge lists.
//!
//! The relation pipeline assumes the part of the graph reachable from the
//! root is acyclic. [`find_cycles`] reports every cyclic strongly connected
//! component (more than one member, or a self-loop) and
//! [`cycles_reachable_from`] narrows that to the ones the root can reach,
//! which are the ones that make depths and deep relations meaningless.

#![allow(clippy::module_name_repetitions)]

use fixedbitset::FixedBitSet;
use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;

use crate::graph::load::LoadedGraph;

/// One cyclic strongly connected component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    /// Member labels, sorted.
    pub members: Vec<String>,
    /// Member universe indices, sorted by label alongside `members`.
    pub indices: Vec<usize>,
}

impl Cycle {
    /// `true` if any member is in `nodes`.
    #[must_use]
    pub fn touches(&self, nodes: &FixedBitSet) -> bool {
        self.indices.iter().any(|&idx| nodes.contains(idx))
    }
}

/// Find all cyclic components, sorted by their member lists.
#[must_use]
pub fn find_cycles(graph: &LoadedGraph) -> Vec<Cycle> {
    cycles_in_components(graph, &kosaraju_scc(graph.graph()))
}

/// Cyclic members of already computed strongly connected components.
#[must_use]
pub fn cycles_in_components(graph: &LoadedGraph, components: &[Vec<NodeIndex>]) -> Vec<Cycle> {
    let g = graph.graph();
    let mut cycles: Vec<Cycle> = components
        .iter()
        .filter(|component| {
            component.len() > 1 || component.first().is_some_and(|node| has_self_loop(g, *node))
        })
        .map(|component| {
            let mut members: Vec<(String, usize)> = component
                .iter()
                .map(|&idx| (g[idx].clone(), idx.index()))
                .collect();
            members.sort_unstable();
            let (members, indices) = members.into_iter().unzip();
            Cycle { members, indices }
        })
        .collect();

    cycles.sort_unstable_by(|a, b| a.members.cmp(&b.members));
    cycles
}

/// Cyclic components with at least one member reachable from `root`.
#[must_use]
pub fn cycles_reachable_from(graph: &LoadedGraph, root: usize) -> Vec<Cycle> {
    let reachable = reachable_from(graph, root);
    find_cycles(graph)
        .into_iter()
        .filter(|cycle| cycle.touches(&reachable))
        .collect()
}

/// Nodes reachable from `root` in zero or more steps.
#[must_use]
pub fn reachable_from(graph: &LoadedGraph, root: usize) -> FixedBitSet {
    let g = graph.graph();
    let mut seen = FixedBitSet::with_capacity(g.node_count());
    let mut bfs = Bfs::new(g, NodeIndex::new(root));
    while let Some(node) = bfs.next(g) {
        seen.insert(node.index());
    }
    seen
}

fn has_self_loop(graph: &DiGraph<String, ()>, node: NodeIndex) -> bool {
    graph.find_edge(node, node).is_some()
}
