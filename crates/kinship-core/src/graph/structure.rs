//! Depths from the root and descendant closures.
//!
//! # Depth
//!
//! Breadth-first from the root over the children map with a visited set.
//! A node's depth is its shortest hop distance from the root; nodes the root
//! cannot reach have no depth. On trees this is the only possible depth; on
//! DAGs it does not depend on edge order.
//!
//! # Closure
//!
//! `descendants(v)` is every node reachable from `v` in one or more steps,
//! `v` excluded. Strongly connected components come out sinks first, so
//! each component's reachable set is the union of its successors' sets,
//! which are already final. Each set is computed once and nothing recurses,
//! so path length is not bounded by the call stack.
//!
//! # Cycles
//!
//! A cycle the root can reach fails the analysis with
//! [`AnalysisError::CycleDetected`]. Cycles elsewhere are logged and
//! tolerated; their closures are still exact.

use std::collections::VecDeque;

use fixedbitset::FixedBitSet;
use petgraph::algo::kosaraju_scc;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use tracing::{debug, instrument, warn};

use crate::error::AnalysisError;
use crate::graph::cycles::{cycles_in_components, reachable_from};
use crate::graph::load::LoadedGraph;

/// Per-node depth and descendant closure, indexed by universe index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Structure {
    depths: Vec<Option<usize>>,
    descendants: Vec<FixedBitSet>,
}

impl Structure {
    /// Analyze `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::CycleDetected`] if a cycle is reachable from
    /// the root. The first such cycle (by sorted members) is reported.
    #[instrument(skip(graph), fields(nodes = graph.node_count()))]
    pub fn analyze(graph: &LoadedGraph) -> Result<Self, AnalysisError> {
        let n = graph.node_count();
        let Some(root) = graph.root() else {
            return Ok(Self {
                depths: vec![None; n],
                descendants: vec![FixedBitSet::with_capacity(n); n],
            });
        };

        // Sinks first; shared by the cycle check and the closure.
        let components = kosaraju_scc(graph.graph());
        check_cycles(graph, root, &components)?;

        let depths = compute_depths(graph, root);
        let descendants = compute_descendants(graph, &components);
        debug!(
            reachable = depths.iter().flatten().count(),
            max_depth = depths.iter().flatten().max().copied().unwrap_or(0),
            "structure analyzed"
        );

        Ok(Self {
            depths,
            descendants,
        })
    }

    /// Depth of `idx`, `None` if the root cannot reach it.
    #[must_use]
    pub fn depth(&self, idx: usize) -> Option<usize> {
        self.depths[idx]
    }

    #[must_use]
    pub fn depths(&self) -> &[Option<usize>] {
        &self.depths
    }

    /// Deepest depth among reachable nodes.
    #[must_use]
    pub fn max_depth(&self) -> Option<usize> {
        self.depths.iter().flatten().max().copied()
    }

    /// Number of nodes the root cannot reach.
    #[must_use]
    pub fn unreachable_count(&self) -> usize {
        self.depths.iter().filter(|d| d.is_none()).count()
    }

    /// All nodes reachable from `idx`, `idx` itself excluded.
    #[must_use]
    pub fn descendants(&self, idx: usize) -> &FixedBitSet {
        &self.descendants[idx]
    }

    #[must_use]
    pub fn is_descendant(&self, ancestor: usize, node: usize) -> bool {
        self.descendants[ancestor].contains(node)
    }
}

fn check_cycles(
    graph: &LoadedGraph,
    root: usize,
    components: &[Vec<NodeIndex>],
) -> Result<(), AnalysisError> {
    let cycles = cycles_in_components(graph, components);
    if cycles.is_empty() {
        return Ok(());
    }

    let reachable = reachable_from(graph, root);
    let (reached, elsewhere): (Vec<_>, Vec<_>) =
        cycles.into_iter().partition(|cycle| cycle.touches(&reachable));
    if let Some(cycle) = reached.into_iter().next() {
        return Err(AnalysisError::CycleDetected {
            root: graph.universe().label(root).to_string(),
            members: cycle.members,
        });
    }

    for cycle in elsewhere {
        warn!(members = ?cycle.members, "cycle not reachable from root; ignoring");
    }
    Ok(())
}

fn compute_depths(graph: &LoadedGraph, root: usize) -> Vec<Option<usize>> {
    let mut depths = vec![None; graph.node_count()];
    depths[root] = Some(0);

    let mut queue = VecDeque::from([root]);
    while let Some(current) = queue.pop_front() {
        let next_depth = depths[current].map_or(0, |d| d + 1);
        for &child in graph.children(current) {
            if depths[child].is_none() {
                depths[child] = Some(next_depth);
                queue.push_back(child);
            }
        }
    }
    depths
}

fn compute_descendants(graph: &LoadedGraph, components: &[Vec<NodeIndex>]) -> Vec<FixedBitSet> {
    let g = graph.graph();
    let n = g.node_count();

    let mut component_of = vec![0usize; n];
    for (c, members) in components.iter().enumerate() {
        for node in members {
            component_of[node.index()] = c;
        }
    }

    let mut reach: Vec<FixedBitSet> = Vec::with_capacity(components.len());
    for (c, members) in components.iter().enumerate() {
        let mut set = FixedBitSet::with_capacity(n);
        for &node in members {
            for edge in g.edges(node) {
                let target = edge.target().index();
                set.insert(target);
                let tc = component_of[target];
                if tc != c {
                    set.union_with(&reach[tc]);
                }
            }
        }
        if members.len() > 1 {
            for node in members {
                set.insert(node.index());
            }
        }
        reach.push(set);
    }

    (0..n)
        .map(|idx| {
            let mut set = reach[component_of[idx]].clone();
            set.set(idx, false);
            set
        })
        .collect()
}
