//! Edge-list graph: loading, cycle checks and structure analysis.
//!
//! ## Pipeline
//!
//! ```text
//! edge-list text
//!        ↓  load::parse_edges()
//! ParsedEdges (edges + skipped lines)
//!        ↓  load::LoadedGraph::from_parsed(root)
//! LoadedGraph (node universe, children map, petgraph view)
//!        ↓  structure::Structure::analyze()
//! Structure (depths, descendant closures)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use kinship_core::graph::{LoadedGraph, Structure};
//!
//! let graph = LoadedGraph::from_text("A,B\nA,C\nB,D\n", "A");
//! let structure = Structure::analyze(&graph)?;
//! assert_eq!(structure.max_depth(), Some(2));
//! # Ok::<(), kinship_core::error::AnalysisError>(())
//! ```

pub mod cycles;
pub mod load;
pub mod structure;

pub use cycles::{Cycle, cycles_in_components, cycles_reachable_from, find_cycles};
pub use load::{Edge, LoadedGraph, NodeUniverse, ParsedEdges, SkippedLine, parse_edges, read_edge_file};
pub use structure::Structure;
