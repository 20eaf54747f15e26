//! The five structural relations between ordered node pairs.
//!
//! | Relation | `M[i][j]` is true when |
//! |---|---|
//! | R1 direct | edge `i → j` exists, `i ≠ j` |
//! | R2 inverse | edge `j → i` exists (transpose of R1) |
//! | R3 deep descendant | `j` is a descendant of `i`, at least two levels deeper, and not a direct child |
//! | R4 deep ancestor | `R3[j][i]`, unless `R2[i][j]` already holds |
//! | R5 sibling | `i ≠ j` share a parent |
//!
//! R3 and R4 never repeat a pair already covered by R1 or R2, so each
//! structural fact is counted under exactly one relation by the entropy
//! step. Depth gaps are only defined between nodes the root reaches.

pub mod matrix;

use std::fmt;
use std::str::FromStr;

use tracing::{debug, instrument};

use crate::graph::load::LoadedGraph;
use crate::graph::structure::Structure;

pub use matrix::RelationMatrix;

/// Relation kind, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Relation {
    Direct,
    Inverse,
    DeepDescendant,
    DeepAncestor,
    Sibling,
}

impl Relation {
    /// All relations in R1..R5 order.
    pub const ALL: [Self; 5] = [
        Self::Direct,
        Self::Inverse,
        Self::DeepDescendant,
        Self::DeepAncestor,
        Self::Sibling,
    ];

    /// Short name, `r1` through `r5`.
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Direct => "r1",
            Self::Inverse => "r2",
            Self::DeepDescendant => "r3",
            Self::DeepAncestor => "r4",
            Self::Sibling => "r5",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Inverse => "inverse",
            Self::DeepDescendant => "deep-descendant",
            Self::DeepAncestor => "deep-ancestor",
            Self::Sibling => "sibling",
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Direct => 0,
            Self::Inverse => 1,
            Self::DeepDescendant => 2,
            Self::DeepAncestor => 3,
            Self::Sibling => 4,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Error for an unrecognised relation name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown relation '{0}' (expected r1..r5 or a relation name)")]
pub struct UnknownRelation(pub String);

impl FromStr for Relation {
    type Err = UnknownRelation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|r| r.short_name() == wanted || r.name() == wanted)
            .ok_or_else(|| UnknownRelation(s.to_string()))
    }
}

/// The five relation matrices over one node universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationSet {
    matrices: [RelationMatrix; 5],
}

impl RelationSet {
    /// Derive all five relations from the edges and the structure analysis.
    #[must_use]
    #[instrument(skip_all, fields(nodes = graph.node_count()))]
    pub fn build(graph: &LoadedGraph, structure: &Structure) -> Self {
        let n = graph.node_count();

        let mut direct = RelationMatrix::new(n);
        for &(parent, child) in graph.edges() {
            // Self-loops the root cannot reach are tolerated but relate nothing.
            if parent != child {
                direct.set(parent, child);
            }
        }

        let inverse = direct.transpose();

        let mut deep_descendant = RelationMatrix::new(n);
        for i in 0..n {
            let Some(di) = structure.depth(i) else {
                continue;
            };
            for j in structure.descendants(i).ones() {
                let deep = structure
                    .depth(j)
                    .and_then(|dj| dj.checked_sub(di))
                    .is_some_and(|gap| gap >= 2);
                if deep && !direct.get(i, j) {
                    deep_descendant.set(i, j);
                }
            }
        }

        let mut deep_ancestor = RelationMatrix::new(n);
        for (i, j) in deep_descendant.pairs() {
            if !inverse.get(j, i) {
                deep_ancestor.set(j, i);
            }
        }

        let mut sibling = RelationMatrix::new(n);
        for parent in 0..n {
            let kids = graph.children(parent);
            for (a, &x) in kids.iter().enumerate() {
                for &y in &kids[a + 1..] {
                    if x != y {
                        sibling.set(x, y);
                        sibling.set(y, x);
                    }
                }
            }
        }

        let set = Self {
            matrices: [direct, inverse, deep_descendant, deep_ancestor, sibling],
        };
        debug!(
            r1 = set.matrices[0].count(),
            r2 = set.matrices[1].count(),
            r3 = set.matrices[2].count(),
            r4 = set.matrices[3].count(),
            r5 = set.matrices[4].count(),
            "relations built"
        );
        set
    }

    #[must_use]
    pub const fn get(&self, relation: Relation) -> &RelationMatrix {
        &self.matrices[relation.slot()]
    }

    /// Matrices paired with their relation, R1..R5.
    pub fn iter(&self) -> impl Iterator<Item = (Relation, &RelationMatrix)> {
        Relation::ALL.into_iter().zip(self.matrices.iter())
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.matrices[0].dim()
    }
}
