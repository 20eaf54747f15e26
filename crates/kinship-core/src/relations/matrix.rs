//! Square boolean matrix with one bitset per row.

use fixedbitset::FixedBitSet;

/// An `n × n` boolean relation over universe indices.
///
/// `get(i, j)` is `true` when node `i` relates to node `j`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationMatrix {
    rows: Vec<FixedBitSet>,
}

impl RelationMatrix {
    /// All-false matrix of dimension `n`.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            rows: vec![FixedBitSet::with_capacity(n); n],
        }
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> bool {
        self.rows[i].contains(j)
    }

    pub fn set(&mut self, i: usize, j: usize) {
        self.rows[i].insert(j);
    }

    #[must_use]
    pub fn row(&self, i: usize) -> &FixedBitSet {
        &self.rows[i]
    }

    /// Out-degree of `i`: how many nodes it relates to.
    #[must_use]
    pub fn row_degree(&self, i: usize) -> usize {
        self.rows[i].count_ones(..)
    }

    /// Total number of `true` entries.
    #[must_use]
    pub fn count(&self) -> usize {
        self.rows.iter().map(|row| row.count_ones(..)).sum()
    }

    /// `true` entries as `(i, j)` pairs, row-major.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.ones().map(move |j| (i, j)))
    }

    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut out = Self::new(self.dim());
        for (i, j) in self.pairs() {
            out.set(j, i);
        }
        out
    }

    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.pairs().all(|(i, j)| self.get(j, i))
    }

    /// `true` if any node relates to itself.
    #[must_use]
    pub fn has_diagonal(&self) -> bool {
        (0..self.dim()).any(|i| self.get(i, i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_matrix_is_empty() {
        let m = RelationMatrix::new(3);
        assert_eq!(m.dim(), 3);
        assert_eq!(m.count(), 0);
        assert!(m.is_symmetric());
    }

    #[test]
    fn set_get_and_degree() {
        let mut m = RelationMatrix::new(3);
        m.set(0, 1);
        m.set(0, 2);
        m.set(0, 2);
        assert!(m.get(0, 1));
        assert!(!m.get(1, 0));
        assert_eq!(m.row_degree(0), 2);
        assert_eq!(m.row_degree(1), 0);
        assert_eq!(m.count(), 2);
    }

    #[test]
    fn transpose_swaps_pairs() {
        let mut m = RelationMatrix::new(3);
        m.set(0, 1);
        m.set(2, 1);
        let t = m.transpose();
        assert_eq!(t.pairs().collect::<Vec<_>>(), vec![(1, 0), (1, 2)]);
        assert_eq!(t.transpose(), m);
        assert!(!m.is_symmetric());
    }

    #[test]
    fn diagonal_detection() {
        let mut m = RelationMatrix::new(2);
        assert!(!m.has_diagonal());
        m.set(1, 1);
        assert!(m.has_diagonal());
    }
}
