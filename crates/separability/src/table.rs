//! Precomputed decomposition of every composite key.
//!
//! The table depends only on the qubit count, never on amplitudes, so it is
//! built once per n and shared read-only (typically behind an
//! [`Arc`](std::sync::Arc)) by every evaluation for that n.
//!
//! # Example
//!
//! ```
//! use separability::{DecompositionTable, Ket};
//!
//! let table = DecompositionTable::build(4).unwrap();
//! assert_eq!(table.len(), 11);
//! assert_eq!(
//!     table.constituents(Ket::new(0b0011)),
//!     Some(&[Ket::new(0b0010), Ket::new(0b0001)][..])
//! );
//! assert_eq!(table.constituents(Ket::new(0b0100)), None);
//! ```

use crate::core::ket::Ket;
use crate::core::space::IndexSpace;
use crate::error::Result;

/// One composite key and its basis constituents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    ket: Ket,
    constituents: Box<[Ket]>,
}

impl Decomposition {
    /// The composite key.
    #[inline]
    #[must_use]
    pub const fn ket(&self) -> Ket {
        self.ket
    }

    /// Basis constituents, descending magnitude.
    #[inline]
    #[must_use]
    pub fn constituents(&self) -> &[Ket] {
        &self.constituents
    }
}

/// Composite key → constituent list, for a fixed qubit count.
///
/// # Invariant
///
/// Entries are sorted by key and cover every composite key exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompositionTable {
    space: IndexSpace,
    entries: Vec<Decomposition>,
}

impl DecompositionTable {
    /// Decomposes every composite key of the n-qubit space.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SeparabilityError::InvalidQubitCount`] for an
    /// unsupported `qubits`.
    pub fn build(qubits: u32) -> Result<Self> {
        Self::from_space(IndexSpace::new(qubits)?)
    }

    /// Builds the table over an existing index space.
    ///
    /// # Errors
    ///
    /// Propagates decomposition failures; none occur for a well-formed
    /// [`IndexSpace`].
    pub fn from_space(space: IndexSpace) -> Result<Self> {
        let entries = space
            .composite_keys()
            .iter()
            .map(|&ket| {
                Ok(Decomposition {
                    ket,
                    constituents: space.decompose(ket)?.into_boxed_slice(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(
            qubits = space.qubits(),
            composites = entries.len(),
            "built decomposition table"
        );
        Ok(Self { space, entries })
    }

    /// The underlying key space.
    #[inline]
    #[must_use]
    pub fn space(&self) -> &IndexSpace {
        &self.space
    }

    /// Qubit count.
    #[inline]
    #[must_use]
    pub fn qubits(&self) -> u32 {
        self.space.qubits()
    }

    /// Number of composite keys.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the space has no composite keys (n = 1).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Constituents of `ket`, or `None` if it is not a composite key of
    /// this space.
    #[must_use]
    pub fn constituents(&self, ket: Ket) -> Option<&[Ket]> {
        self.entries
            .binary_search_by_key(&ket, Decomposition::ket)
            .ok()
            .map(|i| self.entries[i].constituents())
    }

    /// Entries in ascending key order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Decomposition> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a DecompositionTable {
    type Item = &'a Decomposition;
    type IntoIter = core::slice::Iter<'a, Decomposition>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_composites() {
        for n in 1..=8 {
            let table = DecompositionTable::build(n).unwrap();
            assert_eq!(table.len(), table.space().composite_keys().len());
            let keys: Vec<Ket> = table.iter().map(Decomposition::ket).collect();
            assert_eq!(keys, table.space().composite_keys());
        }
    }

    #[test]
    fn test_single_qubit_table_is_empty() {
        let table = DecompositionTable::build(1).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.constituents(Ket::new(1)), None);
    }

    #[test]
    fn test_four_qubit_entries() {
        let table = DecompositionTable::build(4).unwrap();
        let rendered: Vec<(String, Vec<String>)> = table
            .iter()
            .map(|d| {
                (
                    d.ket().bits(4).to_string(),
                    d.constituents()
                        .iter()
                        .map(|c| c.bits(4).to_string())
                        .collect(),
                )
            })
            .collect();
        assert_eq!(rendered[0], ("0011".into(), vec!["0010".into(), "0001".into()]));
        assert_eq!(
            rendered[6],
            (
                "1011".into(),
                vec!["1000".into(), "0010".into(), "0001".into()]
            )
        );
        assert_eq!(
            rendered[10],
            (
                "1111".into(),
                vec!["1000".into(), "0100".into(), "0010".into(), "0001".into()]
            )
        );
    }

    #[test]
    fn test_constituents_or_to_key() {
        let table = DecompositionTable::build(7).unwrap();
        for d in &table {
            let or = d.constituents().iter().fold(0, |acc, c| acc | c.index());
            let sum: u32 = d.constituents().iter().map(|c| c.index()).sum();
            assert_eq!(or, d.ket().index());
            assert_eq!(sum, d.ket().index());
        }
    }

    #[test]
    fn test_out_of_space_lookup() {
        let table = DecompositionTable::build(3).unwrap();
        assert_eq!(table.constituents(Ket::new(0b1_0011)), None);
        assert_eq!(table.constituents(Ket::REFERENCE), None);
    }
}
