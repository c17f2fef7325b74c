//! Basis decomposition over the n-bit key space.
//!
//! Every key of an n-qubit space falls into exactly one of three classes:
//!
//! | Class | Weight | Count |
//! |-------|--------|-------|
//! | reference | 0 | 1 |
//! | basis | 1 | n |
//! | composite | ≥ 2 | 2^n − n − 1 |
//!
//! A composite key decomposes uniquely into the basis keys of its set bits.
//! Two decompositions are provided and always agree: a scan over bit
//! positions ([`decompose`]) and greedy subtraction of the largest
//! remaining power of two ([`decompose_greedy`]).
//!
//! # Example
//!
//! ```
//! use separability::{IndexSpace, Ket};
//!
//! let space = IndexSpace::new(4).unwrap();
//! // 13 = 8 + 4 + 1  ↔  1101 = 1000 + 0100 + 0001
//! let parts = space.decompose(Ket::new(13)).unwrap();
//! assert_eq!(parts, vec![Ket::new(8), Ket::new(4), Ket::new(1)]);
//! ```

use super::constants::{composite_count, dimension, is_valid_qubit_count};
use super::ket::Ket;
use crate::error::{Result, SeparabilityError};

/// The basis and composite keys of an n-qubit space.
///
/// # Invariant
///
/// `basis` holds the n weight-1 keys in descending magnitude, `composite`
/// holds every other non-reference key in ascending order, and together
/// with the reference key they cover `0..2^n` exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSpace {
    qubits: u32,
    basis: Vec<Ket>,
    composite: Vec<Ket>,
}

impl IndexSpace {
    /// Builds the space for `qubits` qubits.
    ///
    /// # Errors
    ///
    /// Returns [`SeparabilityError::InvalidQubitCount`] if `qubits` is 0 or
    /// larger than [`crate::MAX_QUBITS`].
    pub fn new(qubits: u32) -> Result<Self> {
        let basis = basis_keys(qubits)?;
        let composite = composite_keys(qubits, &basis)?;
        let space = Self {
            qubits,
            basis,
            composite,
        };
        debug_assert!(space.verify(), "index space partition violated");
        Ok(space)
    }

    /// Qubit count.
    #[inline]
    #[must_use]
    pub const fn qubits(&self) -> u32 {
        self.qubits
    }

    /// Number of keys (`2^n`).
    #[inline]
    #[must_use]
    pub const fn dimension(&self) -> usize {
        dimension(self.qubits)
    }

    /// Basis keys, descending magnitude.
    #[inline]
    #[must_use]
    pub fn basis_keys(&self) -> &[Ket] {
        &self.basis
    }

    /// Composite keys, ascending.
    #[inline]
    #[must_use]
    pub fn composite_keys(&self) -> &[Ket] {
        &self.composite
    }

    /// All keys in ascending order.
    pub fn kets(&self) -> impl Iterator<Item = Ket> {
        (0..self.dimension() as u32).map(Ket::new)
    }

    /// True if `ket` is addressable in this space.
    #[inline]
    #[must_use]
    pub const fn contains(&self, ket: Ket) -> bool {
        ket.fits(self.qubits)
    }

    /// Bit-position decomposition of a composite key.
    ///
    /// # Errors
    ///
    /// See [`decompose`].
    pub fn decompose(&self, ket: Ket) -> Result<Vec<Ket>> {
        decompose(ket, &self.basis)
    }

    /// Greedy power-of-two decomposition of a composite key.
    ///
    /// # Errors
    ///
    /// See [`decompose_greedy`].
    pub fn decompose_greedy(&self, ket: Ket) -> Result<Vec<Ket>> {
        decompose_greedy(ket, &self.basis)
    }

    /// Checks the disjoint-cover invariant.
    #[must_use]
    pub fn verify(&self) -> bool {
        if self.basis.len() != self.qubits as usize
            || self.composite.len() != composite_count(self.qubits)
        {
            return false;
        }
        let mut seen = vec![false; self.dimension()];
        seen[0] = true;
        for ket in self.basis.iter().chain(&self.composite) {
            let slot = &mut seen[ket.as_usize()];
            if *slot {
                return false;
            }
            *slot = true;
        }
        seen.into_iter().all(|s| s)
    }
}

/// The n weight-1 keys, descending magnitude (`2^(n-1)` down to `1`).
///
/// # Errors
///
/// Returns [`SeparabilityError::InvalidQubitCount`] for an unsupported `qubits`.
///
/// # Example
///
/// ```
/// use separability::{space::basis_keys, Ket};
///
/// let basis = basis_keys(3).unwrap();
/// assert_eq!(basis, vec![Ket::new(4), Ket::new(2), Ket::new(1)]);
/// ```
pub fn basis_keys(qubits: u32) -> Result<Vec<Ket>> {
    if !is_valid_qubit_count(qubits) {
        return Err(SeparabilityError::InvalidQubitCount { qubits });
    }
    Ok((0..qubits).map(|i| Ket::basis(qubits, i)).collect())
}

/// Every key in `1..2^n` that is not in `basis`, ascending.
///
/// `basis` is expected to be the output of [`basis_keys`] for the same
/// `qubits`.
///
/// # Errors
///
/// Returns [`SeparabilityError::InvalidQubitCount`] for an unsupported `qubits`.
pub fn composite_keys(qubits: u32, basis: &[Ket]) -> Result<Vec<Ket>> {
    if !is_valid_qubit_count(qubits) {
        return Err(SeparabilityError::InvalidQubitCount { qubits });
    }
    Ok((1..dimension(qubits) as u32)
        .map(Ket::new)
        .filter(|k| !(k.is_basis() && basis.contains(k)))
        .collect())
}

/// Decomposes a composite key by scanning its bit positions.
///
/// Returns `basis[i]` for every set bit at big-endian position `i`, in
/// ascending position order. The width of the space is `basis.len()`.
///
/// # Errors
///
/// - [`SeparabilityError::KetOutOfRange`] if `ket` is wider than the space.
/// - [`SeparabilityError::NotComposite`] for the reference key or a basis key.
pub fn decompose(ket: Ket, basis: &[Ket]) -> Result<Vec<Ket>> {
    let qubits = require_composite(ket, basis)?;
    Ok((0..qubits)
        .filter(|&i| (ket.index() >> (qubits - 1 - i)) & 1 == 1)
        .map(|i| basis[i as usize])
        .collect())
}

/// Decomposes a composite key by subtracting the largest remaining basis
/// value until nothing is left.
///
/// Binary representation is unique, so this always equals [`decompose`].
///
/// # Errors
///
/// Same as [`decompose`].
pub fn decompose_greedy(ket: Ket, basis: &[Ket]) -> Result<Vec<Ket>> {
    require_composite(ket, basis)?;
    let mut rest = ket.index();
    let mut parts = Vec::with_capacity(ket.weight() as usize);
    for &b in basis {
        if rest >= b.index() {
            rest -= b.index();
            parts.push(b);
        }
    }
    debug_assert_eq!(rest, 0);
    Ok(parts)
}

/// Constituents of a composite key computed without a prebuilt basis list.
///
/// # Errors
///
/// Same as [`decompose`], plus [`SeparabilityError::InvalidQubitCount`].
///
/// # Example
///
/// ```
/// use separability::{space::generate_constituents, Ket};
///
/// let parts = generate_constituents(Ket::new(0b0011), 4).unwrap();
/// assert_eq!(parts, vec![Ket::new(0b0010), Ket::new(0b0001)]);
/// ```
pub fn generate_constituents(ket: Ket, qubits: u32) -> Result<Vec<Ket>> {
    if !is_valid_qubit_count(qubits) {
        return Err(SeparabilityError::InvalidQubitCount { qubits });
    }
    if !ket.fits(qubits) {
        return Err(SeparabilityError::KetOutOfRange { ket, qubits });
    }
    if !ket.is_composite() {
        return Err(SeparabilityError::NotComposite { ket });
    }
    Ok((0..qubits)
        .rev()
        .filter(|&shift| (ket.index() >> shift) & 1 == 1)
        .map(|shift| Ket::new(1 << shift))
        .collect())
}

fn require_composite(ket: Ket, basis: &[Ket]) -> Result<u32> {
    let qubits = basis.len() as u32;
    if !ket.fits(qubits) {
        return Err(SeparabilityError::KetOutOfRange { ket, qubits });
    }
    if !ket.is_composite() {
        return Err(SeparabilityError::NotComposite { ket });
    }
    Ok(qubits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::MAX_QUBITS;

    fn bit_string_decompose(ket: Ket, basis: &[Ket]) -> Vec<Ket> {
        let n = basis.len() as u32;
        ket.bits(n)
            .to_string()
            .chars()
            .enumerate()
            .filter(|&(_, c)| c == '1')
            .map(|(i, _)| basis[i])
            .collect()
    }

    #[test]
    fn test_counts() {
        for n in 1..=10 {
            let space = IndexSpace::new(n).unwrap();
            assert_eq!(space.basis_keys().len(), n as usize);
            assert_eq!(space.composite_keys().len(), (1usize << n) - n as usize - 1);
            assert!(space.verify());
        }
    }

    #[test]
    fn test_zero_qubits_rejected() {
        assert_eq!(
            IndexSpace::new(0),
            Err(SeparabilityError::InvalidQubitCount { qubits: 0 })
        );
    }

    #[test]
    fn test_single_qubit_has_no_composites() {
        let space = IndexSpace::new(1).unwrap();
        assert_eq!(space.basis_keys(), &[Ket::new(1)]);
        assert!(space.composite_keys().is_empty());
    }

    #[test]
    fn test_four_qubit_listing() {
        let space = IndexSpace::new(4).unwrap();
        let bits = |ks: &[Ket]| ks.iter().map(|k| k.bits(4).to_string()).collect::<Vec<_>>();
        assert_eq!(bits(space.basis_keys()), ["1000", "0100", "0010", "0001"]);
        assert_eq!(
            bits(space.composite_keys()),
            [
                "0011", "0101", "0110", "0111", "1001", "1010", "1011", "1100", "1101", "1110",
                "1111"
            ]
        );
    }

    #[test]
    fn test_decompositions_agree() {
        for n in 2..=8 {
            let space = IndexSpace::new(n).unwrap();
            for &k in space.composite_keys() {
                let scan = space.decompose(k).unwrap();
                assert_eq!(space.decompose_greedy(k).unwrap(), scan);
                assert_eq!(bit_string_decompose(k, space.basis_keys()), scan);
                assert_eq!(generate_constituents(k, n).unwrap(), scan);
            }
        }
    }

    #[test]
    fn test_decompose_rejects_non_composite() {
        let space = IndexSpace::new(3).unwrap();
        assert_eq!(
            space.decompose(Ket::REFERENCE),
            Err(SeparabilityError::NotComposite {
                ket: Ket::REFERENCE
            })
        );
        for &b in space.basis_keys() {
            assert!(matches!(
                space.decompose_greedy(b),
                Err(SeparabilityError::NotComposite { .. })
            ));
        }
        assert!(matches!(
            space.decompose(Ket::new(8)),
            Err(SeparabilityError::KetOutOfRange { qubits: 3, .. })
        ));
    }

    #[test]
    fn test_composite_keys_rejects_wide_spaces() {
        for qubits in [0, MAX_QUBITS + 1, 32, 40, 64, u32::MAX] {
            assert_eq!(
                composite_keys(qubits, &[]),
                Err(SeparabilityError::InvalidQubitCount { qubits })
            );
        }
        let basis = basis_keys(3).unwrap();
        assert_eq!(composite_keys(3, &basis).unwrap().len(), 4);
    }
}
