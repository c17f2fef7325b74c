//! The `Ket` key type.
//!
//! A ket is an n-bit identifier for one amplitude of a state vector. The
//! canonical form is the integer index; the zero-padded big-endian bit
//! string is only produced or parsed at the I/O boundary.
//!
//! | Index | Bits (n = 4) | Class |
//! |-------|--------------|-------|
//! | 0 | `0000` | reference |
//! | 4 | `0100` | basis |
//! | 13 | `1101` | composite |

use crate::error::{Result, SeparabilityError};
use core::fmt;
use core::ops::BitXor;

/// An n-bit key into a state vector.
///
/// The width is not stored; it belongs to the space the ket is used in.
///
/// # Example
///
/// ```
/// use separability::Ket;
///
/// let k = Ket::new(0b1101);
/// assert_eq!(k.weight(), 3);
/// assert!(k.is_composite());
/// assert_eq!(k.bits(4).to_string(), "1101");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Ket(u32);

impl Ket {
    /// The all-zeros reference key.
    pub const REFERENCE: Self = Self(0);

    /// Creates a ket from its integer index.
    #[inline]
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// The basis ket for big-endian bit position `position` in an
    /// n-qubit space: value `2^(n - 1 - position)`.
    ///
    /// # Example
    ///
    /// ```
    /// use separability::Ket;
    ///
    /// assert_eq!(Ket::basis(4, 0), Ket::new(0b1000));
    /// assert_eq!(Ket::basis(4, 3), Ket::new(0b0001));
    /// ```
    #[inline]
    #[must_use]
    pub const fn basis(qubits: u32, position: u32) -> Self {
        Self(1 << (qubits - 1 - position))
    }

    /// Integer index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Index as a `usize`, for addressing amplitude storage.
    #[inline]
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Number of set bits.
    #[inline]
    #[must_use]
    pub const fn weight(self) -> u32 {
        self.0.count_ones()
    }

    /// True for the all-zeros key.
    #[inline]
    #[must_use]
    pub const fn is_reference(self) -> bool {
        self.0 == 0
    }

    /// True for weight-1 keys.
    #[inline]
    #[must_use]
    pub const fn is_basis(self) -> bool {
        self.weight() == 1
    }

    /// True for keys of weight two or more.
    #[inline]
    #[must_use]
    pub const fn is_composite(self) -> bool {
        self.weight() >= 2
    }

    /// True if the ket is addressable in an n-qubit space.
    #[inline]
    #[must_use]
    pub const fn fits(self, qubits: u32) -> bool {
        qubits >= 32 || self.0 >> qubits == 0
    }

    /// Bitwise XOR relabeling.
    #[inline]
    #[must_use]
    pub const fn xor(self, other: Self) -> Self {
        Self(self.0 ^ other.0)
    }

    /// Bit-string view of width `qubits`.
    #[inline]
    #[must_use]
    pub const fn bits(self, qubits: u32) -> Bits {
        Bits { ket: self, qubits }
    }

    /// Parses a zero-padded big-endian bit string of exactly `qubits`
    /// characters.
    ///
    /// # Errors
    ///
    /// Returns [`SeparabilityError::InvalidBitString`] if the text has the
    /// wrong length or contains anything other than `0` and `1`.
    ///
    /// # Example
    ///
    /// ```
    /// use separability::Ket;
    ///
    /// assert_eq!(Ket::parse_bits("0011", 4).unwrap(), Ket::new(3));
    /// assert!(Ket::parse_bits("011", 4).is_err());
    /// assert!(Ket::parse_bits("0021", 4).is_err());
    /// ```
    pub fn parse_bits(text: &str, qubits: u32) -> Result<Self> {
        let invalid = || SeparabilityError::InvalidBitString {
            input: text.to_owned(),
            qubits,
        };
        if text.len() != qubits as usize || qubits > 32 {
            return Err(invalid());
        }
        let mut value = 0u32;
        for c in text.chars() {
            let bit = match c {
                '0' => 0,
                '1' => 1,
                _ => return Err(invalid()),
            };
            value = (value << 1) | bit;
        }
        Ok(Self(value))
    }
}

impl BitXor for Ket {
    type Output = Self;

    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        self.xor(rhs)
    }
}

impl From<u32> for Ket {
    #[inline]
    fn from(index: u32) -> Self {
        Self(index)
    }
}

impl From<Ket> for u32 {
    #[inline]
    fn from(ket: Ket) -> Self {
        ket.0
    }
}

impl fmt::Display for Ket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fixed-width bit-string rendering of a [`Ket`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bits {
    ket: Ket,
    qubits: u32,
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.ket.0, width = self.qubits as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(Ket::REFERENCE.is_reference());
        assert!(!Ket::REFERENCE.is_basis());
        assert!(!Ket::REFERENCE.is_composite());

        for shift in 0..8 {
            let k = Ket::new(1 << shift);
            assert!(k.is_basis());
            assert!(!k.is_composite());
        }

        assert!(Ket::new(3).is_composite());
        assert!(Ket::new(0b1010_0000).is_composite());
    }

    #[test]
    fn test_basis_positions_are_big_endian() {
        let n = 5;
        let values: Vec<u32> = (0..n).map(|i| Ket::basis(n, i).index()).collect();
        assert_eq!(values, vec![16, 8, 4, 2, 1]);
    }

    #[test]
    fn test_bits_padding() {
        assert_eq!(Ket::new(1).bits(4).to_string(), "0001");
        assert_eq!(Ket::new(0).bits(3).to_string(), "000");
        assert_eq!(Ket::new(10).bits(4).to_string(), "1010");
    }

    #[test]
    fn test_parse_bits_matches_formatting() {
        let n = 6;
        for i in 0..(1u32 << n) {
            let k = Ket::new(i);
            let text = k.bits(n).to_string();
            assert_eq!(Ket::parse_bits(&text, n), Ok(k));
        }
    }

    #[test]
    fn test_parse_bits_rejects() {
        assert!(matches!(
            Ket::parse_bits("", 2),
            Err(SeparabilityError::InvalidBitString { .. })
        ));
        assert!(Ket::parse_bits("0b01", 4).is_err());
        assert!(Ket::parse_bits("10 ", 3).is_err());
    }

    #[test]
    fn test_xor_is_involution() {
        let s = Ket::new(0b0110);
        for i in 0..16 {
            let k = Ket::new(i);
            assert_eq!((k ^ s) ^ s, k);
        }
    }

    #[test]
    fn test_fits() {
        assert!(Ket::new(15).fits(4));
        assert!(!Ket::new(16).fits(4));
        assert!(Ket::new(u32::MAX).fits(32));
    }
}
