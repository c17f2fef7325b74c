//! Dense amplitude mapping over the n-bit key space.
//!
//! A [`StateVector`] holds exactly `2^n` complex amplitudes indexed by
//! [`Ket`]. Insertion order never matters: lookups go through the key and
//! iteration is always in ascending key order.

use crate::core::constants::{dimension, is_valid_qubit_count};
use crate::core::ket::Ket;
use crate::error::{Result, SeparabilityError};
use core::ops::Index;
use num_complex::Complex64;

/// Complex zero.
pub const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Complex one, the required reference amplitude before the check.
pub const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Amplitudes of an n-qubit state, one per key.
///
/// # Example
///
/// ```
/// use num_complex::Complex64;
/// use separability::{Ket, StateVector};
///
/// let psi = StateVector::from_reals(2, &[1.0, 0.0, 0.0, 1.0]).unwrap();
/// assert_eq!(psi[Ket::new(3)], Complex64::new(1.0, 0.0));
/// assert_eq!(psi.nonzero_kets(), vec![Ket::new(0), Ket::new(3)]);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "RawStateVector")
)]
pub struct StateVector {
    qubits: u32,
    amplitudes: Vec<Complex64>,
}

impl StateVector {
    /// Wraps `2^n` amplitudes.
    ///
    /// # Errors
    ///
    /// - [`SeparabilityError::InvalidQubitCount`] for an unsupported `qubits`.
    /// - [`SeparabilityError::DimensionMismatch`] if the length is not `2^n`.
    pub fn from_amplitudes(qubits: u32, amplitudes: Vec<Complex64>) -> Result<Self> {
        if !is_valid_qubit_count(qubits) {
            return Err(SeparabilityError::InvalidQubitCount { qubits });
        }
        let expected = dimension(qubits);
        if amplitudes.len() != expected {
            return Err(SeparabilityError::DimensionMismatch {
                expected,
                actual: amplitudes.len(),
            });
        }
        Ok(Self { qubits, amplitudes })
    }

    /// Real amplitudes, convenient for hand-written states.
    ///
    /// # Errors
    ///
    /// Same as [`StateVector::from_amplitudes`].
    pub fn from_reals(qubits: u32, reals: &[f64]) -> Result<Self> {
        Self::from_amplitudes(qubits, reals.iter().map(|&r| Complex64::new(r, 0.0)).collect())
    }

    /// Every amplitude set to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`SeparabilityError::InvalidQubitCount`] for an unsupported
    /// `qubits`.
    pub fn filled(qubits: u32, value: Complex64) -> Result<Self> {
        if !is_valid_qubit_count(qubits) {
            return Err(SeparabilityError::InvalidQubitCount { qubits });
        }
        Ok(Self {
            qubits,
            amplitudes: vec![value; dimension(qubits)],
        })
    }

    /// The all-ones base state (every amplitude `1 + 0i`).
    ///
    /// # Errors
    ///
    /// Returns [`SeparabilityError::InvalidQubitCount`] for an unsupported
    /// `qubits`.
    pub fn ones(qubits: u32) -> Result<Self> {
        Self::filled(qubits, ONE)
    }

    /// All-zero state, used as the blank when filling amplitudes one key at
    /// a time.
    ///
    /// # Errors
    ///
    /// Returns [`SeparabilityError::InvalidQubitCount`] for an unsupported
    /// `qubits`.
    pub fn zeros(qubits: u32) -> Result<Self> {
        Self::filled(qubits, ZERO)
    }

    /// Builds a state from `(bit string, amplitude)` pairs. Keys that are not
    /// listed stay zero; a key listed twice keeps its last value.
    ///
    /// # Errors
    ///
    /// - [`SeparabilityError::InvalidQubitCount`] for an unsupported `qubits`.
    /// - [`SeparabilityError::InvalidBitString`] for a malformed key.
    ///
    /// # Example
    ///
    /// ```
    /// use num_complex::Complex64;
    /// use separability::{Ket, StateVector};
    ///
    /// let one = Complex64::new(1.0, 0.0);
    /// let psi = StateVector::from_bits(2, [("00", one), ("11", one)]).unwrap();
    /// assert_eq!(psi[Ket::new(3)], one);
    /// assert_eq!(psi[Ket::new(1)], Complex64::new(0.0, 0.0));
    /// ```
    pub fn from_bits<'a, I>(qubits: u32, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, Complex64)>,
    {
        let mut state = Self::zeros(qubits)?;
        for (bits, amplitude) in pairs {
            let ket = Ket::parse_bits(bits, qubits)?;
            state.amplitudes[ket.as_usize()] = amplitude;
        }
        Ok(state)
    }

    /// Qubit count.
    #[inline]
    #[must_use]
    pub const fn qubits(&self) -> u32 {
        self.qubits
    }

    /// Number of amplitudes (`2^n`).
    #[inline]
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.amplitudes.len()
    }

    /// Amplitude of `ket`, or `None` outside the space.
    #[inline]
    #[must_use]
    pub fn get(&self, ket: Ket) -> Option<Complex64> {
        self.amplitudes.get(ket.as_usize()).copied()
    }

    /// Overwrites the amplitude of `ket`.
    ///
    /// # Errors
    ///
    /// Returns [`SeparabilityError::KetOutOfRange`] outside the space.
    pub fn set(&mut self, ket: Ket, amplitude: Complex64) -> Result<()> {
        match self.amplitudes.get_mut(ket.as_usize()) {
            Some(slot) => {
                *slot = amplitude;
                Ok(())
            }
            None => Err(SeparabilityError::KetOutOfRange {
                ket,
                qubits: self.qubits,
            }),
        }
    }

    /// Amplitude of the all-zeros reference key.
    #[inline]
    #[must_use]
    pub fn reference(&self) -> Complex64 {
        self.amplitudes[0]
    }

    /// Raw amplitudes in key order.
    #[inline]
    #[must_use]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Consumes the state, returning the raw amplitudes.
    #[inline]
    #[must_use]
    pub fn into_amplitudes(self) -> Vec<Complex64> {
        self.amplitudes
    }

    /// `(key, amplitude)` pairs in ascending key order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Ket, Complex64)> + '_ {
        self.amplitudes
            .iter()
            .enumerate()
            .map(|(i, &a)| (Ket::new(i as u32), a))
    }

    /// Keys with non-zero amplitude, ascending.
    #[must_use]
    pub fn nonzero_kets(&self) -> Vec<Ket> {
        self.iter()
            .filter(|&(_, a)| a != ZERO)
            .map(|(k, _)| k)
            .collect()
    }

    /// Sum of squared magnitudes.
    #[must_use]
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum()
    }

    pub(crate) fn with_amplitudes(&self, amplitudes: Vec<Complex64>) -> Self {
        debug_assert_eq!(amplitudes.len(), self.amplitudes.len());
        Self {
            qubits: self.qubits,
            amplitudes,
        }
    }
}

/// Unchecked wire form; deserialization goes through
/// [`StateVector::from_amplitudes`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct RawStateVector {
    qubits: u32,
    amplitudes: Vec<Complex64>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawStateVector> for StateVector {
    type Error = SeparabilityError;

    fn try_from(raw: RawStateVector) -> Result<Self> {
        Self::from_amplitudes(raw.qubits, raw.amplitudes)
    }
}

impl Index<Ket> for StateVector {
    type Output = Complex64;

    /// # Panics
    ///
    /// Panics if `ket` lies outside the space.
    #[inline]
    fn index(&self, ket: Ket) -> &Complex64 {
        &self.amplitudes[ket.as_usize()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_checked() {
        assert_eq!(
            StateVector::from_reals(2, &[1.0, 2.0, 3.0]),
            Err(SeparabilityError::DimensionMismatch {
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            StateVector::ones(0),
            Err(SeparabilityError::InvalidQubitCount { qubits: 0 })
        );
    }

    #[test]
    fn test_ones() {
        let psi = StateVector::ones(3).unwrap();
        assert_eq!(psi.dimension(), 8);
        assert!(psi.iter().all(|(_, a)| a == ONE));
        assert_eq!(psi.reference(), ONE);
    }

    #[test]
    fn test_from_bits_defaults_to_zero() {
        let psi = StateVector::from_bits(3, [("101", Complex64::new(0.0, 2.0))]).unwrap();
        assert_eq!(psi[Ket::new(5)], Complex64::new(0.0, 2.0));
        assert_eq!(psi.nonzero_kets(), vec![Ket::new(5)]);
        assert!(StateVector::from_bits(3, [("10", ONE)]).is_err());
    }

    #[test]
    fn test_set_and_get() {
        let mut psi = StateVector::zeros(2).unwrap();
        psi.set(Ket::new(2), ONE).unwrap();
        assert_eq!(psi.get(Ket::new(2)), Some(ONE));
        assert_eq!(psi.get(Ket::new(4)), None);
        assert!(matches!(
            psi.set(Ket::new(4), ONE),
            Err(SeparabilityError::KetOutOfRange { qubits: 2, .. })
        ));
    }

    #[test]
    fn test_iter_in_key_order() {
        let psi = StateVector::from_reals(2, &[4.0, 3.0, 2.0, 1.0]).unwrap();
        let keys: Vec<u32> = psi.iter().map(|(k, _)| k.index()).collect();
        assert_eq!(keys, vec![0, 1, 2, 3]);
        assert_eq!(psi.norm_sqr(), 30.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_validates_length() {
        let short = r#"{"qubits":2,"amplitudes":[[0.0,0.0],[1.0,0.0]]}"#;
        let err = serde_json::from_str::<StateVector>(short).unwrap_err();
        assert!(err.to_string().contains("expected 4 amplitudes, got 2"));

        let wide = r#"{"qubits":0,"amplitudes":[[1.0,0.0]]}"#;
        assert!(serde_json::from_str::<StateVector>(wide).is_err());

        let psi = StateVector::from_reals(2, &[1.0, 0.0, 0.0, 1.0]).unwrap();
        let text = serde_json::to_string(&psi).unwrap();
        assert_eq!(serde_json::from_str::<StateVector>(&text).unwrap(), psi);
    }
}
