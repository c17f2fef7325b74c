//! XOR basis change.
//!
//! When the reference amplitude is zero the criterion cannot be normalized.
//! Relabeling every key `k` as `k ^ s` for a source key `s` with non-zero
//! amplitude moves that amplitude onto the reference key:
//!
//! ```text
//! new[k ^ s] = old[k]      ⇒      new[0] = old[s] ≠ 0
//! ```
//!
//! XOR with a fixed key is an involution, so the relabeling is a bijection
//! of the key space and applying it twice restores the original state.
//!
//! Which source to use is a policy decision, expressed by [`SourceChooser`].

use crate::core::constants::dimension;
use crate::core::ket::Ket;
use crate::error::{Result, SeparabilityError};
use crate::state::{StateVector, ZERO};
use rand::seq::SliceRandom;
use rand::Rng;

/// Construction used to build the relabeled state.
///
/// Both produce identical states; they differ only in intermediate
/// structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum TransformMethod {
    /// Write each amplitude directly at its XOR-ed key.
    Rekey,
    /// Build a [`RelabelTable`] first, then gather amplitudes in original
    /// key order.
    #[default]
    Relabel,
}

/// New key → old key mapping for a fixed source.
///
/// # Example
///
/// ```
/// use separability::{transform::RelabelTable, Ket};
///
/// let table = RelabelTable::new(2, Ket::new(0b01)).unwrap();
/// assert_eq!(table.old_ket(Ket::new(0b00)), Some(Ket::new(0b01)));
/// assert_eq!(table.old_ket(Ket::new(0b10)), Some(Ket::new(0b11)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelabelTable {
    source: Ket,
    old: Vec<Ket>,
}

impl RelabelTable {
    /// Builds the mapping for an n-qubit space.
    ///
    /// # Errors
    ///
    /// - [`SeparabilityError::InvalidQubitCount`] for an unsupported `qubits`.
    /// - [`SeparabilityError::KetOutOfRange`] if `source` is outside the space.
    pub fn new(qubits: u32, source: Ket) -> Result<Self> {
        if !crate::core::constants::is_valid_qubit_count(qubits) {
            return Err(SeparabilityError::InvalidQubitCount { qubits });
        }
        if !source.fits(qubits) {
            return Err(SeparabilityError::KetOutOfRange {
                ket: source,
                qubits,
            });
        }
        let old = (0..dimension(qubits) as u32)
            .map(|k| Ket::new(k) ^ source)
            .collect();
        Ok(Self { source, old })
    }

    /// The source key mapped onto the reference key.
    #[inline]
    #[must_use]
    pub const fn source(&self) -> Ket {
        self.source
    }

    /// Key whose amplitude lands on `new` after the relabeling.
    #[inline]
    #[must_use]
    pub fn old_ket(&self, new: Ket) -> Option<Ket> {
        self.old.get(new.as_usize()).copied()
    }

    /// `(new, old)` pairs in ascending new-key order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Ket, Ket)> + '_ {
        self.old
            .iter()
            .enumerate()
            .map(|(i, &old)| (Ket::new(i as u32), old))
    }
}

/// Relabels `state` by XOR with `source` using the default method.
///
/// # Errors
///
/// Returns [`SeparabilityError::KetOutOfRange`] if `source` is outside the
/// space.
///
/// # Example
///
/// ```
/// use separability::{transform::transform, Ket, StateVector};
///
/// let psi = StateVector::from_reals(2, &[0.0, 1.0, 2.0, 3.0]).unwrap();
/// let phi = transform(&psi, Ket::new(0b01)).unwrap();
/// assert_eq!(phi[Ket::REFERENCE], psi[Ket::new(0b01)]);
/// assert_eq!(phi[Ket::new(0b01)], psi[Ket::REFERENCE]);
/// ```
pub fn transform(state: &StateVector, source: Ket) -> Result<StateVector> {
    transform_with(state, source, TransformMethod::default())
}

/// Relabels `state` by XOR with `source` using `method`.
///
/// `source` is not required to have a non-zero amplitude; eligibility is
/// the chooser's concern.
///
/// # Errors
///
/// Returns [`SeparabilityError::KetOutOfRange`] if `source` is outside the
/// space.
pub fn transform_with(
    state: &StateVector,
    source: Ket,
    method: TransformMethod,
) -> Result<StateVector> {
    if !source.fits(state.qubits()) {
        return Err(SeparabilityError::KetOutOfRange {
            ket: source,
            qubits: state.qubits(),
        });
    }
    let amplitudes = match method {
        TransformMethod::Rekey => {
            let mut out = vec![ZERO; state.dimension()];
            for (k, a) in state.iter() {
                out[(k ^ source).as_usize()] = a;
            }
            out
        }
        TransformMethod::Relabel => {
            let table = RelabelTable::new(state.qubits(), source)?;
            table.iter().map(|(_, old)| state[old]).collect()
        }
    };
    tracing::debug!(
        source = %source.bits(state.qubits()),
        ?method,
        "relabeled state by xor"
    );
    Ok(state.with_amplitudes(amplitudes))
}

/// Keys eligible as a transform source (non-zero amplitude), ascending.
#[must_use]
pub fn eligible_sources(state: &StateVector) -> Vec<Ket> {
    state.nonzero_kets()
}

/// Picks the source key for a basis change.
///
/// Implementations receive the non-empty, ascending list of eligible keys
/// and the state they were drawn from.
pub trait SourceChooser {
    /// Returns one key of `eligible`.
    ///
    /// # Errors
    ///
    /// Implementations return [`SeparabilityError::IneligibleSource`] for a
    /// key outside `eligible`, or [`SeparabilityError::NoEligibleSource`]
    /// when they cannot choose.
    fn choose(&mut self, state: &StateVector, eligible: &[Ket]) -> Result<Ket>;
}

impl<C: SourceChooser + ?Sized> SourceChooser for &mut C {
    fn choose(&mut self, state: &StateVector, eligible: &[Ket]) -> Result<Ket> {
        (**self).choose(state, eligible)
    }
}

impl<C: SourceChooser + ?Sized> SourceChooser for Box<C> {
    fn choose(&mut self, state: &StateVector, eligible: &[Ket]) -> Result<Ket> {
        (**self).choose(state, eligible)
    }
}

/// Always the lowest eligible key. Deterministic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FirstEligible;

impl SourceChooser for FirstEligible {
    fn choose(&mut self, _state: &StateVector, eligible: &[Ket]) -> Result<Ket> {
        eligible
            .first()
            .copied()
            .ok_or(SeparabilityError::NoEligibleSource)
    }
}

/// A key fixed in advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSource(pub Ket);

impl SourceChooser for FixedSource {
    fn choose(&mut self, _state: &StateVector, eligible: &[Ket]) -> Result<Ket> {
        if eligible.is_empty() {
            return Err(SeparabilityError::NoEligibleSource);
        }
        if eligible.binary_search(&self.0).is_ok() {
            Ok(self.0)
        } else {
            Err(SeparabilityError::IneligibleSource { ket: self.0 })
        }
    }
}

/// Uniform choice over the eligible keys.
#[derive(Debug, Clone)]
pub struct RandomSource<R> {
    rng: R,
}

impl<R: Rng> RandomSource<R> {
    /// Wraps a random number generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> SourceChooser for RandomSource<R> {
    fn choose(&mut self, _state: &StateVector, eligible: &[Ket]) -> Result<Ket> {
        eligible
            .choose(&mut self.rng)
            .copied()
            .ok_or(SeparabilityError::NoEligibleSource)
    }
}

/// Contract for a general basis change that can handle states where no
/// XOR relabeling yields a usable reference.
///
/// No implementation ships with this crate.
pub trait GeneralBasisChange {
    /// Returns a state equivalent to `state` whose reference amplitude is
    /// non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`SeparabilityError::NoEligibleSource`] when no basis change
    /// applies.
    fn change_basis(&self, state: &StateVector) -> Result<StateVector>;
}
