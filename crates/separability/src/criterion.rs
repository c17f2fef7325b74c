//! Product-consistency criterion.
//!
//! With the reference amplitude normalized to 1, a state is separable iff
//! every composite key's amplitude equals the product of the amplitudes of
//! its basis constituents:
//!
//! ```text
//! Psi['1101'] == Psi['1000'] * Psi['0100'] * Psi['0001']
//! ```
//!
//! One failing key is enough to call the state entangled.

use crate::core::ket::Ket;
use crate::core::space::generate_constituents;
use crate::error::{Result, SeparabilityError};
use crate::state::{StateVector, ONE};
use crate::table::DecompositionTable;
use num_complex::Complex64;

/// How a composite amplitude is compared with its target product.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "mode", rename_all = "snake_case")
)]
pub enum Equality {
    /// Bit-exact complex equality.
    #[default]
    Exact,
    /// `|amplitude - target| <= epsilon`.
    Tolerance {
        /// Largest accepted distance.
        epsilon: f64,
    },
}

impl Equality {
    /// Compares two amplitudes under this rule.
    ///
    /// # Example
    ///
    /// ```
    /// use num_complex::Complex64;
    /// use separability::Equality;
    ///
    /// let a = Complex64::new(0.1 + 0.2, 0.0);
    /// let b = Complex64::new(0.3, 0.0);
    /// assert!(!Equality::Exact.matches(a, b));
    /// assert!(Equality::Tolerance { epsilon: 1e-12 }.matches(a, b));
    /// ```
    #[inline]
    #[must_use]
    pub fn matches(self, amplitude: Complex64, target: Complex64) -> bool {
        match self {
            Self::Exact => amplitude == target,
            Self::Tolerance { epsilon } => (amplitude - target).norm() <= epsilon,
        }
    }
}

/// Outcome of the criterion for one composite key.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct KetRecord {
    /// The composite key.
    pub ket: Ket,
    /// Its basis constituents, descending magnitude.
    pub constituents: Vec<Ket>,
    /// Amplitude stored at `ket`.
    pub amplitude: Complex64,
    /// Product of the constituent amplitudes.
    pub target_amplitude: Complex64,
    /// Whether `amplitude` matched `target_amplitude`.
    pub equal: bool,
}

impl KetRecord {
    /// `Psi['0010']*Psi['0001']` style rendering of the constituent product.
    #[must_use]
    pub fn product_expression(&self, qubits: u32) -> String {
        self.constituents
            .iter()
            .map(|c| format!("Psi['{}']", c.bits(qubits)))
            .collect::<Vec<_>>()
            .join("*")
    }

    /// `Psi['0011'] == Psi['0010']*Psi['0001'] is False` style rendering.
    #[must_use]
    pub fn equation(&self, qubits: u32) -> String {
        format!(
            "Psi['{}'] == {} is {}",
            self.ket.bits(qubits),
            self.product_expression(qubits),
            if self.equal { "True" } else { "False" }
        )
    }
}

/// Per-key records plus the aggregate decision.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Verdict {
    qubits: u32,
    entangled: bool,
    records: Vec<KetRecord>,
}

impl Verdict {
    /// Qubit count of the evaluated state.
    #[inline]
    #[must_use]
    pub const fn qubits(&self) -> u32 {
        self.qubits
    }

    /// True iff at least one composite key failed the criterion.
    #[inline]
    #[must_use]
    pub const fn is_entangled(&self) -> bool {
        self.entangled
    }

    /// Records in ascending key order.
    #[inline]
    #[must_use]
    pub fn records(&self) -> &[KetRecord] {
        &self.records
    }

    /// Record for `ket`, if it is a composite key.
    #[must_use]
    pub fn record(&self, ket: Ket) -> Option<&KetRecord> {
        self.records
            .binary_search_by_key(&ket, |r| r.ket)
            .ok()
            .map(|i| &self.records[i])
    }

    /// Records that failed the criterion.
    pub fn failures(&self) -> impl Iterator<Item = &KetRecord> {
        self.records.iter().filter(|r| !r.equal)
    }

    /// Consumes the verdict, returning the records.
    #[must_use]
    pub fn into_records(self) -> Vec<KetRecord> {
        self.records
    }
}

/// Left-fold product of the constituent amplitudes; 1 for an empty list.
///
/// # Panics
///
/// Panics if a constituent lies outside the state's key space.
#[must_use]
pub fn target_amplitude(state: &StateVector, constituents: &[Ket]) -> Complex64 {
    constituents.iter().fold(ONE, |acc, &c| acc * state[c])
}

/// Applies the criterion to one composite key with known constituents.
///
/// # Panics
///
/// Panics if `ket` or a constituent lies outside the state's key space.
#[must_use]
pub fn check(state: &StateVector, ket: Ket, constituents: &[Ket], equality: Equality) -> KetRecord {
    let amplitude = state[ket];
    let target_amplitude = target_amplitude(state, constituents);
    KetRecord {
        ket,
        constituents: constituents.to_vec(),
        amplitude,
        target_amplitude,
        equal: equality.matches(amplitude, target_amplitude),
    }
}

/// Applies the criterion to one composite key, generating its constituents
/// on the fly instead of reading them from a table.
///
/// # Errors
///
/// - [`SeparabilityError::KetOutOfRange`] if `ket` is outside the space.
/// - [`SeparabilityError::NotComposite`] for the reference or a basis key.
pub fn check_ket(state: &StateVector, ket: Ket, equality: Equality) -> Result<KetRecord> {
    let constituents = generate_constituents(ket, state.qubits())?;
    Ok(check(state, ket, &constituents, equality))
}

/// Runs the criterion over every composite key of `table`.
///
/// # Errors
///
/// - [`SeparabilityError::DimensionMismatch`] if the state and table have
///   different qubit counts.
/// - [`SeparabilityError::ReferenceNotUnit`] if the reference amplitude is
///   not exactly 1.
///
/// # Example
///
/// ```
/// use separability::{criterion::evaluate, DecompositionTable, Equality, StateVector};
///
/// let table = DecompositionTable::build(3).unwrap();
/// let psi = StateVector::ones(3).unwrap();
/// let verdict = evaluate(&psi, &table, Equality::Exact).unwrap();
/// assert!(!verdict.is_entangled());
/// assert!(verdict.records().iter().all(|r| r.equal));
/// ```
pub fn evaluate(
    state: &StateVector,
    table: &DecompositionTable,
    equality: Equality,
) -> Result<Verdict> {
    if state.qubits() != table.qubits() {
        return Err(SeparabilityError::DimensionMismatch {
            expected: table.space().dimension(),
            actual: state.dimension(),
        });
    }
    if state.reference() != ONE {
        return Err(SeparabilityError::ReferenceNotUnit);
    }

    let records: Vec<KetRecord> = table
        .iter()
        .map(|d| check(state, d.ket(), d.constituents(), equality))
        .collect();
    let entangled = records.iter().any(|r| !r.equal);

    for r in records.iter().filter(|r| !r.equal) {
        tracing::trace!(
            ket = %r.ket.bits(state.qubits()),
            amplitude = %r.amplitude,
            target = %r.target_amplitude,
            "criterion failed"
        );
    }

    Ok(Verdict {
        qubits: state.qubits(),
        entangled,
        records,
    })
}
