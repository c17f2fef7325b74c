//! Error type shared by every stage of the separability pipeline.

use crate::core::ket::Ket;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, SeparabilityError>;

/// Failures raised by the core.
///
/// Every variant except [`SeparabilityError::NoEligibleSource`] is a
/// contract violation by the caller. `NoEligibleSource` is the data-driven
/// terminal: the state has no non-zero amplitude, so no separability
/// determination is possible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeparabilityError {
    /// Qubit count outside `1..=MAX_QUBITS`.
    #[error("qubit count {qubits} is outside 1..={max}", max = crate::MAX_QUBITS)]
    InvalidQubitCount {
        /// The rejected qubit count.
        qubits: u32,
    },

    /// Amplitude vector length is not `2^n`.
    #[error("expected {expected} amplitudes, got {actual}")]
    DimensionMismatch {
        /// Required length (`2^n`).
        expected: usize,
        /// Supplied length.
        actual: usize,
    },

    /// Key does not fit in the qubit width.
    #[error("ket {ket} does not fit in {qubits} qubits")]
    KetOutOfRange {
        /// The offending key.
        ket: Ket,
        /// Width of the key space.
        qubits: u32,
    },

    /// Text is not a bit string of the expected width.
    #[error("'{input}' is not a {qubits}-bit string")]
    InvalidBitString {
        /// The rejected text.
        input: String,
        /// Expected width.
        qubits: u32,
    },

    /// `decompose` was called on the reference key or a basis key.
    #[error("ket {ket} is not composite")]
    NotComposite {
        /// The non-composite key.
        ket: Ket,
    },

    /// `normalize` was called with a zero reference amplitude.
    #[error("reference amplitude is zero; apply a basis change first")]
    ZeroReference,

    /// `evaluate` was called before normalization.
    #[error("reference amplitude must be exactly 1 before the consistency check")]
    ReferenceNotUnit,

    /// The chosen source key has zero amplitude.
    #[error("ket {ket} has zero amplitude and cannot be mapped to the reference key")]
    IneligibleSource {
        /// The rejected key.
        ket: Ket,
    },

    /// Every amplitude is zero.
    #[error("every amplitude is zero; no separability determination possible")]
    NoEligibleSource,
}
