//! Separability criterion for dense n-qubit amplitude vectors.
//!
//! A state `|ψ⟩ = Σ ψ[k] |k⟩` over n qubits, with the reference amplitude
//! `ψ[0…0]` normalized to 1, is a product (non-entangled) state iff every
//! composite key's amplitude equals the product of the amplitudes of its
//! basis constituents.
//!
//! # Key Classes
//!
//! | Class | Weight | Example (n = 4) | Role |
//! |-------|--------|-----------------|------|
//! | reference | 0 | `0000` | normalized to 1 |
//! | basis | 1 | `0100` | factors of the product |
//! | composite | ≥ 2 | `1101` | checked against the product |
//!
//! # Pipeline
//!
//! ```text
//! IndexSpace → DecompositionTable (once per n, shared)
//!     state → [reference = 0: XOR basis change] → normalize → criterion → Verdict
//! ```
//!
//! # Example
//!
//! ```
//! use separability::{Evaluator, FirstEligible, Ket, StateVector};
//!
//! let evaluator = Evaluator::new(4).unwrap();
//! let psi = StateVector::from_reals(
//!     4,
//!     &[4.0, 3.0, 2.0, 1.0, 6.0, 3.0, 2.0, 7.0, 10.0, 5.0, 3.0, 7.0, 1.0, 3.0, 9.0, 8.0],
//! )
//! .unwrap();
//!
//! let outcome = evaluator.evaluate(&psi, &mut FirstEligible).unwrap();
//! assert!(outcome.is_entangled());
//!
//! let record = outcome.verdict.record(Ket::parse_bits("0011", 4).unwrap()).unwrap();
//! assert_eq!(record.target_amplitude.re, 0.375);
//! assert!(!record.equal);
//! ```
//!
//! # Design Principles
//!
//! - **Integer keys**: bit strings exist only at the I/O boundary
//! - **Immutable context**: the decomposition table is built once and shared
//! - **Value in, value out**: transforms and normalization return new states
//! - **No I/O**: prompting, sampling and reporting live in the client crate

#![deny(missing_docs)]

pub mod core;
pub mod criterion;
pub mod error;
pub mod evaluator;
pub mod normalize;
pub mod state;
pub mod table;
pub mod transform;

pub use crate::core::constants;
pub use crate::core::ket;
pub use crate::core::space;

pub use crate::core::constants::MAX_QUBITS;
pub use crate::core::ket::{Bits, Ket};
pub use crate::core::space::IndexSpace;
pub use criterion::{Equality, KetRecord, Verdict};
pub use error::{Result, SeparabilityError};
pub use evaluator::{Evaluation, Evaluator, EvaluatorConfig, Stage};
pub use normalize::normalize;
pub use state::StateVector;
pub use table::{Decomposition, DecompositionTable};
pub use transform::{
    FirstEligible, FixedSource, GeneralBasisChange, RandomSource, RelabelTable, SourceChooser,
    TransformMethod,
};
