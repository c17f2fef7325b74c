//! End-to-end separability evaluation.
//!
//! ```text
//! Start → ZeroCheck ─┬──────────────────────────────┬→ Normalized → Checked → Done
//!                    └→ NeedsTransform → Transformed ┘
//!                            └→ Unsatisfiable (no non-zero amplitude)
//! ```
//!
//! The [`Evaluator`] owns the decomposition table for one qubit count behind
//! an [`Arc`]; clones share it, so independent states can be evaluated on
//! separate threads without coordination.

use crate::core::ket::Ket;
use crate::criterion::{self, Equality, Verdict};
use crate::error::{Result, SeparabilityError};
use crate::normalize::normalize;
use crate::state::{StateVector, ONE, ZERO};
use crate::table::DecompositionTable;
use crate::transform::{eligible_sources, transform_with, SourceChooser, TransformMethod};
use std::borrow::Cow;
use std::sync::Arc;

/// Tunables of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct EvaluatorConfig {
    /// Comparison rule for the criterion.
    pub equality: Equality,
    /// Construction used by the basis change.
    pub method: TransformMethod,
}

/// Pipeline stages, in the order they can be visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "snake_case")
)]
pub enum Stage {
    /// State received.
    Start,
    /// Reference amplitude inspected.
    ZeroCheck,
    /// Reference amplitude was zero; a source key is required.
    NeedsTransform,
    /// XOR basis change applied.
    Transformed,
    /// Reference amplitude is exactly 1.
    Normalized,
    /// Criterion evaluated over every composite key.
    Checked,
    /// Verdict produced.
    Done,
}

/// Result of a complete evaluation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Evaluation {
    /// Per-key records and the aggregate decision.
    pub verdict: Verdict,
    /// Source key of the basis change, if one was needed.
    pub source: Option<Ket>,
    /// Whether the state had to be divided by its reference amplitude.
    pub rescaled: bool,
    /// Stages passed through, in order.
    pub trail: Vec<Stage>,
}

impl Evaluation {
    /// Shorthand for `self.verdict.is_entangled()`.
    #[inline]
    #[must_use]
    pub fn is_entangled(&self) -> bool {
        self.verdict.is_entangled()
    }
}

/// Shared context for evaluating states of one qubit count.
///
/// # Example
///
/// ```
/// use separability::{Evaluator, FirstEligible, StateVector};
///
/// let evaluator = Evaluator::new(2).unwrap();
///
/// // |01> + |10> has no reference amplitude; a basis change runs first.
/// let psi = StateVector::from_reals(2, &[0.0, 1.0, 1.0, 0.0]).unwrap();
/// let outcome = evaluator.evaluate(&psi, &mut FirstEligible).unwrap();
/// assert!(outcome.is_entangled());
/// assert!(outcome.source.is_some());
/// ```
#[derive(Debug, Clone)]
pub struct Evaluator {
    table: Arc<DecompositionTable>,
    config: EvaluatorConfig,
}

impl Evaluator {
    /// Builds the decomposition table for `qubits` and uses the default
    /// configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SeparabilityError::InvalidQubitCount`] for an unsupported
    /// `qubits`.
    pub fn new(qubits: u32) -> Result<Self> {
        Ok(Self::with_table(Arc::new(DecompositionTable::build(qubits)?)))
    }

    /// Reuses an existing table.
    #[must_use]
    pub fn with_table(table: Arc<DecompositionTable>) -> Self {
        Self {
            table,
            config: EvaluatorConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EvaluatorConfig) -> Self {
        self.config = config;
        self
    }

    /// The shared decomposition table.
    #[inline]
    #[must_use]
    pub fn table(&self) -> &Arc<DecompositionTable> {
        &self.table
    }

    /// Active configuration.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Qubit count served by this evaluator.
    #[inline]
    #[must_use]
    pub fn qubits(&self) -> u32 {
        self.table.qubits()
    }

    /// Runs the full pipeline on `state`.
    ///
    /// `chooser` is consulted only when the reference amplitude is zero.
    /// `state` itself is never modified.
    ///
    /// # Errors
    ///
    /// - [`SeparabilityError::DimensionMismatch`] if `state` has a different
    ///   qubit count.
    /// - [`SeparabilityError::NoEligibleSource`] if every amplitude is zero.
    /// - Whatever `chooser` returns when it refuses to choose.
    pub fn evaluate<C>(&self, state: &StateVector, chooser: &mut C) -> Result<Evaluation>
    where
        C: SourceChooser + ?Sized,
    {
        let _span = tracing::info_span!("evaluate", qubits = state.qubits()).entered();

        if state.qubits() != self.qubits() {
            return Err(SeparabilityError::DimensionMismatch {
                expected: self.table.space().dimension(),
                actual: state.dimension(),
            });
        }

        let mut trail = vec![Stage::Start, Stage::ZeroCheck];
        let mut source = None;
        let mut current = Cow::Borrowed(state);

        if current.reference() == ZERO {
            trail.push(Stage::NeedsTransform);
            let eligible = eligible_sources(&current);
            if eligible.is_empty() {
                tracing::debug!("no non-zero amplitude; unsatisfiable");
                return Err(SeparabilityError::NoEligibleSource);
            }
            let chosen = chooser.choose(&current, &eligible)?;
            if eligible.binary_search(&chosen).is_err() {
                return Err(SeparabilityError::IneligibleSource { ket: chosen });
            }
            current = Cow::Owned(transform_with(&current, chosen, self.config.method)?);
            source = Some(chosen);
            trail.push(Stage::Transformed);
        }

        let rescaled = current.reference() != ONE;
        if rescaled {
            current = Cow::Owned(normalize(&current)?);
        }
        trail.push(Stage::Normalized);

        let verdict = criterion::evaluate(&current, &self.table, self.config.equality)?;
        trail.push(Stage::Checked);
        tracing::debug!(
            entangled = verdict.is_entangled(),
            failures = verdict.failures().count(),
            composites = verdict.records().len(),
            "criterion evaluated"
        );
        trail.push(Stage::Done);

        Ok(Evaluation {
            verdict,
            source,
            rescaled,
            trail,
        })
    }

    /// Runs the pipeline and returns only the decision.
    ///
    /// # Errors
    ///
    /// Same as [`Evaluator::evaluate`].
    pub fn is_entangled<C>(&self, state: &StateVector, chooser: &mut C) -> Result<bool>
    where
        C: SourceChooser + ?Sized,
    {
        Ok(self.evaluate(state, chooser)?.is_entangled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{FirstEligible, FixedSource};

    #[test]
    fn test_trail_without_transform() {
        let evaluator = Evaluator::new(2).unwrap();
        let psi = StateVector::ones(2).unwrap();
        let outcome = evaluator.evaluate(&psi, &mut FirstEligible).unwrap();
        assert_eq!(
            outcome.trail,
            vec![
                Stage::Start,
                Stage::ZeroCheck,
                Stage::Normalized,
                Stage::Checked,
                Stage::Done
            ]
        );
        assert!(!outcome.rescaled);
        assert_eq!(outcome.source, None);
        assert!(!outcome.is_entangled());
    }

    #[test]
    fn test_trail_with_transform() {
        let evaluator = Evaluator::new(2).unwrap();
        // (|0> + |1>) ⊗ |1>: reference amplitude is zero but the state is a product.
        let psi = StateVector::from_reals(2, &[0.0, 2.0, 0.0, 2.0]).unwrap();
        let outcome = evaluator.evaluate(&psi, &mut FirstEligible).unwrap();
        assert_eq!(outcome.source, Some(Ket::new(1)));
        assert!(outcome.rescaled);
        assert!(outcome.trail.contains(&Stage::Transformed));
        assert!(!outcome.is_entangled());
    }

    #[test]
    fn test_unsatisfiable() {
        let evaluator = Evaluator::new(3).unwrap();
        let psi = StateVector::zeros(3).unwrap();
        assert_eq!(
            evaluator.evaluate(&psi, &mut FirstEligible),
            Err(SeparabilityError::NoEligibleSource)
        );
    }

    #[test]
    fn test_chooser_error_propagates() {
        let evaluator = Evaluator::new(2).unwrap();
        let psi = StateVector::from_reals(2, &[0.0, 1.0, 1.0, 0.0]).unwrap();
        assert_eq!(
            evaluator.evaluate(&psi, &mut FixedSource(Ket::new(3))),
            Err(SeparabilityError::IneligibleSource { ket: Ket::new(3) })
        );
    }

    /// Ignores the eligible list and always answers with one key.
    struct Stubborn(Ket);

    impl SourceChooser for Stubborn {
        fn choose(&mut self, _state: &StateVector, _eligible: &[Ket]) -> Result<Ket> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_chooser_answer_outside_eligible_rejected() {
        let evaluator = Evaluator::new(2).unwrap();
        let psi = StateVector::from_reals(2, &[0.0, 1.0, 1.0, 0.0]).unwrap();
        assert_eq!(
            evaluator.evaluate(&psi, &mut Stubborn(Ket::new(3))),
            Err(SeparabilityError::IneligibleSource { ket: Ket::new(3) })
        );
        assert_eq!(
            evaluator.evaluate(&psi, &mut Stubborn(Ket::new(9))),
            Err(SeparabilityError::IneligibleSource { ket: Ket::new(9) })
        );
        assert!(evaluator.evaluate(&psi, &mut Stubborn(Ket::new(2))).is_ok());
    }

    #[test]
    fn test_qubit_mismatch() {
        let evaluator = Evaluator::new(2).unwrap();
        let psi = StateVector::ones(3).unwrap();
        assert!(matches!(
            evaluator.evaluate(&psi, &mut FirstEligible),
            Err(SeparabilityError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_clones_share_table() {
        let a = Evaluator::new(3).unwrap();
        let b = a.clone().with_config(EvaluatorConfig {
            equality: Equality::Tolerance { epsilon: 1e-9 },
            method: TransformMethod::Rekey,
        });
        assert!(Arc::ptr_eq(a.table(), b.table()));
        assert_eq!(b.config().method, TransformMethod::Rekey);
    }
}
