//! Random states.
//!
//! Real and imaginary parts are drawn from a standard normal distribution
//! and the vector is scaled to unit norm, which makes the state uniform on
//! the unit sphere of `C^(2^n)`.

use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use separability::{Result, StateVector};

/// Seeded generator, or one seeded from the OS when `seed` is `None`.
#[must_use]
pub fn rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

/// Draws a unit-norm random state.
///
/// # Errors
///
/// Returns [`separability::SeparabilityError::InvalidQubitCount`] for an
/// unsupported `qubits`.
///
/// # Example
///
/// ```
/// use rand::SeedableRng;
/// use separability_clients::sampler::random_state;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(42);
/// let psi = random_state(3, &mut rng).unwrap();
/// assert!((psi.norm_sqr() - 1.0).abs() < 1e-12);
/// ```
pub fn random_state<R: Rng + ?Sized>(qubits: u32, rng: &mut R) -> Result<StateVector> {
    let dim = StateVector::zeros(qubits)?.dimension();
    let mut amplitudes: Vec<Complex64> = (0..dim)
        .map(|_| Complex64::new(rng.sample(StandardNormal), rng.sample(StandardNormal)))
        .collect();

    let norm = amplitudes.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
    if norm > 0.0 {
        for a in &mut amplitudes {
            *a /= norm;
        }
    }
    tracing::debug!(qubits, dim, "sampled random state");
    StateVector::from_amplitudes(qubits, amplitudes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_norm() {
        let mut r = rng(Some(7));
        for n in 1..=6 {
            let psi = random_state(n, &mut r).unwrap();
            assert_eq!(psi.qubits(), n);
            assert!((psi.norm_sqr() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_seed_reproducible() {
        let a = random_state(4, &mut rng(Some(11))).unwrap();
        let b = random_state(4, &mut rng(Some(11))).unwrap();
        let c = random_state(4, &mut rng(Some(12))).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_reference_nonzero() {
        let psi = random_state(5, &mut rng(Some(3))).unwrap();
        assert_ne!(psi.reference(), Complex64::new(0.0, 0.0));
    }

    #[test]
    fn test_invalid_qubits() {
        assert!(random_state(0, &mut rng(Some(1))).is_err());
    }
}
