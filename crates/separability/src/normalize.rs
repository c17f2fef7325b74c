//! Reference normalization.
//!
//! The consistency criterion assumes the reference amplitude is exactly 1.
//! [`normalize`] divides every amplitude by the reference amplitude and pins
//! the reference entry to `1 + 0i`.

use crate::error::{Result, SeparabilityError};
use crate::state::{StateVector, ONE, ZERO};

/// Rescales `state` so the reference amplitude is exactly 1.
///
/// Returns an unchanged copy when the reference amplitude is already 1, so
/// normalizing twice is the same as normalizing once.
///
/// # Errors
///
/// Returns [`SeparabilityError::ZeroReference`] when the reference amplitude
/// is zero; a basis change must run first.
///
/// # Example
///
/// ```
/// use num_complex::Complex64;
/// use separability::{normalize, Ket, StateVector};
///
/// let psi = StateVector::from_reals(1, &[4.0, 3.0]).unwrap();
/// let phi = normalize(&psi).unwrap();
/// assert_eq!(phi[Ket::REFERENCE], Complex64::new(1.0, 0.0));
/// assert_eq!(phi[Ket::new(1)], Complex64::new(0.75, 0.0));
/// ```
pub fn normalize(state: &StateVector) -> Result<StateVector> {
    let reference = state.reference();
    if reference == ZERO {
        return Err(SeparabilityError::ZeroReference);
    }
    if reference == ONE {
        return Ok(state.clone());
    }
    let mut amplitudes: Vec<_> = state.amplitudes().iter().map(|a| a / reference).collect();
    amplitudes[0] = ONE;
    tracing::debug!(%reference, "normalized reference amplitude");
    Ok(state.with_amplitudes(amplitudes))
}

impl StateVector {
    /// Method form of [`normalize`].
    ///
    /// # Errors
    ///
    /// Same as [`normalize`].
    pub fn normalized(&self) -> Result<StateVector> {
        normalize(self)
    }
}
