//! Size limits of the key space.
//!
//! A dense state over n qubits holds `2^n` amplitudes. Everything else
//! (basis count, composite count) is derived from n.

/// Largest supported qubit count.
///
/// At 24 qubits a dense state holds 16 777 216 `Complex64` values (256 MiB).
pub const MAX_QUBITS: u32 = 24;

/// Number of keys in an n-qubit space (`2^n`).
///
/// Callers validate `qubits` with [`is_valid_qubit_count`] first; the
/// result is meaningless for widths outside `1..=MAX_QUBITS`.
///
/// # Panics
///
/// Overflows (a panic in debug builds) when `qubits >= usize::BITS`.
///
/// # Example
///
/// ```
/// use separability::constants::dimension;
///
/// assert_eq!(dimension(4), 16);
/// ```
#[inline]
#[must_use]
pub const fn dimension(qubits: u32) -> usize {
    1usize << qubits
}

/// Number of composite keys in an n-qubit space (`2^n - n - 1`).
///
/// Same precondition as [`dimension`].
///
/// # Panics
///
/// Overflows when `qubits >= usize::BITS`.
///
/// # Example
///
/// ```
/// use separability::constants::composite_count;
///
/// assert_eq!(composite_count(1), 0);
/// assert_eq!(composite_count(4), 11);
/// ```
#[inline]
#[must_use]
pub const fn composite_count(qubits: u32) -> usize {
    dimension(qubits) - qubits as usize - 1
}

/// Returns true if `qubits` is inside `1..=MAX_QUBITS`.
#[inline]
#[must_use]
pub const fn is_valid_qubit_count(qubits: u32) -> bool {
    qubits >= 1 && qubits <= MAX_QUBITS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_powers() {
        for n in 1..=MAX_QUBITS {
            assert_eq!(dimension(n), 2usize.pow(n));
        }
    }

    #[test]
    fn test_composite_count_small() {
        assert_eq!(composite_count(1), 0);
        assert_eq!(composite_count(2), 1);
        assert_eq!(composite_count(3), 4);
    }

    #[test]
    fn test_valid_qubit_count_bounds() {
        assert!(!is_valid_qubit_count(0));
        assert!(is_valid_qubit_count(1));
        assert!(is_valid_qubit_count(MAX_QUBITS));
        assert!(!is_valid_qubit_count(MAX_QUBITS + 1));
    }
}
