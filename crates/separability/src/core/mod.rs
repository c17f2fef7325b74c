//! Core key-space types.
//!
//! - [`ket::Ket`]: n-bit key (integer canonical form, bit-string I/O form)
//! - [`space::IndexSpace`]: basis / composite classification and decomposition
//! - [`constants`]: qubit limits and derived counts

pub mod constants;
pub mod ket;
pub mod space;
