//! PLONK Verification
//!
//! Verifier side of "PLONK: Permutations over Lagrange-bases for
//! Oecumenical Noninteractive arguments of Knowledge" by Gabizon,
//! Williamson, and Ciobotaru, as instantiated by gnark over BN254: the
//! three-wire gate `q_L·l + q_R·r + q_M·l·r + q_O·o + q_K + PI = 0`
//! extended with BSB22 commitment selectors, a KZG commitment scheme and
//! a SHA-256 Fiat-Shamir transcript.

pub mod types;
pub mod verifier;

#[cfg(test)]
pub(crate) mod fixture;

pub use types::*;
pub use verifier::*;
