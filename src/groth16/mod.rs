//! Groth16 Verification
//!
//! Verifies proofs of the Groth16 zk-SNARK ("On the Size of Pairing-based
//! Non-interactive Arguments", Groth 2016) produced by gnark over BN254.

pub mod types;
pub mod verifier;

pub use types::*;
pub use verifier::*;
