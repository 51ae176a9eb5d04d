//! BN254 SNARK Verifier
//!
//! Verification of Groth16 and PLONK proofs over the BN254 (alt_bn128)
//! pairing-friendly curve, on top of a self-contained implementation of the
//! field tower, the curve groups and the optimal ate pairing.
//!
//! # Modules
//! - `field`: Fq, Fr and the Fq2 / Fq6 / Fq12 extension tower
//! - `constants`: curve parameters and derived pairing constants
//! - `curve`: G1 and G2 group operations and gnark-compatible encodings
//! - `pairing`: Miller loop, final exponentiation and multi-pairing
//! - `domain`: multiplicative subgroups of Fr and their Lagrange bases
//! - `transcript`: gnark's SHA-256 Fiat-Shamir transcript
//! - `hash_to_field`: RFC 9380 `expand_message_xmd` hashing into Fr
//! - `kzg`: KZG opening checks
//! - `groth16`: Groth16 verifier
//! - `plonk`: PLONK verifier
//! - `error`: the error type shared by every verifier
//!
//! Both verifiers return `Ok(false)` for a proof that decodes but does not
//! verify, and an error for input that cannot be decoded.

pub mod constants;
pub mod curve;
pub mod domain;
pub mod error;
pub mod field;
pub mod groth16;
pub mod hash_to_field;
pub mod kzg;
pub mod pairing;
pub mod plonk;
pub mod transcript;

#[cfg(test)]
mod testing;

/// Re-export commonly used types
pub use curve::{G1Affine, G1Projective, G2Affine, G2Projective};
pub use error::{Result, VerifierError};
pub use field::{Fq, Fr};
pub use groth16::verify as verify_groth16;
pub use pairing::{pairing, pairing_check, Gt};
pub use plonk::verify as verify_plonk;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::encoding::encode_public_inputs;

    #[test]
    fn test_entry_points() {
        let (vk, proof, inputs) = groth16::verifier::tests::square_circuit(Fr::from_u64(6));
        assert_eq!(
            verify_groth16(&proof.to_bytes(), &vk.to_bytes(), &encode_public_inputs(&inputs)),
            Ok(true)
        );

        let fixture = plonk::fixture::cubic_circuit(3, true);
        assert_eq!(
            verify_plonk(
                &fixture.proof.to_bytes(),
                &fixture.vk.to_bytes(),
                &encode_public_inputs(&fixture.inputs)
            ),
            Ok(true)
        );
    }

    #[test]
    fn test_protocols_do_not_accept_each_other() {
        let (vk, proof, inputs) = groth16::verifier::tests::square_circuit(Fr::from_u64(6));
        assert!(
            verify_plonk(&proof.to_bytes(), &vk.to_bytes(), &encode_public_inputs(&inputs)).is_err()
        );

        let fixture = plonk::fixture::cubic_circuit(3, false);
        assert!(verify_groth16(
            &fixture.proof.to_bytes(),
            &fixture.vk.to_bytes(),
            &encode_public_inputs(&fixture.inputs)
        )
        .is_err());
    }
}
