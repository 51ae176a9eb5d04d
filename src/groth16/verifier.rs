//! Groth16 Verifier
//!
//! A proof (A, B, C) for public inputs x₁..xₗ is accepted when
//!
//! ```text
//! e(A, B) = e(α, β) · e(vk_x, γ) · e(C, δ),   vk_x = IC₀ + Σ xᵢ·ICᵢ
//! ```
//!
//! which is checked as a single four-pair multi-pairing against the
//! identity.

use crate::curve::G1Projective;
use crate::error::{Result, VerifierError};
use crate::field::Fr;
use crate::groth16::types::{Proof, VerifyingKey};
use crate::pairing::{
    final_exponentiation, multi_miller_loop, pairing, pairing_check, G2Prepared, Gt,
};

fn check_commitments(vk: &VerifyingKey) -> Result<()> {
    match vk.num_commitments() {
        0 => Ok(()),
        n => Err(VerifierError::UnsupportedCommitment(n)),
    }
}

/// vk_x = IC₀ + Σ xᵢ·ICᵢ₊₁
pub fn compute_vk_x(vk: &VerifyingKey, public_inputs: &[Fr]) -> Result<G1Projective> {
    if public_inputs.len() + 1 != vk.ic.len() {
        return Err(VerifierError::PublicInputCountMismatch {
            expected: vk.num_public_inputs(),
            actual: public_inputs.len(),
        });
    }
    Ok(vk.ic[0].to_projective() + G1Projective::msm(&vk.ic[1..], public_inputs))
}

/// Verify a decoded proof. A failed pairing check is `Ok(false)`.
pub fn verify_proof(vk: &VerifyingKey, proof: &Proof, public_inputs: &[Fr]) -> Result<bool> {
    check_commitments(vk)?;
    let vk_x = compute_vk_x(vk, public_inputs)?.to_affine();

    let ok = pairing_check(&[
        (-proof.a, proof.b),
        (vk.alpha_g1, vk.beta_g2),
        (vk_x, vk.gamma_g2),
        (proof.c, vk.delta_g2),
    ])?;

    if !ok {
        tracing::warn!("groth16 pairing check failed");
    }
    Ok(ok)
}

/// A verifying key with e(α, β) computed and the line functions of γ and δ
/// precomputed, for verifying many proofs against one circuit.
#[derive(Clone, Debug)]
pub struct PreparedVerifyingKey {
    pub vk: VerifyingKey,
    pub alpha_beta: Gt,
    gamma_g2: G2Prepared,
    delta_g2: G2Prepared,
}

impl PreparedVerifyingKey {
    pub fn new(vk: VerifyingKey) -> Result<Self> {
        check_commitments(&vk)?;
        let alpha_beta = pairing(&vk.alpha_g1, &vk.beta_g2)?;
        Ok(PreparedVerifyingKey {
            gamma_g2: G2Prepared::from(vk.gamma_g2),
            delta_g2: G2Prepared::from(vk.delta_g2),
            alpha_beta,
            vk,
        })
    }

    /// e(A, B) = e(α, β)·e(vk_x, γ)·e(C, δ) with three Miller loops.
    pub fn verify(&self, proof: &Proof, public_inputs: &[Fr]) -> Result<bool> {
        let vk_x = compute_vk_x(&self.vk, public_inputs)?.to_affine();
        let b = G2Prepared::from(proof.b);

        let f = multi_miller_loop(&[
            (-proof.a, &b),
            (vk_x, &self.gamma_g2),
            (proof.c, &self.delta_g2),
        ]);
        let ok = (final_exponentiation(&f)? * self.alpha_beta).is_identity();

        if !ok {
            tracing::warn!("groth16 pairing check failed");
        }
        Ok(ok)
    }
}

/// Decode and verify a gnark-encoded proof, key and public-input vector.
#[tracing::instrument(skip_all, fields(proof_len = proof_bytes.len(), vk_len = vk_bytes.len()))]
pub fn verify(proof_bytes: &[u8], vk_bytes: &[u8], public_input_bytes: &[u8]) -> Result<bool> {
    let proof = Proof::from_bytes(proof_bytes)?;
    let vk = VerifyingKey::from_bytes(vk_bytes)?;
    let inputs = crate::curve::encoding::decode_public_inputs(public_input_bytes)?;
    tracing::debug!(inputs = inputs.len(), "decoded groth16 proof");

    verify_proof(&vk, &proof, &inputs)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::curve::encoding::encode_public_inputs;
    use crate::curve::{G1Affine, G2Affine};
    use crate::field::Field;
    use crate::groth16::types::CommitmentKey;
    use crate::testing::{g1_mul, g2_mul, random_fr, test_rng};

    /// Key, proof and public input for the circuit `x = w·w` with
    /// one constraint, built from known toxic waste.
    ///
    /// With u_w = v_w = 1 and w_x = 1 the quotient is zero, so
    /// A = α + w + rδ, B = β + w + sδ and
    /// C = w(α + β)/δ + s·A + r·B - rsδ.
    pub(crate) fn square_circuit(w: Fr) -> (VerifyingKey, Proof, Vec<Fr>) {
        let mut rng = test_rng();
        let alpha = random_fr(&mut rng);
        let beta = random_fr(&mut rng);
        let gamma = random_fr(&mut rng);
        let delta = random_fr(&mut rng);
        let r = random_fr(&mut rng);
        let s = random_fr(&mut rng);

        let gamma_inv = gamma.inverse().unwrap();
        let delta_inv = delta.inverse().unwrap();

        let vk = VerifyingKey {
            alpha_g1: g1_mul(alpha),
            beta_g1: g1_mul(beta),
            beta_g2: g2_mul(beta),
            gamma_g2: g2_mul(gamma),
            delta_g1: g1_mul(delta),
            delta_g2: g2_mul(delta),
            ic: vec![G1Affine::identity(), g1_mul(gamma_inv)],
            public_and_commitment_committed: Vec::new(),
            commitment_key: None,
        };

        let a = alpha + w + r * delta;
        let b = beta + w + s * delta;
        let c = w * (alpha + beta) * delta_inv + s * a + r * b - r * s * delta;
        let proof = Proof {
            a: g1_mul(a),
            b: g2_mul(b),
            c: g1_mul(c),
        };

        (vk, proof, vec![w * w])
    }

    #[test]
    fn test_verify_square_circuit() {
        let (vk, proof, inputs) = square_circuit(Fr::from_u64(3));
        assert_eq!(inputs[0], Fr::from_u64(9));
        assert!(verify_proof(&vk, &proof, &inputs).unwrap());

        let wrong = [Fr::from_u64(10)];
        assert!(!verify_proof(&vk, &proof, &wrong).unwrap());
    }

    #[test]
    fn test_verify_bytes() {
        let (vk, proof, inputs) = square_circuit(Fr::from_u64(5));
        let proof_bytes = proof.to_bytes();
        let vk_bytes = vk.to_bytes();
        let input_bytes = encode_public_inputs(&inputs);

        assert_eq!(verify(&proof_bytes, &vk_bytes, &input_bytes), Ok(true));

        // last byte of the input: 25 becomes 24
        let mut flipped = input_bytes.clone();
        flipped[31] ^= 1;
        assert_eq!(verify(&proof_bytes, &vk_bytes, &flipped), Ok(false));

        for i in [0, 1, 16, 30] {
            let mut flipped = input_bytes.clone();
            flipped[i] ^= 0x80;
            assert_ne!(verify(&proof_bytes, &vk_bytes, &flipped), Ok(true));
        }
    }

    #[test]
    fn test_proof_byte_flips_rejected() {
        let (vk, proof, inputs) = square_circuit(Fr::from_u64(7));
        let proof_bytes = proof.to_bytes();
        let vk_bytes = vk.to_bytes();
        let input_bytes = encode_public_inputs(&inputs);

        for i in 0..proof_bytes.len() {
            let mut flipped = proof_bytes;
            flipped[i] ^= 0x01;
            assert_ne!(
                verify(&flipped, &vk_bytes, &input_bytes),
                Ok(true),
                "flipped byte {}",
                i
            );
        }
    }

    #[test]
    fn test_swapped_proof_elements() {
        let (vk, proof, inputs) = square_circuit(Fr::from_u64(4));
        let swapped = Proof {
            a: proof.c,
            c: proof.a,
            ..proof
        };
        assert!(!verify_proof(&vk, &swapped, &inputs).unwrap());
    }

    #[test]
    fn test_input_count_mismatch() {
        let (vk, proof, _) = square_circuit(Fr::from_u64(2));
        assert_eq!(
            verify_proof(&vk, &proof, &[Fr::from_u64(4), Fr::one()]),
            Err(VerifierError::PublicInputCountMismatch {
                expected: 1,
                actual: 2
            })
        );
        assert_eq!(
            verify_proof(&vk, &proof, &[]),
            Err(VerifierError::PublicInputCountMismatch {
                expected: 1,
                actual: 0
            })
        );
    }

    #[test]
    fn test_malformed_inputs() {
        let (vk, proof, inputs) = square_circuit(Fr::from_u64(2));
        let proof_bytes = proof.to_bytes();
        let vk_bytes = vk.to_bytes();
        let input_bytes = encode_public_inputs(&inputs);

        assert!(matches!(
            verify(&proof_bytes[..200], &vk_bytes, &input_bytes),
            Err(VerifierError::MalformedEncoding(_))
        ));
        assert!(matches!(
            verify(&proof_bytes, &vk_bytes, &input_bytes[..31]),
            Err(VerifierError::MalformedEncoding(_))
        ));
        assert!(matches!(
            verify(&proof_bytes, &vk_bytes, &[0xff; 32]),
            Err(VerifierError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn test_declared_commitments_unsupported() {
        let (mut vk, proof, inputs) = square_circuit(Fr::from_u64(3));
        vk.commitment_key = Some(CommitmentKey {
            g: G2Affine::generator(),
            g_root_sigma_neg: -G2Affine::generator(),
        });
        assert!(verify_proof(&vk, &proof, &inputs).unwrap());

        vk.public_and_commitment_committed = vec![vec![1]];
        assert_eq!(
            verify_proof(&vk, &proof, &inputs),
            Err(VerifierError::UnsupportedCommitment(1))
        );
        assert!(matches!(
            PreparedVerifyingKey::new(vk),
            Err(VerifierError::UnsupportedCommitment(1))
        ));
    }

    #[test]
    fn test_prepared_matches_plain() {
        let (vk, proof, inputs) = square_circuit(Fr::from_u64(11));
        let pvk = PreparedVerifyingKey::new(vk.clone()).unwrap();

        assert!(pvk.verify(&proof, &inputs).unwrap());

        let wrong = [inputs[0] + Fr::one()];
        assert_eq!(
            pvk.verify(&proof, &wrong).unwrap(),
            verify_proof(&vk, &proof, &wrong).unwrap()
        );
    }
}
