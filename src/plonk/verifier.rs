//! PLONK Verifier
//!
//! Verifies proofs produced by gnark's BN254 PLONK backend. The gate is
//!
//! ```text
//! q_L·l + q_R·r + q_M·l·r + q_O·o + q_K + Σ q_cp,i·π_i + PI = 0
//! ```
//!
//! with the permutation accumulator Z satisfying
//! `Z(ωX)·Π(w + β·S + γ) = Z(X)·Π(w + β·id + γ)`, the identity on the three
//! columns being X, uX and u²X.
//!
//! The verifier:
//! 1. Reconstructs the transcript to get γ, β, α and ζ
//! 2. Evaluates the vanishing polynomial Z_H(ζ)
//! 3. Evaluates L_1(ζ)
//! 4. Computes PI(ζ), including the hash of every BSB22 commitment
//! 5. Checks the claimed opening of the linearized polynomial and computes
//!    its commitment
//! 6. Folds the batched opening at ζ and checks it together with the
//!    opening of Z at ζω

use crate::curve::encoding::decode_public_inputs;
use crate::curve::{G1Affine, G1Projective};
use crate::domain::Domain;
use crate::error::{Result, VerifierError};
use crate::field::{Field, Fr};
use crate::hash_to_field::{hash_to_fr, BSB22_DST};
use crate::kzg::{fold_proof, TwoPointOpening};
use crate::plonk::types::*;
use crate::transcript::Transcript;

pub const GAMMA: &str = "gamma";
pub const BETA: &str = "beta";
pub const ALPHA: &str = "alpha";
pub const ZETA: &str = "zeta";

/// Bind the key's commitments and the public inputs to γ.
fn bind_public_data(transcript: &mut Transcript, vk: &VerifyingKey, public_inputs: &[Fr]) -> Result<()> {
    for (label, s) in ["S1", "S2", "S3"].iter().zip(&vk.s) {
        transcript.bind_g1(GAMMA, label, s)?;
    }
    transcript.bind_g1(GAMMA, "Ql", &vk.ql)?;
    transcript.bind_g1(GAMMA, "Qr", &vk.qr)?;
    transcript.bind_g1(GAMMA, "Qm", &vk.qm)?;
    transcript.bind_g1(GAMMA, "Qo", &vk.qo)?;
    transcript.bind_g1(GAMMA, "Qk", &vk.qk)?;
    for (i, qcp) in vk.qcp.iter().enumerate() {
        transcript.bind_g1(GAMMA, &format!("Qcp_{}", i), qcp)?;
    }
    for (i, input) in public_inputs.iter().enumerate() {
        transcript.bind_fr(GAMMA, &format!("pi_{}", i), input)?;
    }
    Ok(())
}

/// Replay the Fiat-Shamir transcript: γ, β, α and ζ.
fn run_transcript(
    vk: &VerifyingKey,
    proof: &Proof,
    public_inputs: &[Fr],
) -> Result<([Fr; 4], Transcript)> {
    let mut transcript = Transcript::new(&[GAMMA, BETA, ALPHA, ZETA]);

    bind_public_data(&mut transcript, vk, public_inputs)?;
    for (label, w) in ["L", "R", "O"].iter().zip(&proof.lro) {
        transcript.bind_g1(GAMMA, label, w)?;
    }
    let gamma = transcript.compute_challenge(GAMMA)?;

    let beta = transcript.compute_challenge(BETA)?;

    for (i, commitment) in proof.bsb22_commitments.iter().enumerate() {
        transcript.bind_g1(ALPHA, &format!("bsb22_{}", i), commitment)?;
    }
    transcript.bind_g1(ALPHA, "Z", &proof.z)?;
    let alpha = transcript.compute_challenge(ALPHA)?;

    for (label, h) in ["H0", "H1", "H2"].iter().zip(&proof.h) {
        transcript.bind_g1(ZETA, label, h)?;
    }
    let zeta = transcript.compute_challenge(ZETA)?;

    Ok(([gamma, beta, alpha, zeta], transcript))
}

/// The PLONK verifier
#[derive(Clone, Debug)]
pub struct Verifier<'a> {
    /// The verification key
    pub vk: &'a VerifyingKey,
    pub domain: Domain,
}

impl<'a> Verifier<'a> {
    /// Create a new verifier, validating the key's domain
    pub fn new(vk: &'a VerifyingKey) -> Result<Self> {
        Ok(Verifier {
            vk,
            domain: vk.domain()?,
        })
    }

    /// Verify a proof
    pub fn verify(&self, proof: &Proof, public_inputs: &[Fr]) -> Result<bool> {
        let (result, _trace) = self.verify_with_trace(proof, public_inputs)?;
        Ok(result)
    }

    /// Check that the proof has the shape the key expects.
    fn check_shape(&self, proof: &Proof, public_inputs: &[Fr]) -> Result<()> {
        let vk = self.vk;
        if public_inputs.len() != vk.nb_public_variables {
            return Err(VerifierError::PublicInputCountMismatch {
                expected: vk.nb_public_variables,
                actual: public_inputs.len(),
            });
        }
        if proof.bsb22_commitments.len() != vk.qcp.len() {
            return Err(VerifierError::CommitmentCountMismatch {
                expected: vk.qcp.len(),
                actual: proof.bsb22_commitments.len(),
            });
        }
        let expected_values = NUM_FIXED_CLAIMED_VALUES + vk.qcp.len();
        if proof.batched_proof.claimed_values.len() != expected_values {
            return Err(VerifierError::malformed(format!(
                "batched opening carries {} claimed values, expected {}",
                proof.batched_proof.claimed_values.len(),
                expected_values
            )));
        }
        Ok(())
    }

    /// Σ hash(commitment_i)·L_{nb_public + index_i}(ζ)
    fn commitment_inputs_eval(&self, proof: &Proof, zeta: &Fr) -> Result<Fr> {
        let vk = self.vk;
        let mut acc = Fr::zero();
        for (commitment, index) in proof
            .bsb22_commitments
            .iter()
            .zip(&vk.commitment_constraint_indexes)
        {
            let hashed = hash_to_fr(&commitment.to_uncompressed(), BSB22_DST)?;
            let row = vk.nb_public_variables as u64 + index;
            acc += hashed * self.domain.lagrange_eval(row, zeta)?;
        }
        Ok(acc)
    }

    /// Verify a proof, returning every intermediate value of the check
    pub fn verify_with_trace(
        &self,
        proof: &Proof,
        public_inputs: &[Fr],
    ) -> Result<(bool, VerifierTrace)> {
        self.check_shape(proof, public_inputs)?;
        let vk = self.vk;
        let u_shift = vk.coset_shift;

        // ==========================================
        // Step 1: Reconstruct the transcript
        // ==========================================
        let ([gamma, beta, alpha, zeta], transcript) = run_transcript(vk, proof, public_inputs)?;
        tracing::debug!(zeta = %zeta.to_short_hex(), "derived plonk challenges");

        let mut challenges = Challenges {
            gamma,
            beta,
            alpha,
            zeta,
            v: Fr::zero(),
            u: Fr::zero(),
        };

        // ==========================================
        // Step 2: Evaluate Z_H(ζ)
        // ==========================================
        let z_h_zeta = self.domain.vanishing_eval(&zeta);

        // ==========================================
        // Step 3: Evaluate L_1(ζ)
        // ==========================================
        let l1_zeta = self.domain.lagrange_eval(0, &zeta)?;

        // ==========================================
        // Step 4: Compute PI(ζ)
        // ==========================================
        let pi_zeta = self.domain.public_input_eval(public_inputs, &zeta)?
            + self.commitment_inputs_eval(proof, &zeta)?;

        let mut trace = VerifierTrace {
            transcript,
            transcript_challenges: challenges,
            z_h_zeta,
            l1_zeta,
            pi_zeta,
            linearization: None,
            pairing_check: None,
            is_valid: false,
        };

        if z_h_zeta.is_zero() {
            tracing::warn!("evaluation challenge lies in the domain, rejecting");
            return Ok((false, trace));
        }

        // ==========================================
        // Step 5: Linearization
        // ==========================================
        let values = &proof.batched_proof.claimed_values;
        let (opening, l, r, o, s1, s2) = (values[0], values[1], values[2], values[3], values[4], values[5]);
        let zu = proof.z_shifted_opening.claimed_value;

        let alpha_sq_l1 = alpha.square() * l1_zeta;

        // (l̄ + βs̄₁ + γ)(r̄ + βs̄₂ + γ)
        let sigma_prod = (l + beta * s1 + gamma) * (r + beta * s2 + gamma);

        // PI(ζ) - α²L₁(ζ) + α(l̄+βs̄₁+γ)(r̄+βs̄₂+γ)(ō+γ)z̄ω
        let constant = pi_zeta - alpha_sq_l1 + alpha * sigma_prod * (o + gamma) * zu;

        // S₃ coefficient: αβ(l̄+βs̄₁+γ)(r̄+βs̄₂+γ)z̄ω
        let s3_coeff = alpha * beta * sigma_prod * zu;

        // Z coefficient: α²L₁(ζ) - α(l̄+βζ+γ)(r̄+βuζ+γ)(ō+βu²ζ+γ)
        let id_prod = (l + beta * zeta + gamma)
            * (r + beta * u_shift * zeta + gamma)
            * (o + beta * u_shift.square() * zeta + gamma);
        let z_coeff = alpha_sq_l1 - alpha * id_prod;

        // -Z_H(ζ), -ζⁿ⁺²Z_H(ζ), -ζ²⁽ⁿ⁺²⁾Z_H(ζ)
        let zeta_n_plus_two = zeta.pow_u64(vk.size + 2);
        let h_coeffs = [
            -z_h_zeta,
            -(zeta_n_plus_two * z_h_zeta),
            -(zeta_n_plus_two.square() * z_h_zeta),
        ];

        let mut points: Vec<G1Affine> = proof.bsb22_commitments.clone();
        let mut scalars: Vec<Fr> = proof.qcp_evaluations().to_vec();
        points.extend([vk.ql, vk.qr, vk.qm, vk.qo, vk.qk, vk.s[2], proof.z]);
        scalars.extend([l, r, l * r, o, Fr::one(), s3_coeff, z_coeff]);
        points.extend(proof.h);
        scalars.extend(h_coeffs);
        let digest = G1Projective::msm(&points, &scalars).to_affine();

        trace.linearization = Some(LinearizationTrace {
            constant,
            opening,
            digest,
        });

        if opening != -constant {
            tracing::warn!("linearized polynomial opening does not match the gate and permutation identities");
            return Ok((false, trace));
        }

        // ==========================================
        // Step 6: Batched opening check
        // ==========================================
        let mut digests = vec![digest, proof.lro[0], proof.lro[1], proof.lro[2], vk.s[0], vk.s[1]];
        digests.extend_from_slice(&vk.qcp);
        let zu_bytes = zu.to_bytes_be();
        let folded = fold_proof(&digests, &proof.batched_proof, &zeta, &[zu_bytes.as_slice()])?;

        let opening_digests = [folded.digest, proof.z];
        let opening_proofs = [folded.proof, proof.z_shifted_opening];
        let opening_points = [zeta, zeta * vk.generator];
        let u = TwoPointOpening::derive_u(&opening_digests, &opening_proofs, &opening_points)?;

        challenges.v = folded.gamma;
        challenges.u = u;
        trace.transcript_challenges = challenges;

        let two_point = TwoPointOpening {
            digests: opening_digests,
            proofs: opening_proofs,
            points: opening_points,
            u,
        };
        let (pairing_result, inputs) = two_point.verify(&vk.kzg)?;
        if !pairing_result {
            tracing::warn!("plonk pairing check failed");
        }

        trace.pairing_check = Some(PairingCheckTrace {
            folded_digest: folded.digest,
            folded_value: folded.proof.claimed_value,
            left_pairing_input: PairingInput {
                g1: inputs.left,
                g2_description: "[τ]₂".to_string(),
            },
            right_pairing_input: PairingInput {
                g1: inputs.right,
                g2_description: "[1]₂".to_string(),
            },
            pairing_result,
        });
        trace.is_valid = pairing_result;

        Ok((pairing_result, trace))
    }
}

/// Decode key, proof and public inputs, then verify with a trace.
///
/// The key is decoded first so that an invalid domain is reported before
/// the proof is looked at.
pub fn verify_bytes_with_trace(
    proof_bytes: &[u8],
    vk_bytes: &[u8],
    public_input_bytes: &[u8],
) -> Result<(bool, VerifierTrace)> {
    let vk = VerifyingKey::from_bytes(vk_bytes)?;
    let proof = Proof::from_bytes(proof_bytes)?;
    let inputs = decode_public_inputs(public_input_bytes)?;
    tracing::debug!(
        inputs = inputs.len(),
        commitments = proof.bsb22_commitments.len(),
        "decoded plonk proof"
    );

    Verifier::new(&vk)?.verify_with_trace(&proof, &inputs)
}

/// Decode and verify a PLONK proof, key and public-input vector.
#[tracing::instrument(skip_all, fields(proof_len = proof_bytes.len(), vk_len = vk_bytes.len()))]
pub fn verify(proof_bytes: &[u8], vk_bytes: &[u8], public_input_bytes: &[u8]) -> Result<bool> {
    let (result, _trace) = verify_bytes_with_trace(proof_bytes, vk_bytes, public_input_bytes)?;
    Ok(result)
}
