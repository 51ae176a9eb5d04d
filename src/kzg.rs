//! KZG Opening Verification
//!
//! Only the verifier side of the Kate-Zaverucha-Goldberg commitment scheme,
//! following gnark-crypto's `kzg` package: several polynomials opened at one
//! point are folded into a single opening with a Fiat-Shamir challenge, and
//! openings at different points are checked together with one two-pair
//! multi-pairing.

use serde::{Deserialize, Serialize};

use crate::curve::{G1Affine, G1Projective, G2Affine};
use crate::error::{Result, VerifierError};
use crate::field::{Field, Fr};
use crate::pairing::pairing_check;
use crate::transcript::Transcript;

/// The setup elements a verifier needs: [1]₁, [1]₂ and [τ]₂.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KzgVerifyingKey {
    pub g1: G1Affine,
    pub g2: [G2Affine; 2],
}

/// A quotient commitment H for one polynomial opened at one point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningProof {
    pub h: G1Affine,
    pub claimed_value: Fr,
}

/// Several polynomials opened at the same point with one quotient commitment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOpeningProof {
    pub h: G1Affine,
    pub claimed_values: Vec<Fr>,
}

/// A batch opening folded into a single one.
#[derive(Clone, Copy, Debug)]
pub struct FoldedOpening {
    pub digest: G1Affine,
    pub proof: OpeningProof,
    /// The folding challenge γ
    pub gamma: Fr,
}

/// The folding challenge: SHA-256 over the point, the digests, the claimed
/// values and any extra transcript data.
pub fn derive_folding_challenge(
    digests: &[G1Affine],
    claimed_values: &[Fr],
    point: &Fr,
    data: &[&[u8]],
) -> Result<Fr> {
    let mut transcript = Transcript::new(&["gamma"]);
    transcript.bind_fr("gamma", "point", point)?;
    for digest in digests {
        transcript.bind_g1("gamma", "digest", digest)?;
    }
    for value in claimed_values {
        transcript.bind_fr("gamma", "claimed_value", value)?;
    }
    for extra in data {
        transcript.bind("gamma", "data", extra)?;
    }
    transcript.compute_challenge("gamma")
}

/// Fold `digests[i]` opened to `claimed_values[i]` with powers of γ into
/// `Σ γⁱ·digests[i]` opened to `Σ γⁱ·claimed_values[i]`.
pub fn fold_proof(
    digests: &[G1Affine],
    batch: &BatchOpeningProof,
    point: &Fr,
    data: &[&[u8]],
) -> Result<FoldedOpening> {
    if digests.len() != batch.claimed_values.len() {
        return Err(VerifierError::malformed(format!(
            "{} digests opened with {} claimed values",
            digests.len(),
            batch.claimed_values.len()
        )));
    }
    let gamma = derive_folding_challenge(digests, &batch.claimed_values, point, data)?;

    let mut powers = Vec::with_capacity(digests.len());
    let mut acc = Fr::one();
    for _ in 0..digests.len() {
        powers.push(acc);
        acc *= gamma;
    }

    let digest = G1Projective::msm(digests, &powers);
    let claimed_value = batch
        .claimed_values
        .iter()
        .zip(&powers)
        .fold(Fr::zero(), |sum, (v, g)| sum + *v * *g);

    Ok(FoldedOpening {
        digest: digest.to_affine(),
        proof: OpeningProof {
            h: batch.h,
            claimed_value,
        },
        gamma,
    })
}

/// Two openings at different points, combined with a scalar u:
///
/// ```text
/// e(D₀ + u·D₁ - (v₀ + u·v₁)[1]₁ + p₀·H₀ + u·p₁·H₁, [1]₂) · e(-(H₀ + u·H₁), [τ]₂) = 1
/// ```
#[derive(Clone, Copy, Debug)]
pub struct TwoPointOpening {
    pub digests: [G1Affine; 2],
    pub proofs: [OpeningProof; 2],
    pub points: [Fr; 2],
    pub u: Fr,
}

/// The G1 sides of the final pairing check.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct OpeningPairingInputs {
    /// H₀ + u·H₁, paired with [τ]₂
    pub left: G1Affine,
    /// D₀ + u·D₁ - (v₀ + u·v₁)[1]₁ + p₀·H₀ + u·p₁·H₁, paired with [1]₂
    pub right: G1Affine,
}

impl TwoPointOpening {
    /// The combining scalar, bound to both openings.
    pub fn derive_u(digests: &[G1Affine; 2], proofs: &[OpeningProof; 2], points: &[Fr; 2]) -> Result<Fr> {
        let mut transcript = Transcript::new(&["u"]);
        for i in 0..2 {
            transcript.bind_g1("u", "digest", &digests[i])?;
            transcript.bind_g1("u", "quotient", &proofs[i].h)?;
            transcript.bind_fr("u", "point", &points[i])?;
            transcript.bind_fr("u", "claimed_value", &proofs[i].claimed_value)?;
        }
        transcript.compute_challenge("u")
    }

    pub fn pairing_inputs(&self, vk: &KzgVerifyingKey) -> OpeningPairingInputs {
        let h0 = self.proofs[0].h.to_projective();
        let h1 = self.proofs[1].h.to_projective();

        let left = h0 + h1 * self.u;

        let value = self.proofs[0].claimed_value + self.u * self.proofs[1].claimed_value;
        let right = self.digests[0].to_projective() + self.digests[1].to_projective() * self.u
            - vk.g1.to_projective() * value
            + h0 * self.points[0]
            + h1 * (self.u * self.points[1]);

        OpeningPairingInputs {
            left: left.to_affine(),
            right: right.to_affine(),
        }
    }

    /// One two-pair multi-pairing.
    pub fn verify(&self, vk: &KzgVerifyingKey) -> Result<(bool, OpeningPairingInputs)> {
        let inputs = self.pairing_inputs(vk);
        let ok = pairing_check(&[(inputs.right, vk.g2[0]), (-inputs.left, vk.g2[1])])?;
        Ok((ok, inputs))
    }
}
