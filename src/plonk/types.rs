//! PLONK Type Definitions
//!
//! The verification key, the proof and the verifier trace. Byte layouts are
//! those of gnark's BN254 PLONK `WriteTo` / `WriteRawTo`: fields in
//! declaration order, integers big-endian, slices prefixed with a u32
//! length, and each point compressed or raw as its flag bits say.

use serde::{Deserialize, Serialize};

use crate::curve::encoding::Reader;
use crate::curve::G1Affine;
use crate::domain::Domain;
use crate::error::{Result, VerifierError};
use crate::field::{Field, Fr};
use crate::kzg::{BatchOpeningProof, KzgVerifyingKey, OpeningProof};
use crate::transcript::Transcript;

/// Precomputed Miller-loop lines for [1]₂ and [τ]₂ that gnark 0.11 and
/// later append to the KZG key: 2 points × 2 lines × 66 steps × 2 Fq2.
pub const KZG_LINES_SIZE: usize = 2 * 2 * 66 * 2 * 64;

/// Evaluations in the batched opening at ζ before the commitment ones:
/// the linearized polynomial, l, r, o, S₁ and S₂.
pub const NUM_FIXED_CLAIMED_VALUES: usize = 6;

/// Verification key - contains all preprocessed commitments for verifier
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyingKey {
    /// Domain size (power of 2)
    pub size: u64,
    /// 1/n
    pub size_inv: Fr,
    /// Domain generator ω
    pub generator: Fr,
    /// Public inputs, placed at rows 0..nb_public_variables
    pub nb_public_variables: usize,

    /// u: the second and third wire columns are indexed by uH and u²H
    pub coset_shift: Fr,

    /// Commitments to the permutation polynomials S₁, S₂, S₃
    pub s: [G1Affine; 3],

    /// Commitments to selector polynomials
    pub ql: G1Affine,
    pub qr: G1Affine,
    pub qm: G1Affine,
    pub qo: G1Affine,
    pub qk: G1Affine,
    /// One selector per BSB22 commitment
    pub qcp: Vec<G1Affine>,

    pub kzg: KzgVerifyingKey,

    /// Row of each commitment's hash, counted after the public inputs
    pub commitment_constraint_indexes: Vec<u64>,
}

/// Length in bytes of the commitment-index slice for a declared count.
fn index_slice_len(count: u32) -> Option<usize> {
    (count as usize).checked_mul(8)?.checked_add(4)
}

impl VerifyingKey {
    /// The evaluation domain declared by the key.
    pub fn domain(&self) -> Result<Domain> {
        Domain::new(self.size, self.generator)
    }

    /// Decode a key. The domain is validated before any point is decoded.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);

        let size = reader.read_u64("size")?;
        let size_inv = reader.read_fr("size_inv")?;
        let generator = reader.read_fr("generator")?;
        let domain = Domain::new(size, generator)?;
        if size_inv * domain.size_as_fr != Fr::one() {
            return Err(VerifierError::malformed("size_inv is not the inverse of size"));
        }

        let nb_public_variables = reader.read_u64("public variable count")?;
        if nb_public_variables > size {
            return Err(VerifierError::malformed(format!(
                "{} public inputs do not fit in a domain of size {}",
                nb_public_variables, size
            )));
        }
        let nb_public_variables = usize::try_from(nb_public_variables)
            .map_err(|_| VerifierError::malformed("public input count overflows usize"))?;

        // H, uH and u²H must be disjoint
        let coset_shift = reader.read_fr("coset_shift")?;
        let shift_n = coset_shift.pow_u64(size);
        if shift_n.is_one() || shift_n.square().is_one() {
            return Err(VerifierError::malformed("coset shift does not separate the wire cosets"));
        }

        let s = [
            reader.read_g1("S1")?,
            reader.read_g1("S2")?,
            reader.read_g1("S3")?,
        ];
        let ql = reader.read_g1("Ql")?;
        let qr = reader.read_g1("Qr")?;
        let qm = reader.read_g1("Qm")?;
        let qo = reader.read_g1("Qo")?;
        let qk = reader.read_g1("Qk")?;

        let num_qcp = reader.read_u32("Qcp count")?;
        let qcp = (0..num_qcp)
            .map(|_| reader.read_g1("Qcp"))
            .collect::<Result<Vec<_>>>()?;

        let kzg = KzgVerifyingKey {
            g1: reader.read_g1("kzg G1")?,
            g2: [reader.read_g2("kzg G2[0]")?, reader.read_g2("kzg G2[1]")?],
        };
        skip_kzg_lines(&mut reader)?;

        let num_indexes = reader.read_u32("commitment index count")?;
        let commitment_constraint_indexes = (0..num_indexes)
            .map(|_| reader.read_u64("commitment index"))
            .collect::<Result<Vec<_>>>()?;
        reader.finish("verifying key")?;

        if commitment_constraint_indexes.len() != qcp.len() {
            return Err(VerifierError::malformed(format!(
                "{} commitment selectors but {} commitment indexes",
                qcp.len(),
                commitment_constraint_indexes.len()
            )));
        }
        for index in &commitment_constraint_indexes {
            let row = index.checked_add(nb_public_variables as u64);
            if row.map_or(true, |row| row >= size) {
                return Err(VerifierError::malformed(format!(
                    "commitment index {} is outside the domain",
                    index
                )));
            }
        }

        tracing::debug!(
            size,
            public_inputs = nb_public_variables,
            commitments = qcp.len(),
            "decoded plonk verifying key"
        );
        Ok(VerifyingKey {
            size,
            size_inv,
            generator,
            nb_public_variables,
            coset_shift,
            s,
            ql,
            qr,
            qm,
            qo,
            qk,
            qcp,
            kzg,
            commitment_constraint_indexes,
        })
    }

    fn encode(&self, raw: bool) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.size.to_be_bytes());
        out.extend_from_slice(&self.size_inv.to_bytes_be());
        out.extend_from_slice(&self.generator.to_bytes_be());
        out.extend_from_slice(&(self.nb_public_variables as u64).to_be_bytes());
        out.extend_from_slice(&self.coset_shift.to_bytes_be());
        for point in self.s.iter().chain([&self.ql, &self.qr, &self.qm, &self.qo, &self.qk]) {
            write_g1(&mut out, point, raw);
        }
        out.extend_from_slice(&(self.qcp.len() as u32).to_be_bytes());
        for point in &self.qcp {
            write_g1(&mut out, point, raw);
        }
        write_g1(&mut out, &self.kzg.g1, raw);
        for point in &self.kzg.g2 {
            if raw {
                out.extend_from_slice(&point.to_uncompressed());
            } else {
                out.extend_from_slice(&point.to_compressed());
            }
        }
        out.extend_from_slice(&(self.commitment_constraint_indexes.len() as u32).to_be_bytes());
        for index in &self.commitment_constraint_indexes {
            out.extend_from_slice(&index.to_be_bytes());
        }
        out
    }

    /// gnark's `WriteTo` layout, without the precomputed KZG lines.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode(false)
    }

    /// gnark's `WriteRawTo` layout, without the precomputed KZG lines.
    pub fn to_raw_bytes(&self) -> Vec<u8> {
        self.encode(true)
    }
}

/// Skip the precomputed lines if the rest of the buffer only fits with them.
/// They are never read: the pairing recomputes lines from the G2 points.
fn skip_kzg_lines(reader: &mut Reader) -> Result<()> {
    let remaining = reader.remaining();
    let fits = |offset: usize| {
        reader
            .peek_u32(offset)
            .and_then(index_slice_len)
            .and_then(|len| len.checked_add(offset))
            == Some(remaining)
    };
    if !fits(0) && fits(KZG_LINES_SIZE) {
        reader.take(KZG_LINES_SIZE, "kzg lines")?;
    }
    Ok(())
}

fn write_g1(out: &mut Vec<u8>, point: &G1Affine, raw: bool) {
    if raw {
        out.extend_from_slice(&point.to_uncompressed());
    } else {
        out.extend_from_slice(&point.to_compressed());
    }
}

/// PLONK proof structure
/// Contains all commitments and evaluations produced by the prover
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    /// Commitments to the wire polynomials l, r, o
    pub lro: [G1Affine; 3],

    /// Commitment to the permutation accumulator Z
    pub z: G1Affine,

    /// Commitments to the three pieces of the quotient polynomial
    pub h: [G1Affine; 3],

    /// Opening at ζ of the linearized polynomial, l, r, o, S₁, S₂ and
    /// every Qcp, in that order
    pub batched_proof: BatchOpeningProof,

    /// Opening of Z at ζω
    pub z_shifted_opening: OpeningProof,

    /// Commitments to the BSB22 committed-wire polynomials
    pub bsb22_commitments: Vec<G1Affine>,
}

impl Proof {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let lro = [
            reader.read_g1("L")?,
            reader.read_g1("R")?,
            reader.read_g1("O")?,
        ];
        let z = reader.read_g1("Z")?;
        let h = [
            reader.read_g1("H0")?,
            reader.read_g1("H1")?,
            reader.read_g1("H2")?,
        ];

        let batched_h = reader.read_g1("batched opening H")?;
        let num_values = reader.read_u32("claimed value count")?;
        let claimed_values = (0..num_values)
            .map(|_| reader.read_fr("claimed value"))
            .collect::<Result<Vec<_>>>()?;

        let z_shifted_opening = OpeningProof {
            h: reader.read_g1("shifted opening H")?,
            claimed_value: reader.read_fr("shifted claimed value")?,
        };

        let num_commitments = reader.read_u32("commitment count")?;
        let bsb22_commitments = (0..num_commitments)
            .map(|_| reader.read_g1("BSB22 commitment"))
            .collect::<Result<Vec<_>>>()?;
        reader.finish("proof")?;

        if claimed_values.len() < NUM_FIXED_CLAIMED_VALUES {
            return Err(VerifierError::malformed(format!(
                "batched opening carries {} claimed values, need at least {}",
                claimed_values.len(),
                NUM_FIXED_CLAIMED_VALUES
            )));
        }

        Ok(Proof {
            lro,
            z,
            h,
            batched_proof: BatchOpeningProof {
                h: batched_h,
                claimed_values,
            },
            z_shifted_opening,
            bsb22_commitments,
        })
    }

    fn encode(&self, raw: bool) -> Vec<u8> {
        let mut out = Vec::new();
        for point in self.lro.iter().chain([&self.z]).chain(&self.h) {
            write_g1(&mut out, point, raw);
        }
        write_g1(&mut out, &self.batched_proof.h, raw);
        out.extend_from_slice(&(self.batched_proof.claimed_values.len() as u32).to_be_bytes());
        for value in &self.batched_proof.claimed_values {
            out.extend_from_slice(&value.to_bytes_be());
        }
        write_g1(&mut out, &self.z_shifted_opening.h, raw);
        out.extend_from_slice(&self.z_shifted_opening.claimed_value.to_bytes_be());
        out.extend_from_slice(&(self.bsb22_commitments.len() as u32).to_be_bytes());
        for point in &self.bsb22_commitments {
            write_g1(&mut out, point, raw);
        }
        out
    }

    /// gnark's `WriteTo` layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.encode(false)
    }

    /// gnark's `WriteRawTo` layout.
    pub fn to_raw_bytes(&self) -> Vec<u8> {
        self.encode(true)
    }

    /// The claimed evaluations at ζ of the Qcp selectors.
    pub fn qcp_evaluations(&self) -> &[Fr] {
        &self.batched_proof.claimed_values[NUM_FIXED_CLAIMED_VALUES..]
    }
}

/// Verifier trace
#[derive(Clone, Debug, Serialize)]
pub struct VerifierTrace {
    /// Step 1: Transcript reconstruction
    pub transcript: Transcript,
    pub transcript_challenges: Challenges,

    /// Step 2: Evaluate vanishing polynomial
    pub z_h_zeta: Fr,

    /// Step 3: Evaluate L_1(ζ)
    pub l1_zeta: Fr,

    /// Step 4: Public inputs and commitment hashes at ζ
    pub pi_zeta: Fr,

    /// Step 5: Linearization; absent when ζ lies in the domain
    pub linearization: Option<LinearizationTrace>,

    /// Step 6: Pairing check; absent when an earlier step rejected
    pub pairing_check: Option<PairingCheckTrace>,

    /// Final result
    pub is_valid: bool,
}

/// Fiat-Shamir challenges in the order they are derived
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Challenges {
    pub gamma: Fr,
    pub beta: Fr,
    pub alpha: Fr,
    pub zeta: Fr,
    /// Folding challenge of the batched opening at ζ
    pub v: Fr,
    /// Combines the openings at ζ and ζω
    pub u: Fr,
}

/// Linearization trace
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinearizationTrace {
    /// PI(ζ) - α²L₁(ζ) + α(l̄+βs̄₁+γ)(r̄+βs̄₂+γ)(ō+γ)z̄ω; the linearized
    /// polynomial must open to its negation
    pub constant: Fr,
    /// Claimed opening of the linearized polynomial at ζ
    pub opening: Fr,
    /// Commitment to the linearized polynomial
    pub digest: G1Affine,
}

/// Pairing check trace
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PairingCheckTrace {
    /// The batched opening at ζ folded with v
    pub folded_digest: G1Affine,
    pub folded_value: Fr,
    /// Left pairing: e(-(H_ζ + u·H_ζω), [τ]₂)
    pub left_pairing_input: PairingInput,
    /// Right pairing: e(D + u[Z] - (v_ζ + u·z̄ω)[1] + ζH_ζ + uζωH_ζω, [1]₂)
    pub right_pairing_input: PairingInput,
    pub pairing_result: bool,
}

/// Pairing input trace
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PairingInput {
    pub g1: G1Affine,
    pub g2_description: String,
}
