//! Groth16 Type Definitions
//!
//! Keys and proofs in the gnark-crypto BN254 layout. Keys use compressed
//! points, proofs use uncompressed points.

use serde::{Deserialize, Serialize};

use crate::curve::encoding::{
    Reader, G1_COMPRESSED_SIZE, G1_UNCOMPRESSED_SIZE, G2_COMPRESSED_SIZE, G2_UNCOMPRESSED_SIZE,
};
use crate::curve::{G1Affine, G2Affine};
use crate::error::{Result, VerifierError};

/// Encoded proof size: A (G1) ‖ B (G2) ‖ C (G1), uncompressed.
pub const PROOF_SIZE: usize = 2 * G1_UNCOMPRESSED_SIZE + G2_UNCOMPRESSED_SIZE;

/// Fixed prefix of an encoded key, up to and including the IC count.
const VK_PREFIX_SIZE: usize = 3 * G1_COMPRESSED_SIZE + 3 * G2_COMPRESSED_SIZE + 4;

/// Pedersen commitment key carried in the tail of gnark keys
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentKey {
    pub g: G2Affine,
    pub g_root_sigma_neg: G2Affine,
}

/// Groth16 verifying key
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyingKey {
    /// [α]₁
    pub alpha_g1: G1Affine,
    /// [β]₁, kept for re-encoding
    pub beta_g1: G1Affine,
    /// [β]₂
    pub beta_g2: G2Affine,
    /// [γ]₂
    pub gamma_g2: G2Affine,
    /// [δ]₁, kept for re-encoding
    pub delta_g1: G1Affine,
    /// [δ]₂
    pub delta_g2: G2Affine,
    /// Input commitments, one more than the number of public inputs
    pub ic: Vec<G1Affine>,
    /// Wire indices covered by each Pedersen commitment
    pub public_and_commitment_committed: Vec<Vec<u32>>,
    pub commitment_key: Option<CommitmentKey>,
}

impl VerifyingKey {
    /// Number of public inputs the key expects.
    pub fn num_public_inputs(&self) -> usize {
        self.ic.len().saturating_sub(1)
    }

    /// Number of Pedersen commitments the circuit declares.
    pub fn num_commitments(&self) -> usize {
        self.public_and_commitment_committed.len()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < VK_PREFIX_SIZE {
            return Err(VerifierError::malformed(format!(
                "verifying key must be at least {} bytes, got {}",
                VK_PREFIX_SIZE,
                bytes.len()
            )));
        }

        let mut reader = Reader::new(bytes);
        let alpha_g1 = reader.read_g1_compressed("alpha")?;
        let beta_g1 = reader.read_g1_compressed("beta")?;
        let beta_g2 = reader.read_g2_compressed("beta")?;
        let gamma_g2 = reader.read_g2_compressed("gamma")?;
        let delta_g1 = reader.read_g1_compressed("delta")?;
        let delta_g2 = reader.read_g2_compressed("delta")?;

        let num_ic = reader.read_u32("IC count")? as usize;
        if num_ic == 0 {
            return Err(VerifierError::malformed("IC must hold at least one point"));
        }
        let ic = (0..num_ic)
            .map(|_| reader.read_g1_compressed("IC"))
            .collect::<Result<Vec<_>>>()?;

        let mut public_and_commitment_committed = Vec::new();
        let mut commitment_key = None;
        if !reader.is_empty() {
            let num_arrays = reader.read_u32("committed array count")?;
            for _ in 0..num_arrays {
                let len = reader.read_u32("committed array length")?;
                let entries = (0..len)
                    .map(|_| reader.read_u32("committed index"))
                    .collect::<Result<Vec<_>>>()?;
                public_and_commitment_committed.push(entries);
            }
            commitment_key = Some(CommitmentKey {
                g: reader.read_g2_compressed("commitment key g")?,
                g_root_sigma_neg: reader.read_g2_compressed("commitment key g_root_sigma_neg")?,
            });
        }
        reader.finish("verifying key")?;

        tracing::debug!(
            ic = ic.len(),
            commitments = public_and_commitment_committed.len(),
            "decoded groth16 verifying key"
        );

        Ok(VerifyingKey {
            alpha_g1,
            beta_g1,
            beta_g2,
            gamma_g2,
            delta_g1,
            delta_g2,
            ic,
            public_and_commitment_committed,
            commitment_key,
        })
    }

    /// Encode in the same layout `from_bytes` reads. The commitment tail is
    /// written only when a commitment key is present.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(VK_PREFIX_SIZE + self.ic.len() * G1_COMPRESSED_SIZE);
        out.extend_from_slice(&self.alpha_g1.to_compressed());
        out.extend_from_slice(&self.beta_g1.to_compressed());
        out.extend_from_slice(&self.beta_g2.to_compressed());
        out.extend_from_slice(&self.gamma_g2.to_compressed());
        out.extend_from_slice(&self.delta_g1.to_compressed());
        out.extend_from_slice(&self.delta_g2.to_compressed());
        out.extend_from_slice(&(self.ic.len() as u32).to_be_bytes());
        for point in &self.ic {
            out.extend_from_slice(&point.to_compressed());
        }

        if let Some(key) = &self.commitment_key {
            out.extend_from_slice(&(self.public_and_commitment_committed.len() as u32).to_be_bytes());
            for entries in &self.public_and_commitment_committed {
                out.extend_from_slice(&(entries.len() as u32).to_be_bytes());
                for entry in entries {
                    out.extend_from_slice(&entry.to_be_bytes());
                }
            }
            out.extend_from_slice(&key.g.to_compressed());
            out.extend_from_slice(&key.g_root_sigma_neg.to_compressed());
        }
        out
    }
}

/// Groth16 proof (A, B, C)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub a: G1Affine,
    pub b: G2Affine,
    pub c: G1Affine,
}

impl Proof {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != PROOF_SIZE {
            return Err(VerifierError::malformed(format!(
                "proof must be {} bytes, got {}",
                PROOF_SIZE,
                bytes.len()
            )));
        }
        let mut reader = Reader::new(bytes);
        let a = reader.read_g1_uncompressed("A")?;
        let b = reader.read_g2_uncompressed("B")?;
        let c = reader.read_g1_uncompressed("C")?;
        Ok(Proof { a, b, c })
    }

    pub fn to_bytes(&self) -> [u8; PROOF_SIZE] {
        let mut out = [0u8; PROOF_SIZE];
        out[..64].copy_from_slice(&self.a.to_uncompressed());
        out[64..192].copy_from_slice(&self.b.to_uncompressed());
        out[192..].copy_from_slice(&self.c.to_uncompressed());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{random_g1, random_g2, test_rng};

    fn sample_vk(num_inputs: usize) -> VerifyingKey {
        let mut rng = test_rng();
        VerifyingKey {
            alpha_g1: random_g1(&mut rng),
            beta_g1: random_g1(&mut rng),
            beta_g2: random_g2(&mut rng),
            gamma_g2: random_g2(&mut rng),
            delta_g1: random_g1(&mut rng),
            delta_g2: random_g2(&mut rng),
            ic: (0..=num_inputs).map(|_| random_g1(&mut rng)).collect(),
            public_and_commitment_committed: Vec::new(),
            commitment_key: None,
        }
    }

    #[test]
    fn test_vk_layout() {
        let vk = sample_vk(2);
        let bytes = vk.to_bytes();
        assert_eq!(bytes.len(), 292 + 3 * 32);
        assert_eq!(&bytes[..32], &vk.alpha_g1.to_compressed());
        assert_eq!(&bytes[64..128], &vk.beta_g2.to_compressed());
        assert_eq!(&bytes[288..292], &[0, 0, 0, 3]);

        let decoded = VerifyingKey::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, vk);
        assert_eq!(decoded.num_public_inputs(), 2);
    }

    #[test]
    fn test_vk_commitment_tail() {
        let mut rng = test_rng();
        let mut vk = sample_vk(1);
        vk.commitment_key = Some(CommitmentKey {
            g: random_g2(&mut rng),
            g_root_sigma_neg: random_g2(&mut rng),
        });

        // empty commitment list still carries the key
        let decoded = VerifyingKey::from_bytes(&vk.to_bytes()).unwrap();
        assert_eq!(decoded, vk);
        assert_eq!(decoded.num_commitments(), 0);

        vk.public_and_commitment_committed = vec![vec![1, 2], vec![]];
        let decoded = VerifyingKey::from_bytes(&vk.to_bytes()).unwrap();
        assert_eq!(decoded.num_commitments(), 2);
        assert_eq!(decoded.public_and_commitment_committed[0], vec![1, 2]);
    }

    #[test]
    fn test_vk_rejects_bad_lengths() {
        let bytes = sample_vk(1).to_bytes();

        let truncated = VerifyingKey::from_bytes(&bytes[..bytes.len() - 1]);
        assert!(matches!(truncated, Err(VerifierError::MalformedEncoding(_))));

        assert!(matches!(
            VerifyingKey::from_bytes(&bytes[..100]),
            Err(VerifierError::MalformedEncoding(_))
        ));

        // a partial tail is not a valid tail
        let mut padded = bytes.clone();
        padded.extend_from_slice(&[0, 0, 0, 0, 7]);
        assert!(matches!(
            VerifyingKey::from_bytes(&padded),
            Err(VerifierError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn test_vk_empty_ic_rejected() {
        let mut vk = sample_vk(0);
        vk.ic.clear();
        assert!(matches!(
            VerifyingKey::from_bytes(&vk.to_bytes()),
            Err(VerifierError::MalformedEncoding(_))
        ));
    }

    #[test]
    fn test_proof_layout() {
        let mut rng = test_rng();
        let proof = Proof {
            a: random_g1(&mut rng),
            b: random_g2(&mut rng),
            c: G1Affine::identity(),
        };
        let bytes = proof.to_bytes();
        assert_eq!(&bytes[64..192], &proof.b.to_uncompressed());
        assert_eq!(Proof::from_bytes(&bytes).unwrap(), proof);

        assert!(matches!(
            Proof::from_bytes(&bytes[..255]),
            Err(VerifierError::MalformedEncoding(_))
        ));
        let mut long = bytes.to_vec();
        long.push(0);
        assert!(matches!(
            Proof::from_bytes(&long),
            Err(VerifierError::MalformedEncoding(_))
        ));
    }
}
