//! Fiat-Shamir Transcript
//!
//! Challenges are declared up front by name and computed in that order.
//! Values are bound to a named challenge; computing it hashes, with SHA-256,
//!
//! ```text
//! name ‖ previous challenge digest (all but the first) ‖ bound values
//! ```
//!
//! and the digest, read as a big-endian integer mod r, is the challenge.
//! This is gnark-crypto's `fiat-shamir` transcript, so challenges match the
//! ones a gnark prover derived.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::curve::G1Affine;
use crate::error::{Result, VerifierError};
use crate::field::Fr;

#[derive(Clone, Debug)]
struct Challenge {
    name: &'static str,
    bindings: Vec<Vec<u8>>,
    digest: Option<[u8; 32]>,
}

/// A Fiat-Shamir transcript for generating challenges
#[derive(Clone, Debug)]
pub struct Transcript {
    challenges: Vec<Challenge>,
    /// Record of all data bound (for tracing)
    pub absorbed: Vec<TranscriptEntry>,
    /// Record of all challenges computed (for tracing)
    pub computed: Vec<ChallengeRecord>,
}

/// A record of a value bound to a challenge
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub challenge: String,
    pub label: String,
    pub data_hex: String,
}

/// A record of a computed challenge
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChallengeRecord {
    pub label: String,
    pub value: Fr,
}

impl Transcript {
    /// Create a transcript for the given challenges, in derivation order
    pub fn new(names: &[&'static str]) -> Self {
        Transcript {
            challenges: names
                .iter()
                .map(|&name| Challenge {
                    name,
                    bindings: Vec::new(),
                    digest: None,
                })
                .collect(),
            absorbed: Vec::new(),
            computed: Vec::new(),
        }
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.challenges
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| VerifierError::Transcript(format!("unknown challenge {}", name)))
    }

    /// Bind raw bytes to a challenge that has not been computed yet
    pub fn bind(&mut self, name: &str, label: &str, data: &[u8]) -> Result<()> {
        let pos = self.position(name)?;
        let challenge = &mut self.challenges[pos];
        if challenge.digest.is_some() {
            return Err(VerifierError::Transcript(format!(
                "challenge {} already computed",
                name
            )));
        }
        challenge.bindings.push(data.to_vec());

        self.absorbed.push(TranscriptEntry {
            challenge: name.to_string(),
            label: label.to_string(),
            data_hex: hex::encode(data),
        });
        Ok(())
    }

    /// Bind a scalar (32 bytes, big-endian)
    pub fn bind_fr(&mut self, name: &str, label: &str, value: &Fr) -> Result<()> {
        self.bind(name, label, &value.to_bytes_be())
    }

    /// Bind a G1 point (64-byte raw encoding)
    pub fn bind_g1(&mut self, name: &str, label: &str, point: &G1Affine) -> Result<()> {
        self.bind(name, label, &point.to_uncompressed())
    }

    /// The raw digest of a challenge, computing it on first use.
    pub fn compute_digest(&mut self, name: &str) -> Result<[u8; 32]> {
        let pos = self.position(name)?;
        if let Some(digest) = self.challenges[pos].digest {
            return Ok(digest);
        }

        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        if pos > 0 {
            let previous = self.challenges[pos - 1].digest.ok_or_else(|| {
                VerifierError::Transcript(format!(
                    "{} computed before {}",
                    name,
                    self.challenges[pos - 1].name
                ))
            })?;
            hasher.update(previous);
        }
        for binding in &self.challenges[pos].bindings {
            hasher.update(binding);
        }
        let digest: [u8; 32] = hasher.finalize().into();
        self.challenges[pos].digest = Some(digest);

        self.computed.push(ChallengeRecord {
            label: name.to_string(),
            value: Fr::from_bytes_be_mod_order(&digest),
        });
        Ok(digest)
    }

    /// Compute a challenge: its digest reduced mod r.
    pub fn compute_challenge(&mut self, name: &str) -> Result<Fr> {
        let digest = self.compute_digest(name)?;
        Ok(Fr::from_bytes_be_mod_order(&digest))
    }
}

impl Serialize for Transcript {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct TranscriptJson<'a> {
            absorbed: &'a [TranscriptEntry],
            challenges: &'a [ChallengeRecord],
        }

        let json = TranscriptJson {
            absorbed: &self.absorbed,
            challenges: &self.computed,
        };
        json.serialize(serializer)
    }
}
