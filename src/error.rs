//! Verification errors.
//!
//! An error means the input could not be interpreted. A proof that decodes
//! cleanly but fails its pairing check is not an error: verifiers report it
//! as `Ok(false)`.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifierError {
    /// Wrong byte length, bad flag bits or a non-canonical field element
    #[error("malformed encoding: {0}")]
    MalformedEncoding(String),

    #[error("point is not on the curve")]
    PointNotOnCurve,

    #[error("point is not in the prime-order subgroup")]
    PointNotInSubgroup,

    #[error("expected {expected} public inputs, got {actual}")]
    PublicInputCountMismatch { expected: usize, actual: usize },

    /// PLONK circuit size is not a power of two, or exceeds 2^28
    #[error("invalid evaluation domain size {0}")]
    DomainSizeInvalid(u64),

    /// PLONK domain generator is not an n-th root of unity
    #[error("domain generator is not a root of unity of the declared order")]
    InvalidDomainGenerator,

    #[error("division by zero")]
    DivisionByZero,

    /// Groth16 key declares Pedersen commitments, which this verifier does not check
    #[error("verifying key declares {0} commitment(s), which are not supported")]
    UnsupportedCommitment(usize),

    /// PLONK proof carries a different number of BSB22 commitments than the
    /// key has commitment selectors
    #[error("expected {expected} commitment(s), proof carries {actual}")]
    CommitmentCountMismatch { expected: usize, actual: usize },

    /// A challenge was bound or computed out of order
    #[error("transcript: {0}")]
    Transcript(String),
}

impl VerifierError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        VerifierError::MalformedEncoding(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, VerifierError>;
