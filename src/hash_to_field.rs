//! Hashing to Fr
//!
//! `expand_message_xmd` from RFC 9380 (section 5.3.1) instantiated with
//! SHA-256, and the reduction of 48 uniform bytes to a scalar. PLONK uses it
//! to turn a BSB22 commitment into the public value committed to by the
//! circuit.

use sha2::{Digest, Sha256};

use crate::error::{Result, VerifierError};
use crate::field::Fr;

/// Domain separation tag of the BSB22 commitment hash.
pub const BSB22_DST: &[u8] = b"BSB22-Plonk";

const B_IN_BYTES: usize = 32;
const S_IN_BYTES: usize = 64;

/// ⌈(⌈log2 r⌉ + 128) / 8⌉ bytes per scalar
const BYTES_PER_SCALAR: usize = 48;

/// Expand `msg` into `len` pseudo-random bytes bound to `dst`.
pub fn expand_message_xmd(msg: &[u8], dst: &[u8], len: usize) -> Result<Vec<u8>> {
    let ell = len.div_ceil(B_IN_BYTES);
    if ell > 255 || len > u16::MAX as usize {
        return Err(VerifierError::malformed(format!(
            "cannot expand to {} bytes",
            len
        )));
    }
    let dst_len = u8::try_from(dst.len())
        .map_err(|_| VerifierError::malformed("domain separation tag longer than 255 bytes"))?;

    let b_0 = Sha256::new()
        .chain_update([0u8; S_IN_BYTES])
        .chain_update(msg)
        .chain_update((len as u16).to_be_bytes())
        .chain_update([0u8])
        .chain_update(dst)
        .chain_update([dst_len])
        .finalize();

    let mut out = Vec::with_capacity(ell * B_IN_BYTES);
    let mut b_i = Sha256::new()
        .chain_update(b_0)
        .chain_update([1u8])
        .chain_update(dst)
        .chain_update([dst_len])
        .finalize();
    out.extend_from_slice(&b_i);

    for i in 2..=ell {
        let mut mixed = [0u8; B_IN_BYTES];
        for (m, (x, y)) in mixed.iter_mut().zip(b_0.iter().zip(b_i.iter())) {
            *m = x ^ y;
        }
        b_i = Sha256::new()
            .chain_update(mixed)
            .chain_update([i as u8])
            .chain_update(dst)
            .chain_update([dst_len])
            .finalize();
        out.extend_from_slice(&b_i);
    }

    out.truncate(len);
    Ok(out)
}

/// Hash a message to a single scalar.
pub fn hash_to_fr(msg: &[u8], dst: &[u8]) -> Result<Fr> {
    let bytes = expand_message_xmd(msg, dst, BYTES_PER_SCALAR)?;
    Ok(Fr::from_bytes_be_mod_order(&bytes))
}
