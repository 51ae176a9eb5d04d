//! Point and Field Encodings
//!
//! Byte layouts follow gnark-crypto's BN254 serialization, which is what
//! gnark-generated keys and proofs use. Every coordinate is a 32-byte
//! big-endian integer.
//!
//! The top two bits of the first byte carry flags:
//!
//! | bits   | meaning                                  |
//! |--------|------------------------------------------|
//! | `0b00` | uncompressed                             |
//! | `0b01` | compressed point at infinity             |
//! | `0b10` | compressed, y is the smaller root        |
//! | `0b11` | compressed, y is the larger root         |
//!
//! G2 coordinates are written imaginary part first: `x.c1 ‖ x.c0 ‖ y.c1 ‖ y.c0`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{Affine, G1Affine, G2Affine, G2Config, SwCurve};
use crate::constants::G1_COEFF_B;
use crate::error::{Result, VerifierError};
use crate::field::{Field, Fq, Fq2, Fr};

pub const FIELD_SIZE: usize = 32;
pub const G1_COMPRESSED_SIZE: usize = 32;
pub const G1_UNCOMPRESSED_SIZE: usize = 64;
pub const G2_COMPRESSED_SIZE: usize = 64;
pub const G2_UNCOMPRESSED_SIZE: usize = 128;

const MASK: u8 = 0b11 << 6;
const FLAG_UNCOMPRESSED: u8 = 0b00 << 6;
const FLAG_INFINITY: u8 = 0b01 << 6;
const FLAG_SMALLEST: u8 = 0b10 << 6;
const FLAG_LARGEST: u8 = 0b11 << 6;

fn check_len(bytes: &[u8], expected: usize, what: &str) -> Result<()> {
    if bytes.len() != expected {
        return Err(VerifierError::malformed(format!(
            "{} must be {} bytes, got {}",
            what,
            expected,
            bytes.len()
        )));
    }
    Ok(())
}

/// True when every bit other than the two flag bits is zero.
fn only_flags(bytes: &[u8]) -> bool {
    bytes[0] & !MASK == 0 && bytes[1..].iter().all(|b| *b == 0)
}

/// Decode a canonical 32-byte big-endian base-field element.
pub fn decode_fq(bytes: &[u8]) -> Result<Fq> {
    check_len(bytes, FIELD_SIZE, "Fq element")?;
    let mut arr = [0u8; FIELD_SIZE];
    arr.copy_from_slice(bytes);
    Fq::from_bytes_be(&arr).ok_or_else(|| VerifierError::malformed("Fq element not canonical"))
}

/// Decode a canonical 32-byte big-endian scalar.
pub fn decode_fr(bytes: &[u8]) -> Result<Fr> {
    check_len(bytes, FIELD_SIZE, "Fr element")?;
    let mut arr = [0u8; FIELD_SIZE];
    arr.copy_from_slice(bytes);
    Fr::from_bytes_be(&arr).ok_or_else(|| VerifierError::malformed("Fr element not canonical"))
}

/// Public inputs are a bare concatenation of 32-byte scalars.
pub fn decode_public_inputs(bytes: &[u8]) -> Result<Vec<Fr>> {
    if bytes.len() % FIELD_SIZE != 0 {
        return Err(VerifierError::malformed(format!(
            "public inputs length {} is not a multiple of {}",
            bytes.len(),
            FIELD_SIZE
        )));
    }
    bytes.chunks_exact(FIELD_SIZE).map(decode_fr).collect()
}

pub fn encode_public_inputs(inputs: &[Fr]) -> Vec<u8> {
    inputs.iter().flat_map(|x| x.to_bytes_be()).collect()
}

/// Decode the x coordinate of a compressed encoding with its flag bits
/// cleared.
fn strip_flags(bytes: &[u8]) -> Result<Fq> {
    let mut arr = [0u8; FIELD_SIZE];
    arr.copy_from_slice(&bytes[..FIELD_SIZE]);
    arr[0] &= !MASK;
    Fq::from_bytes_be(&arr).ok_or_else(|| VerifierError::malformed("x coordinate not canonical"))
}

/// Reject points off the curve, and points outside the prime-order subgroup
/// for curves with a cofactor.
pub fn validate<C: SwCurve>(point: Affine<C>) -> Result<Affine<C>> {
    if !point.is_on_curve() {
        return Err(VerifierError::PointNotOnCurve);
    }
    // With cofactor 1 the curve check already implies subgroup membership.
    if !C::COFACTOR_IS_ONE && !point.is_in_subgroup() {
        return Err(VerifierError::PointNotInSubgroup);
    }
    Ok(point)
}

// ============================================================================
// G1
// ============================================================================

impl G1Affine {
    /// `x ‖ y`, all zero for the point at infinity.
    pub fn to_uncompressed(&self) -> [u8; G1_UNCOMPRESSED_SIZE] {
        let mut out = [0u8; G1_UNCOMPRESSED_SIZE];
        if self.infinity {
            return out;
        }
        out[..32].copy_from_slice(&self.x.to_bytes_be());
        out[32..].copy_from_slice(&self.y.to_bytes_be());
        out
    }

    /// Decode `x ‖ y`. The all-zero buffer is the point at infinity.
    pub fn from_uncompressed(bytes: &[u8]) -> Result<Self> {
        check_len(bytes, G1_UNCOMPRESSED_SIZE, "uncompressed G1 point")?;
        match bytes[0] & MASK {
            FLAG_UNCOMPRESSED if only_flags(bytes) => Ok(Self::identity()),
            FLAG_UNCOMPRESSED => {
                let x = decode_fq(&bytes[..32])?;
                let y = decode_fq(&bytes[32..])?;
                validate(Self::new_unchecked(x, y))
            }
            _ => Err(VerifierError::malformed("invalid flags on uncompressed G1 point")),
        }
    }

    pub fn to_compressed(&self) -> [u8; G1_COMPRESSED_SIZE] {
        let mut out = [0u8; G1_COMPRESSED_SIZE];
        if self.infinity {
            out[0] = FLAG_INFINITY;
            return out;
        }
        out.copy_from_slice(&self.x.to_bytes_be());
        out[0] |= if self.y.lexicographically_largest() {
            FLAG_LARGEST
        } else {
            FLAG_SMALLEST
        };
        out
    }

    pub fn from_compressed(bytes: &[u8]) -> Result<Self> {
        check_len(bytes, G1_COMPRESSED_SIZE, "compressed G1 point")?;
        let flag = bytes[0] & MASK;
        match flag {
            FLAG_INFINITY if only_flags(bytes) => Ok(Self::identity()),
            FLAG_SMALLEST | FLAG_LARGEST => {
                let x = strip_flags(bytes)?;
                let y = (x.square() * x + G1_COEFF_B)
                    .sqrt()
                    .ok_or(VerifierError::PointNotOnCurve)?;
                let y = if y.lexicographically_largest() == (flag == FLAG_LARGEST) {
                    y
                } else {
                    -y
                };
                validate(Self::new_unchecked(x, y))
            }
            _ => Err(VerifierError::malformed("invalid flags on compressed G1 point")),
        }
    }

    /// Compressed encoding as hex
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_compressed()))
    }
}

// ============================================================================
// G2
// ============================================================================

fn write_fq2(out: &mut [u8], a: &Fq2) {
    out[..32].copy_from_slice(&a.c1.to_bytes_be());
    out[32..64].copy_from_slice(&a.c0.to_bytes_be());
}

fn read_fq2(bytes: &[u8]) -> Result<Fq2> {
    let c1 = decode_fq(&bytes[..32])?;
    let c0 = decode_fq(&bytes[32..64])?;
    Ok(Fq2::new(c0, c1))
}

impl G2Affine {
    pub fn to_uncompressed(&self) -> [u8; G2_UNCOMPRESSED_SIZE] {
        let mut out = [0u8; G2_UNCOMPRESSED_SIZE];
        if self.infinity {
            return out;
        }
        write_fq2(&mut out[..64], &self.x);
        write_fq2(&mut out[64..], &self.y);
        out
    }

    pub fn from_uncompressed(bytes: &[u8]) -> Result<Self> {
        check_len(bytes, G2_UNCOMPRESSED_SIZE, "uncompressed G2 point")?;
        match bytes[0] & MASK {
            FLAG_UNCOMPRESSED if only_flags(bytes) => Ok(Self::identity()),
            FLAG_UNCOMPRESSED => {
                let x = read_fq2(&bytes[..64])?;
                let y = read_fq2(&bytes[64..])?;
                validate(Self::new_unchecked(x, y))
            }
            _ => Err(VerifierError::malformed("invalid flags on uncompressed G2 point")),
        }
    }

    pub fn to_compressed(&self) -> [u8; G2_COMPRESSED_SIZE] {
        let mut out = [0u8; G2_COMPRESSED_SIZE];
        if self.infinity {
            out[0] = FLAG_INFINITY;
            return out;
        }
        write_fq2(&mut out, &self.x);
        out[0] |= if self.y.lexicographically_largest() {
            FLAG_LARGEST
        } else {
            FLAG_SMALLEST
        };
        out
    }

    pub fn from_compressed(bytes: &[u8]) -> Result<Self> {
        check_len(bytes, G2_COMPRESSED_SIZE, "compressed G2 point")?;
        let flag = bytes[0] & MASK;
        match flag {
            FLAG_INFINITY if only_flags(bytes) => Ok(Self::identity()),
            FLAG_SMALLEST | FLAG_LARGEST => {
                let x = Fq2::new(decode_fq(&bytes[32..64])?, strip_flags(&bytes[..32])?);
                let y = (x.square() * x + G2Config::COEFF_B)
                    .sqrt()
                    .ok_or(VerifierError::PointNotOnCurve)?;
                let y = if y.lexicographically_largest() == (flag == FLAG_LARGEST) {
                    y
                } else {
                    -y
                };
                validate(Self::new_unchecked(x, y))
            }
            _ => Err(VerifierError::malformed("invalid flags on compressed G2 point")),
        }
    }

    /// Compressed encoding as hex
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_compressed()))
    }
}

// ============================================================================
// Byte reader
// ============================================================================

/// Sequential reader over a key or proof buffer. Every read checks the
/// remaining length and reports `MalformedEncoding` on truncation.
pub(crate) struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes, pos: 0 }
    }

    pub(crate) fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| {
                VerifierError::malformed(format!("truncated input while reading {}", what))
            })?;
        let out = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    pub(crate) fn read_u32(&mut self, what: &str) -> Result<u32> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.take(4, what)?);
        Ok(u32::from_be_bytes(buf))
    }

    pub(crate) fn read_u64(&mut self, what: &str) -> Result<u64> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8, what)?);
        Ok(u64::from_be_bytes(buf))
    }

    pub(crate) fn read_fr(&mut self, what: &str) -> Result<Fr> {
        decode_fr(self.take(FIELD_SIZE, what)?)
    }

    pub(crate) fn read_g1_compressed(&mut self, what: &str) -> Result<G1Affine> {
        G1Affine::from_compressed(self.take(G1_COMPRESSED_SIZE, what)?)
    }

    pub(crate) fn read_g1_uncompressed(&mut self, what: &str) -> Result<G1Affine> {
        G1Affine::from_uncompressed(self.take(G1_UNCOMPRESSED_SIZE, what)?)
    }

    pub(crate) fn read_g2_compressed(&mut self, what: &str) -> Result<G2Affine> {
        G2Affine::from_compressed(self.take(G2_COMPRESSED_SIZE, what)?)
    }

    pub(crate) fn read_g2_uncompressed(&mut self, what: &str) -> Result<G2Affine> {
        G2Affine::from_uncompressed(self.take(G2_UNCOMPRESSED_SIZE, what)?)
    }

    fn peek_flags(&self, what: &str) -> Result<u8> {
        self.bytes
            .get(self.pos)
            .map(|b| b & MASK)
            .ok_or_else(|| VerifierError::malformed(format!("truncated input while reading {}", what)))
    }

    /// A G1 point in whichever form its flag bits announce.
    pub(crate) fn read_g1(&mut self, what: &str) -> Result<G1Affine> {
        match self.peek_flags(what)? {
            FLAG_UNCOMPRESSED => self.read_g1_uncompressed(what),
            _ => self.read_g1_compressed(what),
        }
    }

    /// A G2 point in whichever form its flag bits announce.
    pub(crate) fn read_g2(&mut self, what: &str) -> Result<G2Affine> {
        match self.peek_flags(what)? {
            FLAG_UNCOMPRESSED => self.read_g2_uncompressed(what),
            _ => self.read_g2_compressed(what),
        }
    }

    /// The big-endian u32 `offset` bytes ahead, without consuming anything.
    pub(crate) fn peek_u32(&self, offset: usize) -> Option<u32> {
        let start = self.pos.checked_add(offset)?;
        let bytes = self.bytes.get(start..start.checked_add(4)?)?;
        let mut buf = [0u8; 4];
        buf.copy_from_slice(bytes);
        Some(u32::from_be_bytes(buf))
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.pos == self.bytes.len()
    }

    /// Fail if any bytes are left over.
    pub(crate) fn finish(&self, what: &str) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(VerifierError::malformed(format!(
                "{} trailing bytes after {}",
                self.bytes.len() - self.pos,
                what
            )))
        }
    }
}

// ============================================================================
// Serde Implementation
// ============================================================================

impl Serialize for G1Affine {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct G1Json {
            compressed: String,
            x: String,
            y: String,
        }

        let json = if self.infinity {
            G1Json {
                compressed: self.to_hex(),
                x: "infinity".to_string(),
                y: "infinity".to_string(),
            }
        } else {
            G1Json {
                compressed: self.to_hex(),
                x: self.x.to_hex(),
                y: self.y.to_hex(),
            }
        };
        json.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for G1Affine {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct G1Json {
            compressed: String,
        }

        let json = G1Json::deserialize(deserializer)?;
        let hex_str = json.compressed.strip_prefix("0x").unwrap_or(&json.compressed);
        let bytes = hex::decode(hex_str)
            .map_err(|e| serde::de::Error::custom(format!("Invalid hex: {}", e)))?;
        G1Affine::from_compressed(&bytes).map_err(serde::de::Error::custom)
    }
}

impl Serialize for G2Affine {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct G2Json {
            compressed: String,
        }

        let json = G2Json {
            compressed: self.to_hex(),
        };
        json.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for G2Affine {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct G2Json {
            compressed: String,
        }

        let json = G2Json::deserialize(deserializer)?;
        let hex_str = json.compressed.strip_prefix("0x").unwrap_or(&json.compressed);
        let bytes = hex::decode(hex_str)
            .map_err(|e| serde::de::Error::custom(format!("Invalid hex: {}", e)))?;
        G2Affine::from_compressed(&bytes).map_err(serde::de::Error::custom)
    }
}
