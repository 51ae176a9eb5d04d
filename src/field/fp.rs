//! Prime Field Arithmetic
//!
//! A generic 256-bit prime field in Montgomery form. Both BN254 fields are
//! instances of it:
//!
//! - `Fq`: the base field, p = 21888242871839275222246405745257275088696311157297823662689037894645226208583
//! - `Fr`: the scalar field, r = 21888242871839275222246405745257275088548364400416034343698204186575808495617
//!
//! All Montgomery constants are derived from the modulus at compile time.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use super::Field;

/// Parameters of a 4-limb prime field.
pub trait FieldParams:
    'static + Copy + Clone + fmt::Debug + Default + PartialEq + Eq + Hash + Send + Sync
{
    /// Little-endian limbs of the modulus. The top bit must be clear.
    const MODULUS: [u64; 4];
    const NAME: &'static str;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FqParams;

impl FieldParams for FqParams {
    const MODULUS: [u64; 4] = [
        0x3c208c16d87cfd47,
        0x97816a916871ca8d,
        0xb85045b68181585d,
        0x30644e72e131a029,
    ];
    const NAME: &'static str = "Fq";
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FrParams;

impl FieldParams for FrParams {
    const MODULUS: [u64; 4] = [
        0x43e1f593f0000001,
        0x2833e84879b97091,
        0xb85045b68181585d,
        0x30644e72e131a029,
    ];
    const NAME: &'static str = "Fr";
}

/// BN254 base field.
pub type Fq = Fp<FqParams>;

/// BN254 scalar field. Public inputs, challenges and evaluations live here.
pub type Fr = Fp<FrParams>;

/// An element of a prime field, stored as `a·R mod p` with R = 2^256.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fp<P: FieldParams> {
    limbs: [u64; 4],
    _params: PhantomData<P>,
}

// ============================================================================
// Limb arithmetic
// ============================================================================

#[inline(always)]
pub(crate) const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let t = (a as u128) + (b as u128) + (carry as u128);
    (t as u64, (t >> 64) as u64)
}

#[inline(always)]
pub(crate) const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let t = (a as u128).wrapping_sub((b as u128) + (borrow as u128));
    (t as u64, (t >> 127) as u64)
}

/// a + b·c + carry
#[inline(always)]
pub(crate) const fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let t = (a as u128) + (b as u128) * (c as u128) + (carry as u128);
    (t as u64, (t >> 64) as u64)
}

pub(crate) const fn add_limbs(a: &[u64; 4], b: &[u64; 4]) -> ([u64; 4], u64) {
    let mut out = [0u64; 4];
    let mut carry = 0;
    let mut i = 0;
    while i < 4 {
        let (s, c) = adc(a[i], b[i], carry);
        out[i] = s;
        carry = c;
        i += 1;
    }
    (out, carry)
}

pub(crate) const fn sub_limbs(a: &[u64; 4], b: &[u64; 4]) -> ([u64; 4], u64) {
    let mut out = [0u64; 4];
    let mut borrow = 0;
    let mut i = 0;
    while i < 4 {
        let (d, br) = sbb(a[i], b[i], borrow);
        out[i] = d;
        borrow = br;
        i += 1;
    }
    (out, borrow)
}

/// a >= b
pub(crate) const fn geq(a: &[u64; 4], b: &[u64; 4]) -> bool {
    let mut i = 4;
    while i > 0 {
        i -= 1;
        if a[i] != b[i] {
            return a[i] > b[i];
        }
    }
    true
}

/// Division by a small constant, discarding the remainder.
pub(crate) const fn div_small(a: &[u64; 4], d: u64) -> [u64; 4] {
    let mut q = [0u64; 4];
    let mut rem: u128 = 0;
    let mut i = 4;
    while i > 0 {
        i -= 1;
        let cur = (rem << 64) | (a[i] as u128);
        q[i] = (cur / d as u128) as u64;
        rem = cur % d as u128;
    }
    q
}

const fn add_mod(a: &[u64; 4], b: &[u64; 4], m: &[u64; 4]) -> [u64; 4] {
    let (s, carry) = add_limbs(a, b);
    if carry != 0 || geq(&s, m) {
        sub_limbs(&s, m).0
    } else {
        s
    }
}

const fn sub_mod(a: &[u64; 4], b: &[u64; 4], m: &[u64; 4]) -> [u64; 4] {
    let (d, borrow) = sub_limbs(a, b);
    if borrow != 0 {
        add_limbs(&d, m).0
    } else {
        d
    }
}

/// 2^k mod m by repeated doubling.
const fn pow2_mod(k: usize, m: &[u64; 4]) -> [u64; 4] {
    let mut r = [1u64, 0, 0, 0];
    let mut i = 0;
    while i < k {
        r = add_mod(&r, &r, m);
        i += 1;
    }
    r
}

/// -m⁻¹ mod 2^64
const fn mont_inv(m0: u64) -> u64 {
    let mut inv = 1u64;
    let mut i = 0;
    while i < 63 {
        inv = inv.wrapping_mul(inv);
        inv = inv.wrapping_mul(m0);
        i += 1;
    }
    inv.wrapping_neg()
}

/// Montgomery multiplication (CIOS): a·b·R⁻¹ mod m.
const fn mont_mul(a: &[u64; 4], b: &[u64; 4], m: &[u64; 4], inv: u64) -> [u64; 4] {
    let mut t = [0u64; 6];
    let mut i = 0;
    while i < 4 {
        let mut carry = 0;
        let mut j = 0;
        while j < 4 {
            let (lo, hi) = mac(t[j], a[j], b[i], carry);
            t[j] = lo;
            carry = hi;
            j += 1;
        }
        let (lo, hi) = adc(t[4], carry, 0);
        t[4] = lo;
        t[5] = hi;

        let k = t[0].wrapping_mul(inv);
        let (_, mut carry) = mac(t[0], k, m[0], 0);
        let mut j = 1;
        while j < 4 {
            let (lo, hi) = mac(t[j], k, m[j], carry);
            t[j - 1] = lo;
            carry = hi;
            j += 1;
        }
        let (lo, hi) = adc(t[4], carry, 0);
        t[3] = lo;
        t[4] = t[5] + hi;
        t[5] = 0;
        i += 1;
    }

    let r = [t[0], t[1], t[2], t[3]];
    if t[4] != 0 || geq(&r, m) {
        sub_limbs(&r, m).0
    } else {
        r
    }
}

// ============================================================================
// Fp
// ============================================================================

impl<P: FieldParams> Fp<P> {
    pub const MODULUS: [u64; 4] = P::MODULUS;

    const INV: u64 = mont_inv(P::MODULUS[0]);
    const R: [u64; 4] = pow2_mod(256, &P::MODULUS);
    const R2: [u64; 4] = pow2_mod(512, &P::MODULUS);
    const MODULUS_MINUS_TWO: [u64; 4] = sub_limbs(&P::MODULUS, &[2, 0, 0, 0]).0;
    const MODULUS_MINUS_ONE_DIV_TWO: [u64; 4] =
        div_small(&sub_limbs(&P::MODULUS, &[1, 0, 0, 0]).0, 2);

    /// Build an element from canonical little-endian limbs. The caller
    /// guarantees `limbs < MODULUS`.
    pub const fn from_raw(limbs: [u64; 4]) -> Self {
        Fp {
            limbs: mont_mul(&limbs, &Self::R2, &P::MODULUS, Self::INV),
            _params: PhantomData,
        }
    }

    /// Build an element from little-endian limbs, rejecting values that are
    /// not fully reduced.
    pub fn from_canonical_limbs(limbs: [u64; 4]) -> Option<Self> {
        if geq(&limbs, &P::MODULUS) {
            None
        } else {
            Some(Self::from_raw(limbs))
        }
    }

    pub const fn from_u64(val: u64) -> Self {
        Self::from_raw([val, 0, 0, 0])
    }

    /// The canonical integer value as little-endian limbs.
    pub fn to_canonical_limbs(&self) -> [u64; 4] {
        mont_mul(&self.limbs, &[1, 0, 0, 0], &P::MODULUS, Self::INV)
    }

    /// Decode a canonical 32-byte big-endian integer.
    pub fn from_bytes_be(bytes: &[u8; 32]) -> Option<Self> {
        let mut limbs = [0u64; 4];
        for (i, chunk) in bytes.chunks_exact(8).enumerate() {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(chunk);
            limbs[3 - i] = u64::from_be_bytes(buf);
        }
        Self::from_canonical_limbs(limbs)
    }

    /// Interpret an arbitrary big-endian byte string as an integer and
    /// reduce it modulo the field order.
    pub fn from_bytes_be_mod_order(bytes: &[u8]) -> Self {
        let base = Self::from_u64(256);
        bytes.iter().fold(<Self as Field>::zero(), |acc, b| {
            acc * base + Self::from_u64(*b as u64)
        })
    }

    pub fn to_bytes_be(&self) -> [u8; 32] {
        let limbs = self.to_canonical_limbs();
        let mut out = [0u8; 32];
        for (i, limb) in limbs.iter().rev().enumerate() {
            out[i * 8..(i + 1) * 8].copy_from_slice(&limb.to_be_bytes());
        }
        out
    }

    /// Convert to hex string (full 64 characters)
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes_be()))
    }

    /// Convert to short hex string (truncated for display)
    pub fn to_short_hex(&self) -> String {
        let full = self.to_hex();
        if full.len() > 18 {
            format!("{}...{}", &full[..10], &full[full.len() - 8..])
        } else {
            full
        }
    }

    /// Parse from a big-endian hex string, with or without `0x`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).ok()?;
        let arr: [u8; 32] = bytes.try_into().ok()?;
        Self::from_bytes_be(&arr)
    }

    /// Whether the canonical value exceeds `(modulus - 1) / 2`.
    pub fn lexicographically_largest(&self) -> bool {
        !geq(&Self::MODULUS_MINUS_ONE_DIV_TWO, &self.to_canonical_limbs())
    }
}

impl Fp<FqParams> {
    const MODULUS_PLUS_ONE_DIV_FOUR: [u64; 4] =
        div_small(&add_limbs(&FqParams::MODULUS, &[1, 0, 0, 0]).0, 4);

    /// Square root. p ≡ 3 (mod 4), so a candidate is `a^((p+1)/4)`; it is a
    /// root exactly when `a` is a quadratic residue.
    pub fn sqrt(&self) -> Option<Self> {
        let candidate = self.pow(&Self::MODULUS_PLUS_ONE_DIV_FOUR);
        if candidate.square() == *self {
            Some(candidate)
        } else {
            None
        }
    }
}

impl Fp<FrParams> {
    /// Largest `k` such that `2^k` divides `r - 1`.
    pub const TWO_ADICITY: u32 = 28;
}

impl<P: FieldParams> Field for Fp<P> {
    fn zero() -> Self {
        Fp {
            limbs: [0; 4],
            _params: PhantomData,
        }
    }

    fn one() -> Self {
        Fp {
            limbs: Self::R,
            _params: PhantomData,
        }
    }

    fn is_zero(&self) -> bool {
        self.limbs == [0; 4]
    }

    fn square(&self) -> Self {
        *self * *self
    }

    fn inverse(&self) -> Option<Self> {
        if self.is_zero() {
            None
        } else {
            Some(self.pow(&Self::MODULUS_MINUS_TWO))
        }
    }
}

// Arithmetic operations

impl<P: FieldParams> Add for Fp<P> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Fp {
            limbs: add_mod(&self.limbs, &rhs.limbs, &P::MODULUS),
            _params: PhantomData,
        }
    }
}

impl<P: FieldParams> Sub for Fp<P> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Fp {
            limbs: sub_mod(&self.limbs, &rhs.limbs, &P::MODULUS),
            _params: PhantomData,
        }
    }
}

impl<P: FieldParams> Mul for Fp<P> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Fp {
            limbs: mont_mul(&self.limbs, &rhs.limbs, &P::MODULUS, Self::INV),
            _params: PhantomData,
        }
    }
}

impl<P: FieldParams> Neg for Fp<P> {
    type Output = Self;
    fn neg(self) -> Self {
        if self.is_zero() {
            self
        } else {
            Fp {
                limbs: sub_limbs(&P::MODULUS, &self.limbs).0,
                _params: PhantomData,
            }
        }
    }
}

impl<P: FieldParams> AddAssign for Fp<P> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<P: FieldParams> SubAssign for Fp<P> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<P: FieldParams> MulAssign for Fp<P> {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<P: FieldParams> From<u64> for Fp<P> {
    fn from(val: u64) -> Self {
        Self::from_u64(val)
    }
}

impl<P: FieldParams> Default for Fp<P> {
    fn default() -> Self {
        <Self as Field>::zero()
    }
}

impl<P: FieldParams> fmt::Debug for Fp<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", P::NAME, self.to_hex())
    }
}

impl<P: FieldParams> fmt::Display for Fp<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// Serde implementation for JSON
impl<P: FieldParams> Serialize for Fp<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct FpJson {
            full: String,
            short: String,
        }

        let json = FpJson {
            full: self.to_hex(),
            short: self.to_short_hex(),
        };
        json.serialize(serializer)
    }
}

impl<'de, P: FieldParams> Deserialize<'de> for Fp<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct FpJson {
            full: String,
        }

        let json = FpJson::deserialize(deserializer)?;
        Self::from_hex(&json.full)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid {} hex", P::NAME)))
    }
}
