//! BN254 Field Arithmetic
//!
//! The base field Fq, the scalar field Fr and the extension tower used by the
//! pairing:
//!
//! - `Fq2  = Fq[u] / (u² + 1)`
//! - `Fq6  = Fq2[v] / (v³ - ξ)`, with ξ = 9 + u
//! - `Fq12 = Fq6[w] / (w² - v)`
//!
//! Arithmetic is not constant time. Every value handled by a verifier is
//! public.

pub mod fp;
pub mod fq12;
pub mod fq2;
pub mod fq6;

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

pub use fp::{Fp, FieldParams, Fq, FqParams, Fr, FrParams};
pub use fq12::Fq12;
pub use fq2::Fq2;
pub use fq6::Fq6;

/// Operations shared by every field in the tower.
pub trait Field:
    'static
    + Copy
    + Clone
    + Debug
    + PartialEq
    + Eq
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + SubAssign
    + MulAssign
{
    fn zero() -> Self;

    fn one() -> Self;

    fn is_zero(&self) -> bool;

    fn is_one(&self) -> bool {
        *self == Self::one()
    }

    /// Squaring. Implementations use a dedicated formula that is cheaper
    /// than a general multiplication.
    fn square(&self) -> Self;

    fn double(&self) -> Self {
        *self + *self
    }

    /// Multiplicative inverse, `None` for zero.
    fn inverse(&self) -> Option<Self>;

    /// Square-and-multiply by an exponent given as little-endian u64 limbs.
    fn pow(&self, exp: &[u64]) -> Self {
        let mut res = Self::one();
        for limb in exp.iter().rev() {
            for i in (0..64).rev() {
                res = res.square();
                if (limb >> i) & 1 == 1 {
                    res *= *self;
                }
            }
        }
        res
    }

    fn pow_u64(&self, exp: u64) -> Self {
        self.pow(&[exp])
    }
}
