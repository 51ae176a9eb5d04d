//! Quadratic extension `Fq2 = Fq[u] / (u² + 1)`.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use super::{Field, Fq};

/// `c0 + c1·u`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Fq2 {
    pub c0: Fq,
    pub c1: Fq,
}

impl Fq2 {
    pub const fn new(c0: Fq, c1: Fq) -> Self {
        Fq2 { c0, c1 }
    }

    /// Embed a base-field element.
    pub fn from_base(c0: Fq) -> Self {
        Fq2 { c0, c1: Fq::zero() }
    }

    /// `c0 - c1·u`, which is also the p-power Frobenius.
    pub fn conjugate(&self) -> Self {
        Fq2::new(self.c0, -self.c1)
    }

    pub fn frobenius_map(&self, power: usize) -> Self {
        if power % 2 == 1 {
            self.conjugate()
        } else {
            *self
        }
    }

    /// Multiply by ξ = 9 + u, the non-residue of the sextic extension.
    pub fn mul_by_nonresidue(&self) -> Self {
        let nine_c0 = self.c0.double().double().double() + self.c0;
        let nine_c1 = self.c1.double().double().double() + self.c1;
        Fq2::new(nine_c0 - self.c1, self.c0 + nine_c1)
    }

    pub fn mul_by_base(&self, k: &Fq) -> Self {
        Fq2::new(self.c0 * *k, self.c1 * *k)
    }

    /// `c0² + c1²`
    pub fn norm(&self) -> Fq {
        self.c0.square() + self.c1.square()
    }

    /// Square root by the norm method. Returns `None` for non-residues.
    pub fn sqrt(&self) -> Option<Self> {
        if self.c1.is_zero() {
            if let Some(s) = self.c0.sqrt() {
                return Some(Fq2::from_base(s));
            }
            // (s·u)² = -s²
            return (-self.c0).sqrt().map(|s| Fq2::new(Fq::zero(), s));
        }

        let alpha = self.norm().sqrt()?;
        let two_inv = Fq::from_u64(2).inverse()?;
        let x0 = match ((self.c0 + alpha) * two_inv).sqrt() {
            Some(x0) => x0,
            None => ((self.c0 - alpha) * two_inv).sqrt()?,
        };
        let x1 = self.c1 * x0.double().inverse()?;

        let candidate = Fq2::new(x0, x1);
        if candidate.square() == *self {
            Some(candidate)
        } else {
            None
        }
    }

    /// Ordering used by compressed point encodings: compare `c1`, or `c0`
    /// when `c1` is zero.
    pub fn lexicographically_largest(&self) -> bool {
        if self.c1.is_zero() {
            self.c0.lexicographically_largest()
        } else {
            self.c1.lexicographically_largest()
        }
    }
}

impl Field for Fq2 {
    fn zero() -> Self {
        Fq2::new(Fq::zero(), Fq::zero())
    }

    fn one() -> Self {
        Fq2::new(Fq::one(), Fq::zero())
    }

    fn is_zero(&self) -> bool {
        self.c0.is_zero() && self.c1.is_zero()
    }

    /// (a + bu)² = (a + b)(a - b) + 2ab·u
    fn square(&self) -> Self {
        let ab = self.c0 * self.c1;
        Fq2::new((self.c0 + self.c1) * (self.c0 - self.c1), ab.double())
    }

    /// (a + bu)⁻¹ = (a - bu) / (a² + b²)
    fn inverse(&self) -> Option<Self> {
        let t = self.norm().inverse()?;
        Some(Fq2::new(self.c0 * t, -(self.c1 * t)))
    }
}

impl Add for Fq2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Fq2::new(self.c0 + rhs.c0, self.c1 + rhs.c1)
    }
}

impl Sub for Fq2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Fq2::new(self.c0 - rhs.c0, self.c1 - rhs.c1)
    }
}

impl Mul for Fq2 {
    type Output = Self;
    /// Karatsuba: three base multiplications.
    fn mul(self, rhs: Self) -> Self {
        let v0 = self.c0 * rhs.c0;
        let v1 = self.c1 * rhs.c1;
        let c1 = (self.c0 + self.c1) * (rhs.c0 + rhs.c1) - v0 - v1;
        Fq2::new(v0 - v1, c1)
    }
}

impl Neg for Fq2 {
    type Output = Self;
    fn neg(self) -> Self {
        Fq2::new(-self.c0, -self.c1)
    }
}

impl AddAssign for Fq2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fq2 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fq2 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
