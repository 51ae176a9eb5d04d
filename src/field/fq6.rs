//! Cubic extension `Fq6 = Fq2[v] / (v³ - ξ)`.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use super::{Field, Fq2};
use crate::constants::frobenius_coeffs;

/// `c0 + c1·v + c2·v²`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Fq6 {
    pub c0: Fq2,
    pub c1: Fq2,
    pub c2: Fq2,
}

impl Fq6 {
    pub const fn new(c0: Fq2, c1: Fq2, c2: Fq2) -> Self {
        Fq6 { c0, c1, c2 }
    }

    /// Multiply by v: (c0, c1, c2) -> (ξ·c2, c0, c1)
    pub fn mul_by_nonresidue(&self) -> Self {
        Fq6::new(self.c2.mul_by_nonresidue(), self.c0, self.c1)
    }

    /// Multiply by the sparse element `b0 + b1·v`.
    pub fn mul_by_01(&self, b0: &Fq2, b1: &Fq2) -> Self {
        let a_a = self.c0 * *b0;
        let b_b = self.c1 * *b1;

        let t1 = ((self.c1 + self.c2) * *b1 - b_b).mul_by_nonresidue() + a_a;
        let t2 = (*b0 + *b1) * (self.c0 + self.c1) - a_a - b_b;
        let t3 = (self.c0 + self.c2) * *b0 - a_a + b_b;

        Fq6::new(t1, t2, t3)
    }

    pub fn mul_by_fq2(&self, k: &Fq2) -> Self {
        Fq6::new(self.c0 * *k, self.c1 * *k, self.c2 * *k)
    }

    /// `self^(p^power)`
    pub fn frobenius_map(&self, power: usize) -> Self {
        let gamma = frobenius_coeffs();
        let mut res = *self;
        for _ in 0..power {
            res = Fq6::new(
                res.c0.conjugate(),
                res.c1.conjugate() * gamma[2],
                res.c2.conjugate() * gamma[4],
            );
        }
        res
    }
}

impl Field for Fq6 {
    fn zero() -> Self {
        Fq6::new(Fq2::zero(), Fq2::zero(), Fq2::zero())
    }

    fn one() -> Self {
        Fq6::new(Fq2::one(), Fq2::zero(), Fq2::zero())
    }

    fn is_zero(&self) -> bool {
        self.c0.is_zero() && self.c1.is_zero() && self.c2.is_zero()
    }

    /// Chung–Hasan SQR2.
    fn square(&self) -> Self {
        let s0 = self.c0.square();
        let s1 = (self.c0 * self.c1).double();
        let s2 = (self.c0 - self.c1 + self.c2).square();
        let s3 = (self.c1 * self.c2).double();
        let s4 = self.c2.square();

        Fq6::new(
            s0 + s3.mul_by_nonresidue(),
            s1 + s4.mul_by_nonresidue(),
            s1 + s2 + s3 - s0 - s4,
        )
    }

    fn inverse(&self) -> Option<Self> {
        let t0 = self.c0.square() - (self.c1 * self.c2).mul_by_nonresidue();
        let t1 = self.c2.square().mul_by_nonresidue() - self.c0 * self.c1;
        let t2 = self.c1.square() - self.c0 * self.c2;

        let det = self.c0 * t0 + (self.c2 * t1 + self.c1 * t2).mul_by_nonresidue();
        let inv = det.inverse()?;

        Some(Fq6::new(t0 * inv, t1 * inv, t2 * inv))
    }
}

impl Add for Fq6 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Fq6::new(self.c0 + rhs.c0, self.c1 + rhs.c1, self.c2 + rhs.c2)
    }
}

impl Sub for Fq6 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Fq6::new(self.c0 - rhs.c0, self.c1 - rhs.c1, self.c2 - rhs.c2)
    }
}

impl Mul for Fq6 {
    type Output = Self;
    /// Karatsuba over Fq2: six multiplications.
    fn mul(self, rhs: Self) -> Self {
        let (a0, a1, a2) = (self.c0, self.c1, self.c2);
        let (b0, b1, b2) = (rhs.c0, rhs.c1, rhs.c2);

        let v0 = a0 * b0;
        let v1 = a1 * b1;
        let v2 = a2 * b2;

        let c0 = ((a1 + a2) * (b1 + b2) - v1 - v2).mul_by_nonresidue() + v0;
        let c1 = (a0 + a1) * (b0 + b1) - v0 - v1 + v2.mul_by_nonresidue();
        let c2 = (a0 + a2) * (b0 + b2) - v0 - v2 + v1;

        Fq6::new(c0, c1, c2)
    }
}

impl Neg for Fq6 {
    type Output = Self;
    fn neg(self) -> Self {
        Fq6::new(-self.c0, -self.c1, -self.c2)
    }
}

impl AddAssign for Fq6 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fq6 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fq6 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
