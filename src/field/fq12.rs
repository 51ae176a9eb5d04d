//! Quadratic extension `Fq12 = Fq6[w] / (w² - v)`, the pairing target field.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use super::{Field, Fq2, Fq6};
use crate::constants::frobenius_coeffs;

/// `c0 + c1·w`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Fq12 {
    pub c0: Fq6,
    pub c1: Fq6,
}

impl Fq12 {
    pub const fn new(c0: Fq6, c1: Fq6) -> Self {
        Fq12 { c0, c1 }
    }

    /// `c0 - c1·w`, equal to `self^(p^6)`. On the cyclotomic subgroup this
    /// is the inverse.
    pub fn conjugate(&self) -> Self {
        Fq12::new(self.c0, -self.c1)
    }

    /// `self^(p^power)`
    pub fn frobenius_map(&self, power: usize) -> Self {
        let gamma = frobenius_coeffs();
        let mut res = *self;
        for _ in 0..power {
            let c0 = res.c0.frobenius_map(1);
            let c1 = res.c1.frobenius_map(1).mul_by_fq2(&gamma[1]);
            res = Fq12::new(c0, c1);
        }
        res
    }

    /// Multiply by a sparse element with non-zero coefficients only at
    /// `1`, `w` and `w³`. Line functions evaluated at a G1 point have this
    /// shape.
    pub fn mul_by_034(&self, c0: &Fq2, c3: &Fq2, c4: &Fq2) -> Self {
        let a = self.c0.mul_by_fq2(c0);
        let b = self.c1.mul_by_01(c3, c4);
        let e = (self.c0 + self.c1).mul_by_01(&(*c0 + *c3), c4);

        Fq12::new(b.mul_by_nonresidue() + a, e - (a + b))
    }

    /// Granger–Scott squaring, valid only for elements of the cyclotomic
    /// subgroup (norm 1 over Fq6).
    pub fn cyclotomic_square(&self) -> Self {
        let r0 = self.c0.c0;
        let r4 = self.c0.c1;
        let r3 = self.c0.c2;
        let r2 = self.c1.c0;
        let r1 = self.c1.c1;
        let r5 = self.c1.c2;

        // (r0 + r1·s)², (r2 + r3·s)², (r4 + r5·s)² over Fq4 = Fq2[s]/(s² - ξ)
        let fq4_square = |a: Fq2, b: Fq2| {
            let tmp = a * b;
            let t0 = (a + b) * (b.mul_by_nonresidue() + a) - tmp - tmp.mul_by_nonresidue();
            (t0, tmp.double())
        };
        let (t0, t1) = fq4_square(r0, r1);
        let (t2, t3) = fq4_square(r2, r3);
        let (t4, t5) = fq4_square(r4, r5);

        let z0 = (t0 - r0).double() + t0;
        let z1 = (t1 + r1).double() + t1;

        let t5_nr = t5.mul_by_nonresidue();
        let z2 = (r2 + t5_nr).double() + t5_nr;
        let z3 = (t4 - r3).double() + t4;

        let z4 = (t2 - r4).double() + t2;
        let z5 = (r5 + t3).double() + t3;

        Fq12::new(Fq6::new(z0, z4, z3), Fq6::new(z2, z1, z5))
    }

    /// Exponentiation for elements of the cyclotomic subgroup.
    pub fn cyclotomic_exp(&self, exp: &[u64]) -> Self {
        let mut res = Fq12::one();
        for limb in exp.iter().rev() {
            for i in (0..64).rev() {
                res = res.cyclotomic_square();
                if (limb >> i) & 1 == 1 {
                    res *= *self;
                }
            }
        }
        res
    }
}

impl Field for Fq12 {
    fn zero() -> Self {
        Fq12::new(Fq6::zero(), Fq6::zero())
    }

    fn one() -> Self {
        Fq12::new(Fq6::one(), Fq6::zero())
    }

    fn is_zero(&self) -> bool {
        self.c0.is_zero() && self.c1.is_zero()
    }

    /// (a + bw)² = (a + b)(a + vb) - ab - v·ab + 2ab·w
    fn square(&self) -> Self {
        let ab = self.c0 * self.c1;
        let c0 = (self.c0 + self.c1) * (self.c0 + self.c1.mul_by_nonresidue())
            - ab
            - ab.mul_by_nonresidue();
        Fq12::new(c0, ab.double())
    }

    /// (a + bw)⁻¹ = (a - bw) / (a² - v·b²)
    fn inverse(&self) -> Option<Self> {
        let t = (self.c0.square() - self.c1.square().mul_by_nonresidue()).inverse()?;
        Some(Fq12::new(self.c0 * t, -(self.c1 * t)))
    }
}

impl Add for Fq12 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Fq12::new(self.c0 + rhs.c0, self.c1 + rhs.c1)
    }
}

impl Sub for Fq12 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Fq12::new(self.c0 - rhs.c0, self.c1 - rhs.c1)
    }
}

impl Mul for Fq12 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let aa = self.c0 * rhs.c0;
        let bb = self.c1 * rhs.c1;
        let c1 = (self.c0 + self.c1) * (rhs.c0 + rhs.c1) - aa - bb;
        Fq12::new(aa + bb.mul_by_nonresidue(), c1)
    }
}

impl Neg for Fq12 {
    type Output = Self;
    fn neg(self) -> Self {
        Fq12::new(-self.c0, -self.c1)
    }
}

impl AddAssign for Fq12 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fq12 {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fq12 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
