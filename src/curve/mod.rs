//! BN254 Elliptic Curve Groups
//!
//! Both pairing groups are short-Weierstrass curves with a = 0:
//!
//! - G1: `y² = x³ + 3` over Fq, prime order r (cofactor 1)
//! - G2: `y² = x³ + 3/ξ` over Fq2, the order-r subgroup of the sextic twist
//!
//! Points are generic over a [`SwCurve`] configuration so both groups share
//! one implementation of the group law.
//!
//! # Encoding Sizes
//! - G1 points: 32 bytes (compressed) or 64 bytes (uncompressed)
//! - G2 points: 64 bytes (compressed) or 128 bytes (uncompressed)

pub mod encoding;
pub mod g1;
pub mod g2;

use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::constants::FR_MODULUS;
use crate::field::{Field, Fr};

pub use g1::G1Config;
pub use g2::G2Config;

/// Parameters of a curve `y² = x³ + b`.
pub trait SwCurve: 'static + Copy + Clone + Debug + PartialEq + Eq + Send + Sync {
    type Base: Field;

    /// Every point on the curve is in the prime-order subgroup, so the
    /// subgroup check can be skipped after the curve check.
    const COFACTOR_IS_ONE: bool;

    const COEFF_B: Self::Base;

    const GENERATOR: (Self::Base, Self::Base);
}

/// G1 point in affine coordinates
pub type G1Affine = Affine<G1Config>;

/// G1 point in Jacobian coordinates (for efficient arithmetic)
pub type G1Projective = Jacobian<G1Config>;

/// G2 point in affine coordinates
pub type G2Affine = Affine<G2Config>;

/// G2 point in Jacobian coordinates
pub type G2Projective = Jacobian<G2Config>;

/// A point in affine coordinates with an explicit infinity flag.
#[derive(Clone, Copy, Debug)]
pub struct Affine<C: SwCurve> {
    pub x: C::Base,
    pub y: C::Base,
    pub infinity: bool,
}

/// A point `(X / Z², Y / Z³)`. Z = 0 is the point at infinity.
#[derive(Clone, Copy, Debug)]
pub struct Jacobian<C: SwCurve> {
    pub x: C::Base,
    pub y: C::Base,
    pub z: C::Base,
}

// ============================================================================
// Affine
// ============================================================================

impl<C: SwCurve> Affine<C> {
    /// Build a point without checking the curve equation.
    pub fn new_unchecked(x: C::Base, y: C::Base) -> Self {
        Affine {
            x,
            y,
            infinity: false,
        }
    }

    pub fn identity() -> Self {
        Affine {
            x: C::Base::zero(),
            y: C::Base::one(),
            infinity: true,
        }
    }

    pub fn generator() -> Self {
        let (x, y) = C::GENERATOR;
        Self::new_unchecked(x, y)
    }

    pub fn is_identity(&self) -> bool {
        self.infinity
    }

    /// `y² = x³ + b`. The point at infinity is on the curve.
    pub fn is_on_curve(&self) -> bool {
        if self.infinity {
            return true;
        }
        self.y.square() == self.x.square() * self.x + C::COEFF_B
    }

    /// `[r]P = O`. Assumes the point is on the curve.
    pub fn is_in_subgroup(&self) -> bool {
        self.to_projective().mul_limbs(&FR_MODULUS).is_identity()
    }

    pub fn to_projective(&self) -> Jacobian<C> {
        if self.infinity {
            Jacobian::identity()
        } else {
            Jacobian {
                x: self.x,
                y: self.y,
                z: C::Base::one(),
            }
        }
    }

    pub fn scalar_mul(&self, scalar: &Fr) -> Jacobian<C> {
        self.to_projective().scalar_mul(scalar)
    }
}

impl<C: SwCurve> PartialEq for Affine<C> {
    fn eq(&self, other: &Self) -> bool {
        match (self.infinity, other.infinity) {
            (true, true) => true,
            (false, false) => self.x == other.x && self.y == other.y,
            _ => false,
        }
    }
}

impl<C: SwCurve> Eq for Affine<C> {}

impl<C: SwCurve> Neg for Affine<C> {
    type Output = Self;
    fn neg(self) -> Self {
        if self.infinity {
            self
        } else {
            Self::new_unchecked(self.x, -self.y)
        }
    }
}

impl<C: SwCurve> Default for Affine<C> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<C: SwCurve> From<Jacobian<C>> for Affine<C> {
    fn from(p: Jacobian<C>) -> Self {
        p.to_affine()
    }
}

// ============================================================================
// Jacobian
// ============================================================================

impl<C: SwCurve> Jacobian<C> {
    pub fn identity() -> Self {
        Jacobian {
            x: C::Base::one(),
            y: C::Base::one(),
            z: C::Base::zero(),
        }
    }

    pub fn generator() -> Self {
        Affine::<C>::generator().to_projective()
    }

    pub fn is_identity(&self) -> bool {
        self.z.is_zero()
    }

    /// Normalize with a single inversion.
    pub fn to_affine(&self) -> Affine<C> {
        if self.is_identity() {
            return Affine::identity();
        }
        match self.z.inverse() {
            Some(z_inv) => {
                let z_inv2 = z_inv.square();
                Affine::new_unchecked(self.x * z_inv2, self.y * z_inv2 * z_inv)
            }
            None => Affine::identity(),
        }
    }

    /// dbl-2009-l
    pub fn double(&self) -> Self {
        if self.is_identity() {
            return *self;
        }

        let a = self.x.square();
        let b = self.y.square();
        let c = b.square();
        let d = ((self.x + b).square() - a - c).double();
        let e = a.double() + a;
        let f = e.square();

        let x3 = f - d.double();
        let y3 = e * (d - x3) - c.double().double().double();
        let z3 = (self.y * self.z).double();

        Jacobian {
            x: x3,
            y: y3,
            z: z3,
        }
    }

    /// Double-and-add over a scalar given as little-endian u64 limbs,
    /// most significant bit first.
    pub fn mul_limbs(&self, scalar: &[u64]) -> Self {
        let mut res = Self::identity();
        for limb in scalar.iter().rev() {
            for i in (0..64).rev() {
                res = res.double();
                if (limb >> i) & 1 == 1 {
                    res += *self;
                }
            }
        }
        res
    }

    pub fn scalar_mul(&self, scalar: &Fr) -> Self {
        self.mul_limbs(&scalar.to_canonical_limbs())
    }

    /// Σ scalars[i]·points[i]
    pub fn msm(points: &[Affine<C>], scalars: &[Fr]) -> Self {
        points
            .iter()
            .zip(scalars)
            .fold(Self::identity(), |acc, (p, s)| acc + p.scalar_mul(s))
    }
}

impl<C: SwCurve> PartialEq for Jacobian<C> {
    /// Compare `X₁Z₂² = X₂Z₁²` and `Y₁Z₂³ = Y₂Z₁³`.
    fn eq(&self, other: &Self) -> bool {
        match (self.is_identity(), other.is_identity()) {
            (true, true) => true,
            (false, false) => {
                let z1z1 = self.z.square();
                let z2z2 = other.z.square();
                self.x * z2z2 == other.x * z1z1
                    && self.y * z2z2 * other.z == other.y * z1z1 * self.z
            }
            _ => false,
        }
    }
}

impl<C: SwCurve> Eq for Jacobian<C> {}

impl<C: SwCurve> Add for Jacobian<C> {
    type Output = Self;

    /// add-2007-bl
    fn add(self, rhs: Self) -> Self {
        if self.is_identity() {
            return rhs;
        }
        if rhs.is_identity() {
            return self;
        }

        let z1z1 = self.z.square();
        let z2z2 = rhs.z.square();
        let u1 = self.x * z2z2;
        let u2 = rhs.x * z1z1;
        let s1 = self.y * rhs.z * z2z2;
        let s2 = rhs.y * self.z * z1z1;

        let h = u2 - u1;
        let r = (s2 - s1).double();
        if h.is_zero() {
            return if r.is_zero() {
                self.double()
            } else {
                Self::identity()
            };
        }

        let i = h.double().square();
        let j = h * i;
        let v = u1 * i;

        let x3 = r.square() - j - v.double();
        let y3 = r * (v - x3) - (s1 * j).double();
        let z3 = ((self.z + rhs.z).square() - z1z1 - z2z2) * h;

        Jacobian {
            x: x3,
            y: y3,
            z: z3,
        }
    }
}

impl<C: SwCurve> Sub for Jacobian<C> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl<C: SwCurve> Neg for Jacobian<C> {
    type Output = Self;
    fn neg(self) -> Self {
        Jacobian {
            x: self.x,
            y: -self.y,
            z: self.z,
        }
    }
}

impl<C: SwCurve> AddAssign for Jacobian<C> {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<C: SwCurve> SubAssign for Jacobian<C> {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<C: SwCurve> Mul<Fr> for Jacobian<C> {
    type Output = Self;
    fn mul(self, rhs: Fr) -> Self {
        self.scalar_mul(&rhs)
    }
}

impl<C: SwCurve> Mul<Jacobian<C>> for Fr {
    type Output = Jacobian<C>;
    fn mul(self, rhs: Jacobian<C>) -> Jacobian<C> {
        rhs.scalar_mul(&self)
    }
}

impl<C: SwCurve> From<Affine<C>> for Jacobian<C> {
    fn from(p: Affine<C>) -> Self {
        p.to_projective()
    }
}

impl<C: SwCurve> Default for Jacobian<C> {
    fn default() -> Self {
        Self::identity()
    }
}
