//! G2: the order-r subgroup of the sextic twist `y² = x³ + 3/ξ` over Fq2.

use super::{G2Affine, SwCurve};
use crate::constants::{frobenius_coeffs, G2_COEFF_B, G2_GENERATOR_X, G2_GENERATOR_Y};
use crate::field::Fq2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct G2Config;

impl SwCurve for G2Config {
    type Base = Fq2;

    // The twist has a large cofactor; G2 inputs always need [r]P = O.
    const COFACTOR_IS_ONE: bool = false;

    const COEFF_B: Fq2 = G2_COEFF_B;

    const GENERATOR: (Fq2, Fq2) = (G2_GENERATOR_X, G2_GENERATOR_Y);
}

impl G2Affine {
    /// The p-power Frobenius carried through the twist:
    /// `π(x, y) = (x̄·γ², ȳ·γ³)`.
    pub fn frobenius(&self) -> Self {
        if self.infinity {
            return *self;
        }
        let gamma = frobenius_coeffs();
        Self::new_unchecked(
            self.x.conjugate() * gamma[2],
            self.y.conjugate() * gamma[3],
        )
    }
}
