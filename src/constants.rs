//! BN254 Curve Parameters
//!
//! Fixed parameters are compile-time constants. Values derived from them
//! (Frobenius coefficients, the final-exponentiation exponent) are computed
//! on first use and cached for the life of the process.

use num_bigint::BigUint;
use std::sync::OnceLock;

use crate::field::fp::{div_small, sub_limbs};
use crate::field::{Field, Fq, Fq2, Fr};

/// The BN parameter x. p and r are polynomials in x.
pub const BN_X: u64 = 4965661367192848881;

/// Optimal-ate Miller loop length, 6x + 2.
pub const ATE_LOOP_COUNT: u128 = 6 * BN_X as u128 + 2;

/// Two-adicity of the scalar field: 2^28 divides r - 1.
pub const FR_TWO_ADICITY: u32 = Fr::TWO_ADICITY;

/// Base field modulus p, little-endian limbs.
pub const FQ_MODULUS: [u64; 4] = Fq::MODULUS;

/// Group order r, little-endian limbs.
pub const FR_MODULUS: [u64; 4] = Fr::MODULUS;

/// b in y² = x³ + b for G1.
pub const G1_COEFF_B: Fq = Fq::from_u64(3);

pub const G1_GENERATOR_X: Fq = Fq::from_u64(1);
pub const G1_GENERATOR_Y: Fq = Fq::from_u64(2);

/// b' = 3 / (9 + u) for the sextic twist carrying G2.
pub const G2_COEFF_B: Fq2 = Fq2::new(
    Fq::from_raw([
        0x3267e6dc24a138e5,
        0xb5b4c5e559dbefa3,
        0x81be18991be06ac3,
        0x2b149d40ceb8aaae,
    ]),
    Fq::from_raw([
        0xe4a2bd0685c315d2,
        0xa74fa084e52d1852,
        0xcd2cafadeed8fdf4,
        0x009713b03af0fed4,
    ]),
);

pub const G2_GENERATOR_X: Fq2 = Fq2::new(
    Fq::from_raw([
        0x46debd5cd992f6ed,
        0x674322d4f75edadd,
        0x426a00665e5c4479,
        0x1800deef121f1e76,
    ]),
    Fq::from_raw([
        0x97e485b7aef312c2,
        0xf1aa493335a9e712,
        0x7260bfb731fb5d25,
        0x198e9393920d483a,
    ]),
);

pub const G2_GENERATOR_Y: Fq2 = Fq2::new(
    Fq::from_raw([
        0x4ce6cc0166fa7daa,
        0xe3d1e7690c43d37b,
        0x4aab71808dcb408f,
        0x12c85ea5db8c6deb,
    ]),
    Fq::from_raw([
        0x55acdadcd122975b,
        0xbc4b313370b38ef3,
        0xec9e99ad690c3395,
        0x090689d0585ff075,
    ]),
);

/// The sextic non-residue ξ = 9 + u.
pub fn xi() -> Fq2 {
    Fq2::new(Fq::from_u64(9), Fq::one())
}

/// `γ^k` for k = 0..6, where γ = ξ^((p-1)/6).
///
/// Raising to p maps w to γ·w, so these scale the tower coefficients in
/// every Frobenius map and in the twisted Frobenius on G2.
pub fn frobenius_coeffs() -> &'static [Fq2; 6] {
    static COEFFS: OnceLock<[Fq2; 6]> = OnceLock::new();
    COEFFS.get_or_init(|| {
        let exp = div_small(&sub_limbs(&FQ_MODULUS, &[1, 0, 0, 0]).0, 6);
        let gamma = xi().pow(&exp);
        let mut coeffs = [Fq2::one(); 6];
        for k in 1..6 {
            coeffs[k] = coeffs[k - 1] * gamma;
        }
        coeffs
    })
}

pub(crate) fn limbs_to_biguint(limbs: &[u64]) -> BigUint {
    limbs
        .iter()
        .rev()
        .fold(BigUint::default(), |acc, limb| (acc << 64u32) + *limb)
}

/// `(p⁴ - p² + 1) / r` as little-endian u64 limbs: the hard part of the
/// final exponentiation.
pub fn final_exponent_hard_part() -> &'static [u64] {
    static EXP: OnceLock<Vec<u64>> = OnceLock::new();
    EXP.get_or_init(|| {
        let p = limbs_to_biguint(&FQ_MODULUS);
        let r = limbs_to_biguint(&FR_MODULUS);
        let p2 = &p * &p;
        let p4 = &p2 * &p2;
        let exp = (p4 - &p2 + 1u32) / &r;
        exp.to_u64_digits()
    })
}
