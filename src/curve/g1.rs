//! G1: `y² = x³ + 3` over Fq.

use super::SwCurve;
use crate::constants::{G1_COEFF_B, G1_GENERATOR_X, G1_GENERATOR_Y};
use crate::field::Fq;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct G1Config;

impl SwCurve for G1Config {
    type Base = Fq;

    // #E(Fq) = r
    const COFACTOR_IS_ONE: bool = true;

    const COEFF_B: Fq = G1_COEFF_B;

    const GENERATOR: (Fq, Fq) = (G1_GENERATOR_X, G1_GENERATOR_Y);
}

#[cfg(test)]
mod tests {
    use crate::curve::{G1Affine, G1Projective};
    use crate::field::{Field, Fq, Fr};
    use crate::testing::{random_fr, test_rng};
    use ark_ec::{CurveGroup, Group};
    use ark_ff::PrimeField;
    use ark_std::{UniformRand, Zero};

    fn to_ark_fr(a: &Fr) -> ark_bn254::Fr {
        ark_bn254::Fr::from_bigint(ark_ff::BigInt::new(a.to_canonical_limbs())).unwrap()
    }

    fn from_ark_fr(a: &ark_bn254::Fr) -> Fr {
        Fr::from_canonical_limbs(a.into_bigint().0).unwrap()
    }

    fn from_ark_fq(a: &ark_bn254::Fq) -> Fq {
        Fq::from_canonical_limbs(a.into_bigint().0).unwrap()
    }

    #[test]
    fn test_scalar_mul_matches_arkworks() {
        let mut rng = test_rng();
        for _ in 0..5 {
            let k = random_fr(&mut rng);
            let ours = (G1Projective::generator() * k).to_affine();
            let theirs = (ark_bn254::G1Projective::generator() * to_ark_fr(&k)).into_affine();
            assert_eq!(ours.x, from_ark_fq(&theirs.x));
            assert_eq!(ours.y, from_ark_fq(&theirs.y));
        }
    }

    #[test]
    fn test_msm_matches_arkworks() {
        let mut rng = test_rng();
        let scalars: Vec<ark_bn254::Fr> = (0..3).map(|_| ark_bn254::Fr::rand(&mut rng)).collect();
        let theirs = scalars
            .iter()
            .fold(ark_bn254::G1Projective::zero(), |acc, k| {
                acc + ark_bn254::G1Projective::generator() * k * k
            })
            .into_affine();

        let points: Vec<G1Affine> = scalars
            .iter()
            .map(|k| (G1Projective::generator() * from_ark_fr(k)).to_affine())
            .collect();
        let ours_scalars: Vec<Fr> = scalars.iter().map(from_ark_fr).collect();
        let ours = G1Projective::msm(&points, &ours_scalars).to_affine();

        assert_eq!(ours.x, from_ark_fq(&theirs.x));
        assert_eq!(ours.y, from_ark_fq(&theirs.y));
    }

    #[test]
    fn test_off_curve_point() {
        let p = G1Affine::new_unchecked(Fq::one(), Fq::from_u64(3));
        assert!(!p.is_on_curve());
    }
}
