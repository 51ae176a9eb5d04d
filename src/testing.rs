//! Shared test fixtures.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::curve::{G1Affine, G1Projective, G2Affine, G2Projective};
use crate::field::{Fq, Fq12, Fq2, Fq6, Fr};

pub fn test_rng() -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(0x5eed_0254)
}

fn random_bytes<R: RngCore>(rng: &mut R) -> [u8; 48] {
    let mut bytes = [0u8; 48];
    rng.fill_bytes(&mut bytes);
    bytes
}

pub fn random_fq<R: RngCore>(rng: &mut R) -> Fq {
    Fq::from_bytes_be_mod_order(&random_bytes(rng))
}

pub fn random_fr<R: RngCore>(rng: &mut R) -> Fr {
    Fr::from_bytes_be_mod_order(&random_bytes(rng))
}

pub fn random_fq2<R: RngCore>(rng: &mut R) -> Fq2 {
    Fq2::new(random_fq(rng), random_fq(rng))
}

pub fn random_fq6<R: RngCore>(rng: &mut R) -> Fq6 {
    Fq6::new(random_fq2(rng), random_fq2(rng), random_fq2(rng))
}

pub fn random_fq12<R: RngCore>(rng: &mut R) -> Fq12 {
    Fq12::new(random_fq6(rng), random_fq6(rng))
}

pub fn random_g1<R: RngCore>(rng: &mut R) -> G1Affine {
    (G1Projective::generator() * random_fr(rng)).to_affine()
}

pub fn random_g2<R: RngCore>(rng: &mut R) -> G2Affine {
    (G2Projective::generator() * random_fr(rng)).to_affine()
}

/// `k·G1`
pub fn g1_mul(k: Fr) -> G1Affine {
    (G1Projective::generator() * k).to_affine()
}

/// `k·G2`
pub fn g2_mul(k: Fr) -> G2Affine {
    (G2Projective::generator() * k).to_affine()
}
