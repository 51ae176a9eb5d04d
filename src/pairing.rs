//! Optimal Ate Pairing
//!
//! e: G1 × G2 → GT ⊂ Fq12*, computed as a Miller loop over the bits of
//! 6x + 2 followed by the final exponentiation by (p¹² - 1) / r.
//!
//! Line functions are computed in affine coordinates on the twist and
//! evaluated at the G1 point as sparse Fq12 elements. Lines depend only on
//! the G2 point, so they are precomputed once in [`G2Prepared`] and reused
//! across verifications.

use serde::Serialize;
use std::ops::Mul;

use crate::constants::{final_exponent_hard_part, ATE_LOOP_COUNT};
use crate::curve::{G1Affine, G2Affine};
use crate::error::{Result, VerifierError};
use crate::field::{Field, Fq12, Fq2, Fr};

const ATE_LOOP_BITS: usize = (128 - ATE_LOOP_COUNT.leading_zeros()) as usize;

/// Target group element (result of pairing)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Gt(pub Fq12);

impl Gt {
    pub fn identity() -> Self {
        Gt(Fq12::one())
    }

    pub fn is_identity(&self) -> bool {
        self.0.is_one()
    }

    /// GT lies in the cyclotomic subgroup, so inversion is conjugation.
    pub fn inverse(&self) -> Self {
        Gt(self.0.conjugate())
    }

    pub fn pow(&self, exp: &Fr) -> Self {
        Gt(self.0.cyclotomic_exp(&exp.to_canonical_limbs()))
    }
}

impl Mul for Gt {
    type Output = Gt;
    fn mul(self, rhs: Gt) -> Gt {
        Gt(self.0 * rhs.0)
    }
}

/// The line through T with slope λ, evaluated at P = (xP, yP), is
/// `yP - λ·xP·w + (λ·xT - yT)·w³`. Only λ and `λ·xT - yT` depend on T.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct LineCoeffs {
    lambda: Fq2,
    c4: Fq2,
}

impl LineCoeffs {
    fn through(t: &G2Affine, lambda: Fq2) -> Self {
        LineCoeffs {
            lambda,
            c4: lambda * t.x - t.y,
        }
    }
}

/// A G2 point with the line coefficients of every Miller-loop step.
///
/// `None` marks a vertical line. Its value at P lies in Fq6 and is erased
/// by the final exponentiation, so it is skipped.
#[derive(Clone, Debug)]
pub struct G2Prepared {
    lines: Vec<Option<LineCoeffs>>,
    infinity: bool,
}

/// T ← 2T, returning the tangent at T.
fn doubling_step(t: &mut G2Affine) -> Option<LineCoeffs> {
    if t.infinity {
        return None;
    }
    let Some(inv) = t.y.double().inverse() else {
        *t = G2Affine::identity();
        return None;
    };
    let x_sq = t.x.square();
    let lambda = (x_sq.double() + x_sq) * inv;
    let line = LineCoeffs::through(t, lambda);

    let x3 = lambda.square() - t.x.double();
    let y3 = lambda * (t.x - x3) - t.y;
    *t = G2Affine::new_unchecked(x3, y3);
    Some(line)
}

/// T ← T + Q, returning the chord through T and Q.
fn addition_step(t: &mut G2Affine, q: &G2Affine) -> Option<LineCoeffs> {
    if t.infinity {
        *t = *q;
        return None;
    }
    let Some(inv) = (q.x - t.x).inverse() else {
        if t.y == q.y {
            return doubling_step(t);
        }
        *t = G2Affine::identity();
        return None;
    };
    let lambda = (q.y - t.y) * inv;
    let line = LineCoeffs::through(t, lambda);

    let x3 = lambda.square() - t.x - q.x;
    let y3 = lambda * (t.x - x3) - t.y;
    *t = G2Affine::new_unchecked(x3, y3);
    Some(line)
}

impl From<G2Affine> for G2Prepared {
    fn from(q: G2Affine) -> Self {
        if q.infinity {
            return G2Prepared {
                lines: Vec::new(),
                infinity: true,
            };
        }

        let mut lines = Vec::with_capacity(2 * ATE_LOOP_BITS);
        let mut t = q;
        for i in (0..ATE_LOOP_BITS - 1).rev() {
            lines.push(doubling_step(&mut t));
            if (ATE_LOOP_COUNT >> i) & 1 == 1 {
                lines.push(addition_step(&mut t, &q));
            }
        }

        // Q₁ = π(Q), Q₂ = π²(Q); finish with T + Q₁ - Q₂
        let q1 = q.frobenius();
        let minus_q2 = -q1.frobenius();
        lines.push(addition_step(&mut t, &q1));
        lines.push(addition_step(&mut t, &minus_q2));

        G2Prepared {
            lines,
            infinity: false,
        }
    }
}

impl G2Prepared {
    pub fn is_identity(&self) -> bool {
        self.infinity
    }
}

fn ell(f: &mut Fq12, line: &Option<LineCoeffs>, p: &G1Affine) {
    if let Some(line) = line {
        *f = f.mul_by_034(
            &Fq2::from_base(p.y),
            &line.lambda.mul_by_base(&(-p.x)),
            &line.c4,
        );
    }
}

/// Product of Miller loops sharing one accumulator, so the Fq12 squaring
/// is paid once per bit regardless of the number of pairs. Pairs with a
/// point at infinity contribute 1 and are skipped.
pub fn multi_miller_loop(terms: &[(G1Affine, &G2Prepared)]) -> Fq12 {
    let pairs: Vec<&(G1Affine, &G2Prepared)> = terms
        .iter()
        .filter(|(p, q)| !p.infinity && !q.infinity)
        .collect();

    let mut f = Fq12::one();
    let mut idx = 0;
    for i in (0..ATE_LOOP_BITS - 1).rev() {
        f = f.square();
        for (p, q) in &pairs {
            ell(&mut f, &q.lines[idx], p);
        }
        idx += 1;

        if (ATE_LOOP_COUNT >> i) & 1 == 1 {
            for (p, q) in &pairs {
                ell(&mut f, &q.lines[idx], p);
            }
            idx += 1;
        }
    }

    for _ in 0..2 {
        for (p, q) in &pairs {
            ell(&mut f, &q.lines[idx], p);
        }
        idx += 1;
    }

    f
}

/// Raise a Miller-loop output to (p¹² - 1) / r.
///
/// The easy part `(p⁶ - 1)(p² + 1)` moves f into the cyclotomic subgroup,
/// after which the hard part `(p⁴ - p² + 1) / r` uses cyclotomic squaring.
pub fn final_exponentiation(f: &Fq12) -> Result<Gt> {
    let f_inv = f.inverse().ok_or(VerifierError::DivisionByZero)?;
    let f1 = f.conjugate() * f_inv;
    let f2 = f1.frobenius_map(2) * f1;
    Ok(Gt(f2.cyclotomic_exp(final_exponent_hard_part())))
}

/// e(P, Q)
pub fn pairing(p: &G1Affine, q: &G2Affine) -> Result<Gt> {
    multi_pairing(&[(*p, *q)])
}

/// Π e(Pᵢ, Qᵢ) with a single final exponentiation.
pub fn multi_pairing(pairs: &[(G1Affine, G2Affine)]) -> Result<Gt> {
    let prepared: Vec<G2Prepared> = pairs.iter().map(|(_, q)| G2Prepared::from(*q)).collect();
    let terms: Vec<(G1Affine, &G2Prepared)> = pairs
        .iter()
        .zip(&prepared)
        .map(|((p, _), q)| (*p, q))
        .collect();
    multi_pairing_prepared(&terms)
}

pub fn multi_pairing_prepared(terms: &[(G1Affine, &G2Prepared)]) -> Result<Gt> {
    tracing::trace!(pairs = terms.len(), "multi-pairing");
    final_exponentiation(&multi_miller_loop(terms))
}

/// Check Π e(Pᵢ, Qᵢ) = 1.
pub fn pairing_check(pairs: &[(G1Affine, G2Affine)]) -> Result<bool> {
    Ok(multi_pairing(pairs)?.is_identity())
}

/// Check e(P1, Q1) = e(P2, Q2), as e(P1, Q1)·e(-P2, Q2) = 1.
pub fn pairings_equal(p1: &G1Affine, q1: &G2Affine, p2: &G1Affine, q2: &G2Affine) -> Result<bool> {
    pairing_check(&[(*p1, *q1), (-*p2, *q2)])
}
