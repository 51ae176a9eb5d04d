//! A small PLONK prover for tests.
//!
//! Proves knowledge of x with x³ + x + 5 = y, y public, over a domain of
//! size 8. Selectors, permutation and witness are laid out row by row,
//! interpolated and committed under a random τ, and the proof is built the
//! way gnark's prover builds it, without blinding. The optional variant
//! also commits to the wire value x with a BSB22 commitment.

use crate::curve::{G1Affine, G2Affine};
use crate::domain::Domain;
use crate::field::{Field, Fr};
use crate::hash_to_field::{hash_to_fr, BSB22_DST};
use crate::kzg::{derive_folding_challenge, BatchOpeningProof, KzgVerifyingKey, OpeningProof};
use crate::plonk::types::{Proof, VerifyingKey};
use crate::plonk::verifier::{ALPHA, BETA, GAMMA, ZETA};
use crate::testing::{g1_mul, g2_mul, random_fr, test_rng};
use crate::transcript::Transcript;

const N: usize = 8;
const COSET_SHIFT: u64 = 5;

/// Row of the commitment hash, relative to the public inputs.
const COMMITMENT_INDEX: u64 = 4;

pub struct PlonkFixture {
    pub vk: VerifyingKey,
    pub proof: Proof,
    pub inputs: Vec<Fr>,
    /// Commitment to the linearized polynomial, computed from its coefficients
    pub linearized_commitment: G1Affine,
    pub zeta: Fr,
}

/// Coefficients, lowest degree first.
type Poly = Vec<Fr>;

fn eval(p: &[Fr], x: Fr) -> Fr {
    p.iter().rev().fold(Fr::zero(), |acc, c| acc * x + *c)
}

fn add(a: &[Fr], b: &[Fr]) -> Poly {
    let mut out = vec![Fr::zero(); a.len().max(b.len())];
    for (i, c) in a.iter().enumerate() {
        out[i] += *c;
    }
    for (i, c) in b.iter().enumerate() {
        out[i] += *c;
    }
    out
}

fn scale(a: &[Fr], k: Fr) -> Poly {
    a.iter().map(|c| *c * k).collect()
}

fn mul(a: &[Fr], b: &[Fr]) -> Poly {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![Fr::zero(); a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            out[i + j] += *x * *y;
        }
    }
    out
}

/// p(kX)
fn dilate(p: &[Fr], k: Fr) -> Poly {
    let mut pow = Fr::one();
    p.iter()
        .map(|c| {
            let out = *c * pow;
            pow *= k;
            out
        })
        .collect()
}

/// Inverse DFT: the polynomial taking `values[i]` at ωⁱ.
fn interpolate(domain: &Domain, values: &[Fr]) -> Poly {
    let n_inv = domain.size_as_fr.inverse().unwrap();
    let omega_inv = domain.omega.inverse().unwrap();
    (0..values.len())
        .map(|j| {
            let w = omega_inv.pow_u64(j as u64);
            let mut acc = Fr::zero();
            let mut pow = Fr::one();
            for v in values {
                acc += *v * pow;
                pow *= w;
            }
            acc * n_inv
        })
        .collect()
}

/// p / (Xⁿ - 1), panicking unless p vanishes on the domain.
fn divide_by_vanishing(p: &[Fr], n: usize) -> Poly {
    let mut rem = p.to_vec();
    let mut quotient = vec![Fr::zero(); p.len().saturating_sub(n)];
    for k in (n..rem.len()).rev() {
        let c = rem[k];
        quotient[k - n] += c;
        rem[k - n] += c;
        rem[k] = Fr::zero();
    }
    assert!(
        rem.iter().all(|c| c.is_zero()),
        "constraint polynomial does not vanish on the domain"
    );
    quotient
}

fn commit(p: &[Fr], tau: Fr) -> G1Affine {
    g1_mul(eval(p, tau))
}

/// Build a key and an honest proof for x³ + x + 5 = y.
pub fn cubic_circuit(x: u64, with_commitment: bool) -> PlonkFixture {
    let mut rng = test_rng();
    let tau = random_fr(&mut rng);
    let domain = Domain::with_size(N as u64).unwrap();
    let omega = domain.omega;
    let shift = Fr::from_u64(COSET_SHIFT);
    let (zero, one) = (Fr::zero(), Fr::one());

    let x = Fr::from_u64(x);
    let x2 = x * x;
    let x3 = x2 * x;
    let x3x = x3 + x;
    let y = x3x + Fr::from_u64(5);

    let mut ql = vec![zero; N];
    let mut qr = vec![zero; N];
    let mut qm = vec![zero; N];
    let mut qo = vec![zero; N];
    let mut qk = vec![zero; N];
    let mut qcp = vec![zero; N];
    let mut l = vec![zero; N];
    let mut r = vec![zero; N];
    let mut o = vec![zero; N];
    let mut pi = vec![zero; N];
    let mut committed = vec![zero; N];

    // public input: -l + PI = 0
    ql[0] = -one;
    l[0] = y;
    pi[0] = y;
    // x·x = x²
    (l[1], r[1], o[1], qm[1], qo[1]) = (x, x, x2, one, -one);
    // x²·x = x³
    (l[2], r[2], o[2], qm[2], qo[2]) = (x2, x, x3, one, -one);
    // x³ + x
    (l[3], r[3], o[3], ql[3], qr[3], qo[3]) = (x3, x, x3x, one, one, -one);
    // x³ + x + 5 = y
    (l[4], o[4], ql[4], qk[4], qo[4]) = (x3x, y, one, Fr::from_u64(5), -one);

    let mut cycles: Vec<Vec<(usize, usize)>> = vec![
        vec![(0, 1), (1, 1), (1, 2), (1, 3)],
        vec![(2, 1), (0, 2)],
        vec![(2, 2), (0, 3)],
        vec![(2, 3), (0, 4)],
        vec![(0, 0), (2, 4)],
    ];

    let mut bsb22_commitments = Vec::new();
    let committed_poly = if with_commitment {
        // row 6 reads the committed wire: -l + qcp·π = 0, l = x
        (l[6], ql[6], qcp[6]) = (x, -one, one);
        committed[6] = x;
        committed[7] = random_fr(&mut rng);
        cycles[0].push((0, 6));

        let poly = interpolate(&domain, &committed);
        let commitment = commit(&poly, tau);
        bsb22_commitments.push(commitment);

        // the commitment hash is a public value at its own row
        let row = 1 + COMMITMENT_INDEX as usize;
        let hashed = hash_to_fr(&commitment.to_uncompressed(), BSB22_DST).unwrap();
        (l[row], ql[row]) = (hashed, -one);
        pi[row] = hashed;
        poly
    } else {
        Vec::new()
    };

    // σ maps every position to the next one in its cycle
    let id = |c: usize, i: usize| shift.pow_u64(c as u64) * omega.pow_u64(i as u64);
    let mut sigma = [[zero; N]; 3];
    for (c, column) in sigma.iter_mut().enumerate() {
        for (i, s) in column.iter_mut().enumerate() {
            *s = id(c, i);
        }
    }
    for cycle in &cycles {
        for (j, &(c, i)) in cycle.iter().enumerate() {
            let (nc, ni) = cycle[(j + 1) % cycle.len()];
            sigma[c][i] = id(nc, ni);
        }
    }

    let interp = |values: &[Fr]| interpolate(&domain, values);
    let (ql_poly, qr_poly, qm_poly, qo_poly, qk_poly, qcp_poly) =
        (interp(&ql), interp(&qr), interp(&qm), interp(&qo), interp(&qk), interp(&qcp));
    let s_polys = [interp(&sigma[0]), interp(&sigma[1]), interp(&sigma[2])];
    let wire_polys = [interp(&l), interp(&r), interp(&o)];
    let pi_poly = interp(&pi);

    let vk = VerifyingKey {
        size: N as u64,
        size_inv: domain.size_as_fr.inverse().unwrap(),
        generator: omega,
        nb_public_variables: 1,
        coset_shift: shift,
        s: [
            commit(&s_polys[0], tau),
            commit(&s_polys[1], tau),
            commit(&s_polys[2], tau),
        ],
        ql: commit(&ql_poly, tau),
        qr: commit(&qr_poly, tau),
        qm: commit(&qm_poly, tau),
        qo: commit(&qo_poly, tau),
        qk: commit(&qk_poly, tau),
        qcp: if with_commitment {
            vec![commit(&qcp_poly, tau)]
        } else {
            Vec::new()
        },
        kzg: KzgVerifyingKey {
            g1: G1Affine::generator(),
            g2: [G2Affine::generator(), g2_mul(tau)],
        },
        commitment_constraint_indexes: if with_commitment {
            vec![COMMITMENT_INDEX]
        } else {
            Vec::new()
        },
    };
    let inputs = vec![y];

    // round 1: wires
    let mut transcript = Transcript::new(&[GAMMA, BETA, ALPHA, ZETA]);
    for (label, point) in ["S1", "S2", "S3"].iter().zip(&vk.s) {
        transcript.bind_g1(GAMMA, label, point).unwrap();
    }
    for (label, point) in [
        ("Ql", &vk.ql),
        ("Qr", &vk.qr),
        ("Qm", &vk.qm),
        ("Qo", &vk.qo),
        ("Qk", &vk.qk),
    ] {
        transcript.bind_g1(GAMMA, label, point).unwrap();
    }
    for point in &vk.qcp {
        transcript.bind_g1(GAMMA, "Qcp", point).unwrap();
    }
    transcript.bind_fr(GAMMA, "pi", &y).unwrap();
    let lro = [
        commit(&wire_polys[0], tau),
        commit(&wire_polys[1], tau),
        commit(&wire_polys[2], tau),
    ];
    for (label, point) in ["L", "R", "O"].iter().zip(&lro) {
        transcript.bind_g1(GAMMA, label, point).unwrap();
    }
    let gamma = transcript.compute_challenge(GAMMA).unwrap();
    let beta = transcript.compute_challenge(BETA).unwrap();

    // round 2: permutation accumulator
    let wires = [&l, &r, &o];
    let mut z = vec![one; N];
    let mut acc = one;
    for i in 0..N {
        z[i] = acc;
        let mut num = one;
        let mut den = one;
        for c in 0..3 {
            num *= wires[c][i] + beta * id(c, i) + gamma;
            den *= wires[c][i] + beta * sigma[c][i] + gamma;
        }
        acc *= num * den.inverse().unwrap();
    }
    assert_eq!(acc, one, "copy constraints do not hold");
    let z_poly = interp(&z);
    let z_commit = commit(&z_poly, tau);

    for point in &bsb22_commitments {
        transcript.bind_g1(ALPHA, "bsb22", point).unwrap();
    }
    transcript.bind_g1(ALPHA, "Z", &z_commit).unwrap();
    let alpha = transcript.compute_challenge(ALPHA).unwrap();

    // round 3: quotient
    let mut gate = add(&mul(&ql_poly, &wire_polys[0]), &mul(&qr_poly, &wire_polys[1]));
    gate = add(&gate, &mul(&qm_poly, &mul(&wire_polys[0], &wire_polys[1])));
    gate = add(&gate, &mul(&qo_poly, &wire_polys[2]));
    gate = add(&gate, &qk_poly);
    gate = add(&gate, &pi_poly);
    gate = add(&gate, &mul(&qcp_poly, &committed_poly));

    let x_poly = vec![zero, one];
    let id_polys = [x_poly.clone(), scale(&x_poly, shift), scale(&x_poly, shift.square())];
    let mut with_sigma = dilate(&z_poly, omega);
    let mut with_id = z_poly.clone();
    for c in 0..3 {
        let gamma_poly = [gamma];
        with_sigma = mul(&with_sigma, &add(&add(&wire_polys[c], &scale(&s_polys[c], beta)), &gamma_poly));
        with_id = mul(&with_id, &add(&add(&wire_polys[c], &scale(&id_polys[c], beta)), &gamma_poly));
    }
    let permutation = add(&with_sigma, &scale(&with_id, -one));

    let mut first_row = vec![zero; N];
    first_row[0] = one;
    let l1_poly = interp(&first_row);
    let boundary = mul(&add(&z_poly, &[-one]), &l1_poly);

    let numerator = add(
        &add(&gate, &scale(&permutation, alpha)),
        &scale(&boundary, alpha.square()),
    );
    let t = divide_by_vanishing(&numerator, N);
    let chunk = N + 2;
    assert!(t.len() <= 3 * chunk);
    let h_polys: Vec<Poly> = (0..3)
        .map(|k| t.iter().skip(k * chunk).take(chunk).copied().collect())
        .collect();
    let h = [
        commit(&h_polys[0], tau),
        commit(&h_polys[1], tau),
        commit(&h_polys[2], tau),
    ];
    for (label, point) in ["H0", "H1", "H2"].iter().zip(&h) {
        transcript.bind_g1(ZETA, label, point).unwrap();
    }
    let zeta = transcript.compute_challenge(ZETA).unwrap();

    // round 4: evaluations and the linearized polynomial
    let [l_zeta, r_zeta, o_zeta] = [
        eval(&wire_polys[0], zeta),
        eval(&wire_polys[1], zeta),
        eval(&wire_polys[2], zeta),
    ];
    let s1_zeta = eval(&s_polys[0], zeta);
    let s2_zeta = eval(&s_polys[1], zeta);
    let qcp_zeta = eval(&qcp_poly, zeta);
    let zu = eval(&z_poly, zeta * omega);

    let z_h = zeta.pow_u64(N as u64) - one;
    let l1_zeta = eval(&l1_poly, zeta);
    let sigma_prod = (l_zeta + beta * s1_zeta + gamma) * (r_zeta + beta * s2_zeta + gamma);
    let id_prod = (l_zeta + beta * zeta + gamma)
        * (r_zeta + beta * shift * zeta + gamma)
        * (o_zeta + beta * shift.square() * zeta + gamma);
    let zeta_shift = zeta.pow_u64(N as u64 + 2);

    let mut linearized = scale(&ql_poly, l_zeta);
    linearized = add(&linearized, &scale(&qr_poly, r_zeta));
    linearized = add(&linearized, &scale(&qm_poly, l_zeta * r_zeta));
    linearized = add(&linearized, &scale(&qo_poly, o_zeta));
    linearized = add(&linearized, &qk_poly);
    linearized = add(&linearized, &scale(&s_polys[2], alpha * beta * sigma_prod * zu));
    linearized = add(&linearized, &scale(&z_poly, alpha.square() * l1_zeta - alpha * id_prod));
    let mut folded_h = add(&h_polys[0], &scale(&h_polys[1], zeta_shift));
    folded_h = add(&folded_h, &scale(&h_polys[2], zeta_shift.square()));
    linearized = add(&linearized, &scale(&folded_h, -z_h));
    if with_commitment {
        linearized = add(&linearized, &scale(&committed_poly, qcp_zeta));
    }
    let linearized_commitment = commit(&linearized, tau);

    // round 5: openings
    let mut opened = vec![
        (linearized_commitment, linearized.clone()),
        (lro[0], wire_polys[0].clone()),
        (lro[1], wire_polys[1].clone()),
        (lro[2], wire_polys[2].clone()),
        (vk.s[0], s_polys[0].clone()),
        (vk.s[1], s_polys[1].clone()),
    ];
    if with_commitment {
        opened.push((vk.qcp[0], qcp_poly.clone()));
    }
    let digests: Vec<G1Affine> = opened.iter().map(|(d, _)| *d).collect();
    let claimed_values: Vec<Fr> = opened.iter().map(|(_, p)| eval(p, zeta)).collect();

    let v = derive_folding_challenge(&digests, &claimed_values, &zeta, &[zu.to_bytes_be().as_slice()])
        .unwrap();
    let mut folded_tau = zero;
    let mut folded_zeta = zero;
    let mut pow = one;
    for ((_, p), value) in opened.iter().zip(&claimed_values) {
        folded_tau += pow * eval(p, tau);
        folded_zeta += pow * *value;
        pow *= v;
    }
    let batched_h = g1_mul((folded_tau - folded_zeta) * (tau - zeta).inverse().unwrap());
    let shifted_h = g1_mul((eval(&z_poly, tau) - zu) * (tau - zeta * omega).inverse().unwrap());

    let proof = Proof {
        lro,
        z: z_commit,
        h,
        batched_proof: BatchOpeningProof {
            h: batched_h,
            claimed_values,
        },
        z_shifted_opening: OpeningProof {
            h: shifted_h,
            claimed_value: zu,
        },
        bsb22_commitments,
    };

    PlonkFixture {
        vk,
        proof,
        inputs,
        linearized_commitment,
        zeta,
    }
}
