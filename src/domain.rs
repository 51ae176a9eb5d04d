//! Evaluation Domain
//!
//! The multiplicative subgroup H = {1, ω, ω², ..., ω^(n-1)} of Fr over which
//! PLONK circuits are laid out. The verifier never interpolates: it only
//! needs the vanishing polynomial and Lagrange basis at a single point, both
//! of which have closed forms.

use crate::constants::FR_TWO_ADICITY;
use crate::error::{Result, VerifierError};
use crate::field::fp::{div_small, sub_limbs};
use crate::field::{Field, Fr};

/// A multiplicative generator of Fr*.
const FR_GENERATOR: u64 = 5;

/// A multiplicative subgroup of Fr of order n = 2^k.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Domain {
    /// Size of the domain (power of 2)
    pub n: u64,
    /// Primitive n-th root of unity
    pub omega: Fr,
    /// n as a field element
    pub size_as_fr: Fr,
}

impl Domain {
    /// Build a domain from a declared size and generator.
    ///
    /// Fails with `DomainSizeInvalid` unless n is a power of two no larger
    /// than 2^28, and with `InvalidDomainGenerator` unless ω has order
    /// exactly n.
    pub fn new(n: u64, omega: Fr) -> Result<Self> {
        if !n.is_power_of_two() || n.trailing_zeros() > FR_TWO_ADICITY {
            return Err(VerifierError::DomainSizeInvalid(n));
        }
        if !omega.pow_u64(n).is_one() || (n > 1 && omega.pow_u64(n / 2).is_one()) {
            return Err(VerifierError::InvalidDomainGenerator);
        }
        Ok(Domain {
            n,
            omega,
            size_as_fr: Fr::from_u64(n),
        })
    }

    /// The domain of size n generated by the standard root of unity
    /// `5^((r-1)/n)`.
    pub fn with_size(n: u64) -> Result<Self> {
        let omega = Self::root_of_unity(n).ok_or(VerifierError::DomainSizeInvalid(n))?;
        Self::new(n, omega)
    }

    /// Get the primitive n-th root of unity
    /// Returns ω such that ω^n = 1 and ω^k ≠ 1 for 0 < k < n
    pub fn root_of_unity(n: u64) -> Option<Fr> {
        if !n.is_power_of_two() || n.trailing_zeros() > FR_TWO_ADICITY {
            return None;
        }
        let r_minus_one = sub_limbs(&Fr::MODULUS, &[1, 0, 0, 0]).0;
        let exp = div_small(&r_minus_one, n);
        Some(Fr::from_u64(FR_GENERATOR).pow(&exp))
    }

    /// Get the i-th element of the domain: ω^i
    pub fn element(&self, i: u64) -> Fr {
        self.omega.pow_u64(i)
    }

    /// Whether x is an n-th root of unity.
    pub fn contains(&self, x: &Fr) -> bool {
        x.pow_u64(self.n).is_one()
    }

    /// Evaluate the vanishing polynomial Z_H(X) = X^n - 1 at a point
    pub fn vanishing_eval(&self, x: &Fr) -> Fr {
        x.pow_u64(self.n) - Fr::one()
    }

    /// Evaluate Lagrange basis L_i(X) at a point
    /// L_i(x) = ω^i · Z_H(x) / (n · (x - ω^i))
    pub fn lagrange_eval(&self, i: u64, x: &Fr) -> Result<Fr> {
        let omega_i = self.element(i);
        lagrange_at(omega_i, self.vanishing_eval(x), self.size_as_fr, x)
    }

    /// PI(x) = Σ inputs[i] · L_i(x), with input i placed at row i.
    pub fn public_input_eval(&self, inputs: &[Fr], x: &Fr) -> Result<Fr> {
        let z_h = self.vanishing_eval(x);
        let mut omega_i = Fr::one();
        let mut acc = Fr::zero();
        for input in inputs {
            acc += *input * lagrange_at(omega_i, z_h, self.size_as_fr, x)?;
            omega_i *= self.omega;
        }
        Ok(acc)
    }
}

fn lagrange_at(omega_i: Fr, z_h: Fr, n: Fr, x: &Fr) -> Result<Fr> {
    if *x == omega_i {
        return Ok(Fr::one());
    }
    let denom = (n * (*x - omega_i))
        .inverse()
        .ok_or(VerifierError::DivisionByZero)?;
    Ok(omega_i * z_h * denom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{random_fr, test_rng};

    #[test]
    fn test_root_of_unity() {
        let n = 16u64;
        let omega = Domain::root_of_unity(n).unwrap();

        // ω^n = 1
        assert_eq!(omega.pow_u64(n), Fr::one());

        // ω^(n/2) ≠ 1
        assert_ne!(omega.pow_u64(n / 2), Fr::one());

        let max = Domain::root_of_unity(1 << 28).unwrap();
        assert_ne!(max.pow_u64(1 << 27), Fr::one());
    }

    #[test]
    fn test_invalid_sizes() {
        assert_eq!(
            Domain::new(12, Fr::one()),
            Err(VerifierError::DomainSizeInvalid(12))
        );
        assert_eq!(Domain::new(0, Fr::one()), Err(VerifierError::DomainSizeInvalid(0)));
        assert_eq!(
            Domain::with_size(1 << 29),
            Err(VerifierError::DomainSizeInvalid(1 << 29))
        );
    }

    #[test]
    fn test_invalid_generator() {
        let omega8 = Domain::root_of_unity(8).unwrap();
        // an 8th root is not a primitive 16th root
        assert_eq!(Domain::new(16, omega8), Err(VerifierError::InvalidDomainGenerator));
        assert_eq!(
            Domain::new(8, Fr::from_u64(2)),
            Err(VerifierError::InvalidDomainGenerator)
        );
        assert!(Domain::new(8, omega8).is_ok());
    }

    #[test]
    fn test_lagrange_interpolates() {
        let domain = Domain::with_size(8).unwrap();
        for i in 0..8 {
            for j in 0..8 {
                let at = domain.element(j);
                let expected = if i == j { Fr::one() } else { Fr::zero() };
                assert_eq!(domain.lagrange_eval(i, &at).unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_lagrange_partition_of_unity() {
        let mut rng = test_rng();
        let domain = Domain::with_size(4).unwrap();
        let x = random_fr(&mut rng);
        let sum = (0..4).fold(Fr::zero(), |acc, i| acc + domain.lagrange_eval(i, &x).unwrap());
        assert_eq!(sum, Fr::one());
        assert!(!domain.vanishing_eval(&x).is_zero());
        assert!(domain.contains(&domain.element(3)));
    }

    #[test]
    fn test_public_input_eval() {
        let mut rng = test_rng();
        let domain = Domain::with_size(8).unwrap();
        let x = random_fr(&mut rng);
        let inputs = [Fr::from_u64(3), Fr::from_u64(7)];
        let expected = inputs[0] * domain.lagrange_eval(0, &x).unwrap()
            + inputs[1] * domain.lagrange_eval(1, &x).unwrap();
        assert_eq!(domain.public_input_eval(&inputs, &x).unwrap(), expected);
    }
}
