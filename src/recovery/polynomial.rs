// SPDX-License-Identifier: CC0-1.0

use exact_fraction::Fraction;
use num_bigint::BigInt;
use num_traits::{One, Zero};

use super::{Error, Share};

/// A polynomial with exact rational coefficients, lowest degree first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polynomial {
    coefficients: Vec<Fraction>,
}

/// Structural identity of a polynomial: the canonical `(numerator, denominator)`
/// pair of every coefficient, in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(Vec<(BigInt, BigInt)>);

/// A distinct interpolated polynomial together with its score against every share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// The interpolated polynomial
    pub polynomial: Polynomial,
    /// Number of shares lying on the polynomial
    pub agreement: usize,
    /// `mask[i]` is true if the i-th share lies on the polynomial
    pub mask: Vec<bool>,
}

impl Polynomial {
    /// Creates a polynomial from coefficients `[c_0, c_1, ..., c_d]`.
    pub fn from_coefficients(coefficients: Vec<Fraction>) -> Self {
        Polynomial { coefficients }
    }

    /// Returns the coefficients, lowest degree first.
    pub fn coefficients(&self) -> &[Fraction] {
        &self.coefficients
    }

    /// Returns `P(0)`.
    pub fn constant_term(&self) -> Fraction {
        self.coefficients.first().cloned().unwrap_or_default()
    }

    /// Evaluates the polynomial at `x` using Horner's method.
    pub fn evaluate(&self, x: &BigInt) -> Fraction {
        // Iterate from the highest coefficient down to the constant term
        self.coefficients
            .iter()
            .rev()
            .fold(Fraction::zero(), |acc, coeff| &acc.mul_int(x) + coeff)
    }

    /// Returns true if the share lies exactly on the polynomial.
    pub fn agrees_with(&self, share: &Share) -> bool {
        self.evaluate(&BigInt::from(share.x)) == Fraction::from(share.y.clone())
    }

    /// Scores the polynomial against every share.
    pub fn vote(&self, shares: &[Share]) -> Candidate {
        let mask: Vec<bool> = shares.iter().map(|share| self.agrees_with(share)).collect();
        let agreement = mask.iter().filter(|agrees| **agrees).count();

        Candidate {
            polynomial: self.clone(),
            agreement,
            mask,
        }
    }

    /// Returns the structural signature used to detect identical polynomials.
    pub fn signature(&self) -> Signature {
        Signature(
            self.coefficients
                .iter()
                .map(|coeff| (coeff.numer().clone(), coeff.denom().clone()))
                .collect(),
        )
    }
}

impl std::fmt::Display for Polynomial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let terms: Vec<String> = self.coefficients.iter().map(|c| c.to_string()).collect();
        write!(f, "[{}]", terms.join(", "))
    }
}

// Multiplies the integer polynomial `poly` by the linear factor (x - root).
fn mul_linear(poly: &[BigInt], root: &BigInt) -> Vec<BigInt> {
    let mut next = vec![BigInt::zero(); poly.len() + 1];
    for (a, coeff) in poly.iter().enumerate() {
        next[a] -= coeff * root;
        next[a + 1] += coeff;
    }
    next
}

/// Computes the unique polynomial of degree at most `k - 1` through `k` points.
///
/// Each Lagrange basis polynomial `L_i(x) = Π_{j≠i} (x - x_j) / Π_{j≠i} (x_i - x_j)`
/// is built by multiplying a running coefficient vector by one linear factor at a
/// time, scaled by `y_i`, and accumulated into the result.
///
/// # Returns
/// The interpolating polynomial, or [`Error::DuplicateAbscissa`] if two points
/// share an x-coordinate.
pub fn interpolate(points: &[&Share]) -> Result<Polynomial, Error> {
    let k = points.len();
    let xs: Vec<BigInt> = points.iter().map(|p| BigInt::from(p.x)).collect();
    let mut coefficients = vec![Fraction::zero(); k];

    for i in 0..k {
        let mut basis: Vec<BigInt> = vec![BigInt::one()];
        let mut denom = BigInt::one();

        for j in 0..k {
            if j == i {
                continue;
            }
            let diff = &xs[i] - &xs[j];
            if diff.is_zero() {
                return Err(Error::DuplicateAbscissa(points[i].x));
            }
            denom *= diff;
            basis = mul_linear(&basis, &xs[j]);
        }

        let factor = Fraction::new(points[i].y.clone(), denom)?;
        for (coeff, b) in coefficients.iter_mut().zip(&basis) {
            *coeff = &*coeff + &factor.mul_int(b);
        }
    }

    Ok(Polynomial::from_coefficients(coefficients))
}
