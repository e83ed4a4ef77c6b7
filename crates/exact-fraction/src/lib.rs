// SPDX-License-Identifier: CC0-1.0

//! # Exact Fraction
//!
//! Arbitrary-precision rational numbers that are always stored in canonical form:
//! the denominator is strictly positive and shares no common factor with the
//! numerator. Because every operation re-normalizes its result, two fractions
//! are equal in value if and only if their numerator and denominator are equal,
//! so `PartialEq`, `Eq` and `Hash` are derived structurally.
//!
//! ```rust
//! use exact_fraction::Fraction;
//! use num_bigint::BigInt;
//!
//! let a = Fraction::new(BigInt::from(2), BigInt::from(-4)).unwrap();
//! assert_eq!(a.to_string(), "-1/2");
//!
//! let b = &a + &Fraction::from(1_i64);
//! assert_eq!(b.to_string(), "1/2");
//! assert!(Fraction::from(1_i64).checked_div(&Fraction::zero()).is_err());
//! ```

// Coding conventions
#![deny(unsafe_code)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![deny(dead_code)]
#![deny(unused_imports)]
#![deny(missing_docs)]

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};

/// A rational number in lowest terms with a positive denominator.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fraction {
    numer: BigInt,
    denom: BigInt,
}

impl Fraction {
    /// Creates the canonical fraction `numer / denom`.
    ///
    /// Returns [`Error::DivideByZero`] if `denom` is zero.
    pub fn new(numer: BigInt, denom: BigInt) -> Result<Self, Error> {
        if denom.is_zero() {
            return Err(Error::DivideByZero);
        }
        Ok(Self::reduce(numer, denom))
    }

    // Caller guarantees `denom != 0`.
    fn reduce(mut numer: BigInt, mut denom: BigInt) -> Self {
        if denom.is_negative() {
            numer = -numer;
            denom = -denom;
        }
        let g = numer.gcd(&denom);
        if !g.is_one() {
            numer /= &g;
            denom /= &g;
        }
        Self { numer, denom }
    }

    /// Returns `0/1`
    pub fn zero() -> Self {
        Self {
            numer: BigInt::zero(),
            denom: BigInt::one(),
        }
    }

    /// Returns `1/1`
    pub fn one() -> Self {
        Self {
            numer: BigInt::one(),
            denom: BigInt::one(),
        }
    }

    /// The canonical numerator (carries the sign).
    pub fn numer(&self) -> &BigInt {
        &self.numer
    }

    /// The canonical denominator, always positive.
    pub fn denom(&self) -> &BigInt {
        &self.denom
    }

    /// Returns true if the fraction equals zero.
    pub fn is_zero(&self) -> bool {
        self.numer.is_zero()
    }

    /// Returns true if the denominator is one.
    pub fn is_integer(&self) -> bool {
        self.denom.is_one()
    }

    /// Consumes the fraction and returns its canonical `(numerator, denominator)` pair.
    pub fn into_parts(self) -> (BigInt, BigInt) {
        (self.numer, self.denom)
    }

    /// Multiplies by an integer.
    pub fn mul_int(&self, factor: &BigInt) -> Self {
        Self::reduce(&self.numer * factor, self.denom.clone())
    }

    /// Divides by another fraction.
    ///
    /// Returns [`Error::DivideByZero`] if `divisor` is zero.
    pub fn checked_div(&self, divisor: &Self) -> Result<Self, Error> {
        if divisor.is_zero() {
            return Err(Error::DivideByZero);
        }
        Ok(Self::reduce(
            &self.numer * &divisor.denom,
            &self.denom * &divisor.numer,
        ))
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<BigInt> for Fraction {
    fn from(value: BigInt) -> Self {
        Self {
            numer: value,
            denom: BigInt::one(),
        }
    }
}

impl From<i64> for Fraction {
    fn from(value: i64) -> Self {
        Self::from(BigInt::from(value))
    }
}

impl<'a> Add<&'a Fraction> for &'a Fraction {
    type Output = Fraction;

    fn add(self, other: &Fraction) -> Fraction {
        Fraction::reduce(
            &self.numer * &other.denom + &other.numer * &self.denom,
            &self.denom * &other.denom,
        )
    }
}

impl<'a> Sub<&'a Fraction> for &'a Fraction {
    type Output = Fraction;

    fn sub(self, other: &Fraction) -> Fraction {
        Fraction::reduce(
            &self.numer * &other.denom - &other.numer * &self.denom,
            &self.denom * &other.denom,
        )
    }
}

impl<'a> Mul<&'a Fraction> for &'a Fraction {
    type Output = Fraction;

    fn mul(self, other: &Fraction) -> Fraction {
        Fraction::reduce(&self.numer * &other.numer, &self.denom * &other.denom)
    }
}

impl<'a> Mul<&'a BigInt> for &'a Fraction {
    type Output = Fraction;

    fn mul(self, factor: &BigInt) -> Fraction {
        self.mul_int(factor)
    }
}

impl Add for Fraction {
    type Output = Fraction;

    fn add(self, other: Fraction) -> Fraction {
        &self + &other
    }
}

impl Sub for Fraction {
    type Output = Fraction;

    fn sub(self, other: Fraction) -> Fraction {
        &self - &other
    }
}

impl Mul for Fraction {
    type Output = Fraction;

    fn mul(self, other: Fraction) -> Fraction {
        &self * &other
    }
}

impl Neg for Fraction {
    type Output = Fraction;

    fn neg(self) -> Fraction {
        Fraction {
            numer: -self.numer,
            denom: self.denom,
        }
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.denom.is_one() {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

/// Error

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A zero denominator was supplied or a division by zero was attempted
    DivideByZero,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::DivideByZero => write!(f, "division by zero"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    fn frac(n: i64, d: i64) -> Fraction {
        Fraction::new(BigInt::from(n), BigInt::from(d)).unwrap()
    }

    #[test]
    fn test_canonical_form() {
        let f = frac(6, -8);
        assert_eq!(f.numer(), &BigInt::from(-3));
        assert_eq!(f.denom(), &BigInt::from(4));

        let f = frac(-6, -8);
        assert_eq!(f.numer(), &BigInt::from(3));
        assert_eq!(f.denom(), &BigInt::from(4));

        // Zero always collapses to 0/1
        assert_eq!(frac(0, -17), Fraction::zero());
        assert_eq!(frac(0, 5).denom(), &BigInt::one());
    }

    #[test]
    fn test_zero_denominator() {
        assert_eq!(
            Fraction::new(BigInt::from(1), BigInt::zero()),
            Err(Error::DivideByZero)
        );
        assert_eq!(
            frac(3, 7).checked_div(&Fraction::zero()),
            Err(Error::DivideByZero)
        );
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(frac(1, 2), frac(2, 4));
        assert_eq!(frac(-1, 3), frac(1, -3));
        assert_ne!(frac(1, 2), frac(1, 3));
    }

    #[test]
    fn test_arithmetic() {
        let a = frac(1, 6);
        let b = frac(1, 3);

        assert_eq!(&a + &b, frac(1, 2));
        assert_eq!(&a - &b, frac(-1, 6));
        assert_eq!(&a * &b, frac(1, 18));
        assert_eq!(a.checked_div(&b).unwrap(), frac(1, 2));
        assert_eq!(a.mul_int(&BigInt::from(12)), Fraction::from(2_i64));
        assert_eq!(&b * &BigInt::from(-3), Fraction::from(-1_i64));
        assert_eq!(-frac(2, 5), frac(-2, 5));
    }

    #[test]
    fn test_add_then_sub_is_identity() {
        let values = [
            frac(0, 1),
            frac(7, 3),
            frac(-11, 4),
            frac(1, 1_000_000_007),
            Fraction::from(BigInt::parse_bytes(b"123456789012345678901234567890", 10).unwrap()),
        ];

        for a in &values {
            for b in &values {
                let sum = a + b;
                assert_eq!(&sum - b, *a);
                assert!(sum.denom() > &BigInt::zero());
                assert!(sum.numer().gcd(sum.denom()).is_one());
            }
        }
    }

    #[test]
    fn test_large_values_stay_reduced() {
        let big = BigInt::parse_bytes(b"340282366920938463463374607431768211456", 10).unwrap();
        let f = Fraction::new(&big * BigInt::from(3), &big * BigInt::from(9)).unwrap();
        assert_eq!(f, frac(1, 3));
    }

    #[test]
    fn test_display() {
        assert_eq!(Fraction::from(42_i64).to_string(), "42");
        assert_eq!(frac(-3, 9).to_string(), "-1/3");
        assert_eq!(Fraction::zero().to_string(), "0");
        assert!(Fraction::from(5_i64).is_integer());
        assert!(!frac(5, 2).is_integer());
    }

    #[test]
    fn test_into_parts() {
        let (n, d) = frac(10, -4).into_parts();
        assert_eq!(n, BigInt::from(-5));
        assert_eq!(d, BigInt::from(2));
    }
}
