// SPDX-License-Identifier: CC0-1.0

mod polynomial;
mod search;

use exact_fraction::Fraction;
use log::info;
use num_bigint::BigInt;

pub use polynomial::{Candidate, Polynomial, Signature, interpolate};
pub use search::{SearchOptions, SearchOutcome, search};

/// A single share: one point on the secret-encoding polynomial.
///
/// `key` is the label the share was supplied under. `x` is the abscissa used for
/// interpolation; shares decoded from a share document always have `x == key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    /// External label of the share
    pub key: i64,
    /// x-coordinate of the point
    pub x: i64,
    /// y-coordinate of the point
    pub y: BigInt,
}

impl Share {
    /// Creates a share whose x-coordinate equals its key.
    pub fn new(key: i64, y: BigInt) -> Self {
        Share { key, x: key, y }
    }
}

/// A decoded share document: threshold parameters plus shares in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareSet {
    /// Total number of shares the secret was split into (informational)
    pub n: usize,
    /// Number of shares required to reconstruct the secret
    pub k: usize,
    /// Supplied shares, in the order they were given
    pub shares: Vec<Share>,
}

/// Outcome of a successful recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveryResult {
    /// Constant term of the consensus polynomial
    pub secret: Fraction,
    /// Keys of the shares that disagree with the consensus polynomial, in input order
    pub mismatching_keys: Vec<i64>,
    /// Number of shares agreeing with the consensus polynomial
    pub agreement: usize,
    /// Number of `k`-subsets examined before the search stopped
    pub subsets_visited: usize,
    /// Number of distinct polynomials scored
    pub distinct_polynomials: usize,
}

/// Recovers the secret from `shares` with threshold `k`, tolerating corrupted shares.
pub fn recover(shares: &[Share], k: usize) -> Result<RecoveryResult, Error> {
    recover_with_options(shares, k, &SearchOptions::default())
}

/// Identical to `recover`, with explicit search options.
pub fn recover_with_options(
    shares: &[Share],
    k: usize,
    options: &SearchOptions,
) -> Result<RecoveryResult, Error> {
    let outcome = search(shares, k, options)?;

    let mismatching_keys: Vec<i64> = shares
        .iter()
        .zip(&outcome.best.mask)
        .filter(|(_, agrees)| !**agrees)
        .map(|(share, _)| share.key)
        .collect();

    info!(
        "recovered secret from {}/{} agreeing shares ({} mismatching)",
        outcome.best.agreement,
        shares.len(),
        mismatching_keys.len()
    );

    Ok(RecoveryResult {
        secret: outcome.best.polynomial.constant_term(),
        mismatching_keys,
        agreement: outcome.best.agreement,
        subsets_visited: outcome.subsets_visited,
        distinct_polynomials: outcome.distinct_polynomials,
    })
}

/// Validates the threshold parameters of a decoded share document, then recovers the secret.
pub fn recover_share_set(set: &ShareSet, options: &SearchOptions) -> Result<RecoveryResult, Error> {
    if set.k < 1 || set.k > set.n {
        return Err(Error::InvalidThreshold { k: set.k, n: set.n });
    }
    recover_with_options(&set.shares, set.k, options)
}

/// Error

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input contained nothing but whitespace
    EmptyInput,
    /// Input could not be decoded into a share document
    MalformedInput(String),
    /// Threshold outside `[1, n]`
    InvalidThreshold {
        /// Requested threshold
        k: usize,
        /// Total number of shares
        n: usize,
    },
    /// Fewer shares supplied than the threshold requires
    InsufficientShares {
        /// Shares supplied
        have: usize,
        /// Shares required
        need: usize,
    },
    /// Two shares have the same x-coordinate
    DuplicateXValues(i64),
    /// Two interpolation points have the same x-coordinate
    DuplicateAbscissa(i64),
    /// Zero denominator in exact arithmetic
    DivideByZero,
    /// No subset of shares produced a polynomial
    NoValidPolynomial,
    /// Number of subsets to search exceeds the configured limit
    TooManySubsets {
        /// Number of `k`-subsets of the supplied shares
        subsets: u128,
        /// Configured limit
        limit: u128,
    },
}

impl Error {
    /// Stable machine-readable identifier of the error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::MalformedInput(_) => "failed_to_parse_input",
            Self::InvalidThreshold { .. } => "invalid_k_or_n",
            Self::InsufficientShares { .. } => "not_enough_shares",
            Self::DuplicateXValues(_) => "duplicate_x_values",
            Self::DuplicateAbscissa(_) => "duplicate_abscissa",
            Self::DivideByZero => "divide_by_zero",
            Self::NoValidPolynomial => "no_valid_polynomial",
            Self::TooManySubsets { .. } => "too_many_subsets",
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "empty input"),
            Self::MalformedInput(err) => write!(f, "failed to parse input: {err}"),
            Self::InvalidThreshold { k, n } => {
                write!(f, "invalid threshold: k = {k} must satisfy 1 <= k <= n = {n}")
            }
            Self::InsufficientShares { have, need } => {
                write!(f, "not enough shares (need at least {need}, got {have})")
            }
            Self::DuplicateXValues(x) => write!(f, "duplicate x-coordinate {x}"),
            Self::DuplicateAbscissa(x) => {
                write!(f, "cannot interpolate through repeated abscissa {x}")
            }
            Self::DivideByZero => write!(f, "division by zero"),
            Self::NoValidPolynomial => write!(f, "no subset of shares yields a polynomial"),
            Self::TooManySubsets { subsets, limit } => {
                write!(f, "{subsets} subsets to search exceeds the limit of {limit}")
            }
        }
    }
}

impl std::error::Error for Error {}

impl From<exact_fraction::Error> for Error {
    fn from(err: exact_fraction::Error) -> Self {
        match err {
            exact_fraction::Error::DivideByZero => Error::DivideByZero,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Shares of P(x) = 6 + 2x + 3x^2 at x = 1..=n
    fn quadratic_shares(n: i64) -> Vec<Share> {
        (1..=n)
            .map(|x| Share::new(x, BigInt::from(6 + 2 * x + 3 * x * x)))
            .collect()
    }

    #[test]
    fn test_recover_uncorrupted() {
        let shares = quadratic_shares(3);
        let result = recover(&shares, 3).unwrap();

        assert_eq!(result.secret, Fraction::from(6_i64));
        assert!(result.secret.is_integer());
        assert!(result.mismatching_keys.is_empty());
        assert_eq!(result.agreement, 3);
        assert_eq!(result.subsets_visited, 1);
    }

    #[test]
    fn test_recover_flags_altered_share() {
        // One corrupted share among four with k = 3 ties with the polynomial through
        // the first three shares, so the altered share must sort last to win the tie.
        let mut shares = quadratic_shares(4);
        shares[3].y += 1;

        let result = recover(&shares, 3).unwrap();
        assert_eq!(result.secret, Fraction::from(6_i64));
        assert_eq!(result.mismatching_keys, vec![4]);

        // With a fifth share the true polynomial wins outright wherever the error is.
        for corrupted in 0..5 {
            let mut shares = quadratic_shares(5);
            shares[corrupted].y -= 17;

            let result = recover(&shares, 3).unwrap();
            assert_eq!(result.secret, Fraction::from(6_i64));
            assert_eq!(result.mismatching_keys, vec![shares[corrupted].key]);
            assert_eq!(result.agreement, 4);
        }
    }

    #[test]
    fn test_recover_duplicate_x() {
        let shares = vec![
            Share::new(1, BigInt::from(10)),
            Share::new(1, BigInt::from(12)),
        ];
        assert_eq!(recover(&shares, 2), Err(Error::DuplicateXValues(1)));
    }

    #[test]
    fn test_recover_share_set_validation() {
        let set = ShareSet {
            n: 5,
            k: 3,
            shares: quadratic_shares(2),
        };
        assert_eq!(
            recover_share_set(&set, &SearchOptions::default()),
            Err(Error::InsufficientShares { have: 2, need: 3 })
        );

        let set = ShareSet {
            n: 2,
            k: 3,
            shares: quadratic_shares(3),
        };
        assert_eq!(
            recover_share_set(&set, &SearchOptions::default()),
            Err(Error::InvalidThreshold { k: 3, n: 2 })
        );

        let set = ShareSet {
            n: 3,
            k: 0,
            shares: quadratic_shares(3),
        };
        assert_eq!(
            recover_share_set(&set, &SearchOptions::default()),
            Err(Error::InvalidThreshold { k: 0, n: 3 })
        );
    }

    #[test]
    fn test_fractional_secret() {
        // Points on P(x) = 1/2 + x/2
        let shares = vec![
            Share::new(1, BigInt::from(1)),
            Share::new(3, BigInt::from(2)),
        ];
        let result = recover(&shares, 2).unwrap();
        assert_eq!(result.secret.to_string(), "1/2");
    }

    #[test]
    fn test_key_decoupled_from_x() {
        let shares = vec![
            Share {
                key: 100,
                x: 1,
                y: BigInt::from(11),
            },
            Share {
                key: 200,
                x: 2,
                y: BigInt::from(22),
            },
            Share {
                key: 300,
                x: 3,
                y: BigInt::from(39),
            },
            Share {
                key: 400,
                x: 4,
                y: BigInt::from(0),
            },
            Share {
                key: 500,
                x: 5,
                y: BigInt::from(91),
            },
        ];
        let result = recover(&shares, 3).unwrap();
        assert_eq!(result.secret, Fraction::from(6_i64));
        assert_eq!(result.mismatching_keys, vec![400]);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::EmptyInput.code(), "empty_input");
        assert_eq!(
            Error::MalformedInput("x".to_string()).code(),
            "failed_to_parse_input"
        );
        assert_eq!(
            Error::InvalidThreshold { k: 0, n: 1 }.code(),
            "invalid_k_or_n"
        );
        assert_eq!(
            Error::InsufficientShares { have: 1, need: 2 }.code(),
            "not_enough_shares"
        );
        assert_eq!(Error::DuplicateXValues(1).code(), "duplicate_x_values");
        assert_eq!(Error::NoValidPolynomial.code(), "no_valid_polynomial");
        assert_eq!(Error::DivideByZero.code(), "divide_by_zero");
        assert_eq!(Error::DuplicateAbscissa(2).code(), "duplicate_abscissa");
        assert_eq!(
            Error::TooManySubsets {
                subsets: 20,
                limit: 19
            }
            .code(),
            "too_many_subsets"
        );
        assert_eq!(
            Error::from(exact_fraction::Error::DivideByZero),
            Error::DivideByZero
        );
    }
}
