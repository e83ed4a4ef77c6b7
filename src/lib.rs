// Written in 2025 by Joshua Doman <joshsdoman@gmail.com>
// SPDX-License-Identifier: CC0-1.0

//! # Shamir Recover
//!
//! Recovers a secret split with Shamir's threshold secret-sharing scheme from a set
//! of shares, some of which may be corrupted or forged, and reports which shares
//! disagree with the recovered secret.
//!
//! ## Overview
//!
//! With a threshold `k`, any `k` honest shares determine the secret-encoding
//! polynomial. When more than `k` shares are supplied and some are wrong, no single
//! choice of `k` shares can be trusted. This library interpolates every `k`-subset
//! of the supplied shares and keeps the polynomial that agrees with the most shares:
//!
//! 1. **Exact Arithmetic**: Interpolation runs over arbitrary-precision fractions in
//!    lowest terms, so agreement is decided by exact equality rather than a tolerance
//! 2. **Deterministic Search**: Subsets are enumerated in lexicographic order of share
//!    index, and ties resolve to the polynomial produced first
//! 3. **Deduplication**: Subsets that produce the same polynomial are scored once
//! 4. **Early Exit**: The search stops as soon as a polynomial agrees with every share
//!
//! ## Usage
//!
//! ```rust
//! use shamir_recover::{Share, recover};
//! use num_bigint::BigInt;
//!
//! // Shares of P(x) = 6 + 2x + 3x^2 at x = 1..=5, with share 3 corrupted
//! let shares = vec![
//!     Share::new(1, BigInt::from(11)),
//!     Share::new(2, BigInt::from(22)),
//!     Share::new(3, BigInt::from(40)),
//!     Share::new(4, BigInt::from(62)),
//!     Share::new(5, BigInt::from(91)),
//! ];
//!
//! let result = recover(&shares, 3).unwrap();
//! assert_eq!(result.secret.to_string(), "6");
//! assert_eq!(result.mismatching_keys, vec![3]);
//! ```
//!
//! Share documents in JSON can be recovered end to end:
//!
//! ```rust
//! use shamir_recover::{SearchOptions, recover_from_json};
//!
//! let input = r#"{
//!     "keys": { "n": 4, "k": 3 },
//!     "1": { "base": "10", "value": "4" },
//!     "2": { "base": "2", "value": "111" },
//!     "3": { "base": "10", "value": "12" },
//!     "6": { "base": "4", "value": "213" }
//! }"#;
//!
//! let output = recover_from_json(input, &SearchOptions::default()).unwrap();
//! assert!(output.contains("\"secret\": \"3\""));
//! ```
//!
//! ## Cost
//!
//! A search interpolates up to `C(m, k)` subsets for `m` shares. Set
//! [`SearchOptions::max_subsets`] to refuse oversized searches, and
//! [`SearchOptions::parallel`] to spread interpolation across threads.
//!

// Coding conventions
#![deny(unsafe_code)]
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![deny(dead_code)]
#![deny(unused_imports)]
#![deny(missing_docs)]

pub use exact_fraction;

mod format;
mod recovery;

pub use format::{decode, encode, encode_error};
pub use recovery::{
    Candidate, Error, Polynomial, RecoveryResult, SearchOptions, SearchOutcome, Share, ShareSet,
    Signature, interpolate, recover, recover_share_set, recover_with_options, search,
};

/// Decodes a JSON share document, recovers the secret, and renders the result as JSON.
pub fn recover_from_json(input: &str, options: &SearchOptions) -> Result<String, Error> {
    let set = decode(input)?;
    let result = recover_share_set(&set, options)?;

    Ok(encode(&result))
}
