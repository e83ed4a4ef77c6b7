// SPDX-License-Identifier: CC0-1.0

use std::collections::{HashMap, HashSet, hash_map::Entry};

use itertools::Itertools;
use log::{debug, info, trace, warn};
use rayon::prelude::*;

use super::polynomial::{Candidate, Polynomial, Signature, interpolate};
use super::{Error, Share};

// Above this many subsets a warning is logged before searching
const LARGE_SEARCH: u128 = 1_000_000;

/// Tuning knobs for the consensus search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    /// Interpolate and score subsets on the rayon thread pool
    pub parallel: bool,
    /// Refuse to search when `C(m, k)` exceeds this many subsets
    pub max_subsets: Option<u128>,
    /// Number of subsets handed to the thread pool at once in parallel mode
    pub batch_size: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            parallel: false,
            max_subsets: None,
            batch_size: 256,
        }
    }
}

/// Best candidate found by a search, with visitation statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// The polynomial agreeing with the most shares
    pub best: Candidate,
    /// Number of `k`-subsets examined
    pub subsets_visited: usize,
    /// Number of distinct polynomials scored
    pub distinct_polynomials: usize,
}

/// Finds the polynomial through some `k` shares that agrees with the most shares.
///
/// Subsets are enumerated in lexicographic order of share indices. Identical
/// polynomials are scored once. Ties resolve to the polynomial first produced,
/// and the search stops as soon as a polynomial agrees with every share.
///
/// # Arguments
/// * `shares`: All supplied shares, with pairwise distinct x-coordinates.
/// * `k`: The reconstruction threshold, `1 <= k <= shares.len()`.
/// * `options`: Parallelism and subset-count limit.
pub fn search(shares: &[Share], k: usize, options: &SearchOptions) -> Result<SearchOutcome, Error> {
    let m = shares.len();
    if k == 0 {
        return Err(Error::InvalidThreshold { k, n: m });
    }
    if m < k {
        return Err(Error::InsufficientShares { have: m, need: k });
    }

    let mut xs = HashSet::with_capacity(m);
    for share in shares {
        if !xs.insert(share.x) {
            return Err(Error::DuplicateXValues(share.x));
        }
    }

    let total = binomial(m, k);
    if let Some(limit) = options.max_subsets {
        if total > limit {
            return Err(Error::TooManySubsets {
                subsets: total,
                limit,
            });
        }
    }
    if total > LARGE_SEARCH {
        warn!("searching up to {total} subsets of {m} shares, this may take a while");
    }

    let mut tally = Tally::new(shares);
    if options.parallel {
        tally.run_parallel(k, options.batch_size.max(1))?;
    } else {
        tally.run_sequential(k)?;
    }

    info!(
        "visited {} of {} subsets, scored {} distinct polynomial(s)",
        tally.visited,
        total,
        tally.candidates.len()
    );

    tally.finish()
}

/// Running state of one search: scored polynomials, the signature cache and the leader.
struct Tally<'a> {
    shares: &'a [Share],
    cache: HashMap<Signature, usize>,
    candidates: Vec<Candidate>,
    best: Option<usize>,
    visited: usize,
}

impl<'a> Tally<'a> {
    fn new(shares: &'a [Share]) -> Self {
        Tally {
            shares,
            cache: HashMap::new(),
            candidates: Vec::new(),
            best: None,
            visited: 0,
        }
    }

    fn run_sequential(&mut self, k: usize) -> Result<(), Error> {
        let shares = self.shares;
        for subset in (0..shares.len()).combinations(k) {
            self.visited += 1;
            let Some(polynomial) = interpolate_subset(shares, &subset)? else {
                continue;
            };
            if self.observe(polynomial.signature(), || polynomial.vote(shares)) {
                debug!("subset {subset:?} agrees with every share, stopping early");
                break;
            }
        }
        Ok(())
    }

    // Subsets are interpolated and fresh polynomials scored in parallel batches, then
    // merged in enumeration order so the outcome matches the sequential search.
    fn run_parallel(&mut self, k: usize, batch_size: usize) -> Result<(), Error> {
        let shares = self.shares;
        let mut subsets = (0..shares.len()).combinations(k);

        loop {
            let batch: Vec<Vec<usize>> = subsets.by_ref().take(batch_size).collect();
            if batch.is_empty() {
                return Ok(());
            }

            let interpolated = batch
                .par_iter()
                .map(|subset| {
                    interpolate_subset(shares, subset)
                        .map(|polynomial| polynomial.map(|p| (p.signature(), p)))
                })
                .collect::<Result<Vec<Option<(Signature, Polynomial)>>, Error>>()?;

            // First occurrence of each signature not already scored
            let fresh: Vec<usize> = {
                let mut seen = HashSet::new();
                interpolated
                    .iter()
                    .enumerate()
                    .filter_map(|(i, entry)| {
                        let (signature, _) = entry.as_ref()?;
                        (!self.cache.contains_key(signature) && seen.insert(signature))
                            .then_some(i)
                    })
                    .collect()
            };

            let mut scored: HashMap<usize, Candidate> = fresh
                .par_iter()
                .filter_map(|&i| {
                    let (_, polynomial) = interpolated[i].as_ref()?;
                    Some((i, polynomial.vote(shares)))
                })
                .collect();

            for (i, entry) in interpolated.into_iter().enumerate() {
                self.visited += 1;
                let Some((signature, polynomial)) = entry else {
                    continue;
                };
                let candidate = scored.remove(&i);
                if self.observe(signature, || {
                    candidate.unwrap_or_else(|| polynomial.vote(shares))
                }) {
                    debug!(
                        "subset {:?} agrees with every share, stopping early",
                        batch[i]
                    );
                    return Ok(());
                }
            }
        }
    }

    /// Records one interpolated polynomial. `score` is only called the first time a
    /// signature is seen. Returns true once the leader agrees with every share.
    fn observe<F>(&mut self, signature: Signature, score: F) -> bool
    where
        F: FnOnce() -> Candidate,
    {
        let index = match self.cache.entry(signature) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let candidate = score();
                debug!(
                    "new polynomial {} agrees with {}/{} shares",
                    candidate.polynomial,
                    candidate.agreement,
                    self.shares.len()
                );
                self.candidates.push(candidate);
                *entry.insert(self.candidates.len() - 1)
            }
        };
        trace!("subset #{} -> polynomial #{}", self.visited, index);

        let agreement = self.candidates[index].agreement;
        let leads = match self.best {
            Some(best) => agreement > self.candidates[best].agreement,
            None => true,
        };
        if leads {
            self.best = Some(index);
        }

        self.best
            .is_some_and(|best| self.candidates[best].agreement == self.shares.len())
    }

    fn finish(mut self) -> Result<SearchOutcome, Error> {
        let best = self.best.ok_or(Error::NoValidPolynomial)?;
        let distinct_polynomials = self.candidates.len();

        Ok(SearchOutcome {
            best: self.candidates.swap_remove(best),
            subsets_visited: self.visited,
            distinct_polynomials,
        })
    }
}

// Interpolates the shares at `subset`. Subsets with a repeated abscissa are skipped.
fn interpolate_subset(shares: &[Share], subset: &[usize]) -> Result<Option<Polynomial>, Error> {
    let points: Vec<&Share> = subset.iter().map(|&i| &shares[i]).collect();
    match interpolate(&points) {
        Ok(polynomial) => Ok(Some(polynomial)),
        Err(Error::DuplicateAbscissa(x)) => {
            debug!("skipping subset {subset:?}: repeated abscissa {x}");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Returns `C(n, k)`, saturating at `u128::MAX`.
fn binomial(n: usize, k: usize) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // acc == C(n, i) here, so acc * (n - i) is divisible by i + 1
        acc = match acc.checked_mul((n - i) as u128) {
            Some(product) => product / (i as u128 + 1),
            None => return u128::MAX,
        };
    }
    acc
}
