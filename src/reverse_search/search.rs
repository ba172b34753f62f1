use crate::error::Error;
use crate::evaluator::TransitionEvaluator;
use crate::reverse_search::target::TargetSequence;
use crate::types::{append_digit, Accumulator, Digit, Radix};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::btree_set;
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{debug, info};

/// Accumulators consistent with every target digit consumed so far.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct CandidateSet {
    members: BTreeSet<Accumulator>,
}

impl CandidateSet {
    /// The single trivial seed every search starts from.
    pub fn seed() -> Self {
        let mut members = BTreeSet::new();
        members.insert(0);
        CandidateSet { members }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, acc: Accumulator) -> bool {
        self.members.contains(&acc)
    }

    /// Ascending order.
    pub fn iter(&self) -> btree_set::Iter<'_, Accumulator> {
        self.members.iter()
    }

    pub fn first(&self) -> Option<Accumulator> {
        self.members.iter().next().copied()
    }

    pub fn last(&self) -> Option<Accumulator> {
        self.members.iter().next_back().copied()
    }

    pub fn into_vec(self) -> Vec<Accumulator> {
        self.members.into_iter().collect()
    }
}

impl std::iter::FromIterator<Accumulator> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = Accumulator>>(iter: I) -> Self {
        CandidateSet {
            members: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Accumulator;
    type IntoIter = btree_set::Iter<'a, Accumulator>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchOptions {
    /// Fail with `Error::CandidateLimit` when a level grows beyond this.
    pub max_candidates: Option<usize>,
    pub parallel: bool,
}

/// Size of one search level before and after pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelStats {
    /// 1-based; level `k` has consumed `k` digits from the end of the target.
    pub level: usize,
    pub digit: Digit,
    /// (candidate, trial digit) pairs handed to the evaluator.
    pub examined: usize,
    pub retained: usize,
}

/// Every accumulator whose emitted sequence is exactly `target`.
///
/// The target is consumed from its last digit to its first. Each level
/// appends one low-order digit to every surviving candidate and keeps the
/// extensions the evaluator accepts for that level's digit, so the previous
/// levels' checks, made on what are now the high-order digits, stay valid.
///
/// An empty result means no seed reproduces the target; it is not an error.
pub fn solve<E>(
    target: &TargetSequence,
    evaluator: &E,
    options: &SearchOptions,
) -> Result<CandidateSet, Error>
where
    E: TransitionEvaluator + ?Sized,
{
    solve_traced(target, evaluator, options).map(|(candidates, _)| candidates)
}

/// `solve`, also returning the size of every level.
pub fn solve_traced<E>(
    target: &TargetSequence,
    evaluator: &E,
    options: &SearchOptions,
) -> Result<(CandidateSet, Vec<LevelStats>), Error>
where
    E: TransitionEvaluator + ?Sized,
{
    let radix = target.radix();
    if let Some(evaluator_radix) = evaluator.radix() {
        if evaluator_radix != radix {
            return Err(Error::RadixMismatch {
                target: radix,
                evaluator: evaluator_radix,
            });
        }
    }

    info!(
        digits = target.len(),
        radix,
        parallel = options.parallel,
        "starting preimage search"
    );
    let start_time = Instant::now();

    let mut candidates = CandidateSet::seed();
    let mut stats = Vec::with_capacity(target.len());

    for (index, &digit) in target.digits().iter().rev().enumerate() {
        let level = index + 1;
        let examined = candidates.len() * radix as usize;
        let next = if options.parallel {
            expand_level_parallel(&candidates, digit, radix, evaluator, level)?
        } else {
            expand_level(&candidates, digit, radix, evaluator, level)?
        };

        debug!(level, digit, examined, retained = next.len(), "level expanded");
        stats.push(LevelStats {
            level,
            digit,
            examined,
            retained: next.len(),
        });

        if let Some(limit) = options.max_candidates {
            if next.len() > limit {
                return Err(Error::CandidateLimit {
                    level,
                    size: next.len(),
                    limit,
                });
            }
        }
        if next.is_empty() {
            debug!(level, "no candidate survived");
        }
        candidates = next;
    }

    info!(
        candidates = candidates.len(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "preimage search completed"
    );
    Ok((candidates, stats))
}

/// Extensions of one candidate that emit `digit`.
#[inline]
fn extensions<E>(
    candidate: Accumulator,
    digit: Digit,
    radix: Radix,
    evaluator: &E,
    level: usize,
) -> Result<Vec<Accumulator>, Error>
where
    E: TransitionEvaluator + ?Sized,
{
    let mut found = Vec::new();
    for trial in 0..radix {
        let acc = append_digit(candidate, radix, trial).ok_or(Error::AccumulatorOverflow { level })?;
        if evaluator.accepts(acc, digit) {
            found.push(acc);
        }
    }
    Ok(found)
}

fn expand_level<E>(
    previous: &CandidateSet,
    digit: Digit,
    radix: Radix,
    evaluator: &E,
    level: usize,
) -> Result<CandidateSet, Error>
where
    E: TransitionEvaluator + ?Sized,
{
    let mut next = BTreeSet::new();
    for &candidate in previous {
        next.extend(extensions(candidate, digit, radix, evaluator, level)?);
    }
    Ok(CandidateSet { members: next })
}

fn expand_level_parallel<E>(
    previous: &CandidateSet,
    digit: Digit,
    radix: Radix,
    evaluator: &E,
    level: usize,
) -> Result<CandidateSet, Error>
where
    E: TransitionEvaluator + ?Sized,
{
    let groups: Vec<Vec<Accumulator>> = previous
        .members
        .par_iter()
        .map(|&candidate| extensions(candidate, digit, radix, evaluator, level))
        .collect::<Result<_, Error>>()?;
    Ok(groups.into_iter().flatten().collect())
}
