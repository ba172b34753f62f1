//! Picking seeds out of a finished search. Kept apart from the search so the
//! same candidate set can serve different policies.

use crate::config::Selection;
use crate::error::Error;
use crate::reverse_search::search::CandidateSet;
use crate::types::Accumulator;

pub fn select_minimum(candidates: &CandidateSet) -> Option<Accumulator> {
    candidates.first()
}

/// Smallest candidate that also passes `verify`.
pub fn select_verified_minimum<F>(candidates: &CandidateSet, mut verify: F) -> Result<Option<Accumulator>, Error>
where
    F: FnMut(Accumulator) -> Result<bool, Error>,
{
    for &candidate in candidates {
        if verify(candidate)? {
            return Ok(Some(candidate));
        }
    }
    Ok(None)
}

/// Apply a policy. `All` returns every member in ascending order.
pub fn select(candidates: &CandidateSet, selection: Selection) -> Vec<Accumulator> {
    match selection {
        Selection::Minimum => candidates.first().into_iter().collect(),
        Selection::Maximum => candidates.last().into_iter().collect(),
        Selection::All => candidates.iter().copied().collect(),
    }
}
