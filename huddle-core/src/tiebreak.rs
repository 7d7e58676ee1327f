//! Deterministic fallback pick among tied candidates.
//!
//! Only the automatic resolution paths use this. The first-registered
//! candidate stands in for the host's implicit top preference.

use crate::tally::TallyOutcome;

/// Uniform access to time and place candidates during tie-breaking.
pub trait Ranked {
    fn identity(&self) -> i64;
    fn display_order(&self) -> i32;
}

/// Pick the lowest `display_order` among `tied`.
///
/// An empty `tied` set means nobody voted; the first candidate of the whole
/// list wins. Returns `None` when no candidate qualifies.
pub fn select_fallback<C: Ranked>(tied: &[i64], candidates: &[C]) -> Option<i64> {
    candidates
        .iter()
        .filter(|c| tied.is_empty() || tied.contains(&c.identity()))
        .min_by_key(|c| c.display_order())
        .map(Ranked::identity)
}

/// Turn a tally outcome into exactly one candidate id.
pub fn resolve<C: Ranked>(outcome: &TallyOutcome, candidates: &[C]) -> Option<i64> {
    match outcome {
        TallyOutcome::SingleWinner(id) => Some(*id),
        TallyOutcome::Tie(tied) => select_fallback(tied, candidates),
        TallyOutcome::NoVotes => select_fallback(&[], candidates),
    }
}
