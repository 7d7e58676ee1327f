//! Vote tally and tie detection.

use crate::entities::votes::VoteCount;
use itertools::Itertools;
use smallvec::SmallVec;

/// Candidate ids sharing the top vote count. Always holds at least two.
pub type TiedSet = SmallVec<[i64; 4]>;

/// Result of tallying one candidate kind of one gathering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TallyOutcome {
    /// Nobody voted in this kind.
    NoVotes,
    /// Exactly one candidate holds the maximum.
    SingleWinner(i64),
    /// Two or more candidates share the maximum, sorted by id.
    Tie(TiedSet),
}

impl TallyOutcome {
    pub fn is_tie(&self) -> bool {
        matches!(self, TallyOutcome::Tie(_))
    }
}

/// Tally group counts into a winner, a tie, or nothing.
pub fn tally(counts: &[VoteCount]) -> TallyOutcome {
    let top = counts.iter().max_set_by_key(|c| c.votes);
    match top.as_slice() {
        [] => TallyOutcome::NoVotes,
        [winner] => TallyOutcome::SingleWinner(winner.candidate_id),
        tied => {
            let mut ids: TiedSet = tied.iter().map(|c| c.candidate_id).collect();
            ids.sort_unstable();
            TallyOutcome::Tie(ids)
        }
    }
}
