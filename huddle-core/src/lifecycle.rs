//! Gathering lifecycle state machine.
//!
//! ```text
//! VOTING ──► CONFIRMED
//!   │  └───► EXPIRED
//!   └──────► TIEBREAK ──► CONFIRMED
//! ```
//!
//! Nothing returns to `VOTING`, and nothing leaves `CONFIRMED` or `EXPIRED`.

use crate::entities::GatheringStatus;
use thiserror::Error;

/// A transition the lifecycle does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("gathering cannot move from {from:?} to {to:?}")]
pub struct TransitionError {
    pub from: GatheringStatus,
    pub to: GatheringStatus,
}

impl GatheringStatus {
    /// `CONFIRMED` and `EXPIRED` accept no further status writes.
    pub fn is_terminal(self) -> bool {
        matches!(self, GatheringStatus::Confirmed | GatheringStatus::Expired)
    }

    pub fn can_transition_to(self, next: GatheringStatus) -> bool {
        use GatheringStatus::*;
        matches!(
            (self, next),
            (Voting, Confirmed) | (Voting, Tiebreak) | (Voting, Expired) | (Tiebreak, Confirmed)
        )
    }

    /// Validate a transition, returning the new status.
    pub fn transition(self, next: GatheringStatus) -> Result<GatheringStatus, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError {
                from: self,
                to: next,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::GatheringStatus::*;

    const ALL: [GatheringStatus; 4] = [Voting, Tiebreak, Confirmed, Expired];

    #[test]
    fn test_legal_transitions() {
        assert_eq!(Voting.transition(Confirmed), Ok(Confirmed));
        assert_eq!(Voting.transition(Tiebreak), Ok(Tiebreak));
        assert_eq!(Voting.transition(Expired), Ok(Expired));
        assert_eq!(Tiebreak.transition(Confirmed), Ok(Confirmed));
    }

    #[test]
    fn test_terminal_states_are_final() {
        for from in [Confirmed, Expired] {
            assert!(from.is_terminal());
            for to in ALL {
                assert_eq!(from.transition(to), Err(TransitionError { from, to }));
            }
        }
    }

    #[test]
    fn test_nothing_returns_to_voting() {
        for from in ALL {
            assert!(!from.can_transition_to(Voting));
        }
        assert!(!Tiebreak.can_transition_to(Expired));
        assert!(!Tiebreak.can_transition_to(Tiebreak));
    }
}
