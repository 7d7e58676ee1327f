use serde::{Deserialize, Serialize};

/// Which candidate categories a gathering votes on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatheringKind {
    TimeOnly,
    PlaceOnly,
    Both,
}

impl GatheringKind {
    /// Whether time candidates take part in voting and confirmation.
    pub fn uses_time(self) -> bool {
        !matches!(self, GatheringKind::PlaceOnly)
    }

    /// Whether place candidates take part in voting and confirmation.
    pub fn uses_place(self) -> bool {
        !matches!(self, GatheringKind::TimeOnly)
    }
}

/// Lifecycle status of a gathering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GatheringStatus {
    Voting,
    Tiebreak,
    Confirmed,
    Expired,
}

/// How a confirmed result came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfirmedBy {
    /// Resolved by the deadline scheduler.
    Auto,
    /// Chosen explicitly by the host.
    Host,
}
