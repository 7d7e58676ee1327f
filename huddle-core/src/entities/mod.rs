pub mod candidates;
pub mod confirmed_result;
pub mod gathering;
pub mod votes;

use huddle_sdk::objects::{
    ConfirmedBy as SdkConfirmedBy, GatheringKind as SdkGatheringKind,
    GatheringStatus as SdkGatheringStatus,
};

/// Gathering kind for database operations.
///
/// This is the sqlx::Type version. For API/DTO use, see `huddle_sdk::objects::GatheringKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "snake_case", type_name = "gathering_kind")]
pub enum GatheringKind {
    TimeOnly,
    PlaceOnly,
    Both,
}

impl GatheringKind {
    pub fn uses_time(self) -> bool {
        !matches!(self, GatheringKind::PlaceOnly)
    }

    pub fn uses_place(self) -> bool {
        !matches!(self, GatheringKind::TimeOnly)
    }
}

impl From<GatheringKind> for SdkGatheringKind {
    fn from(value: GatheringKind) -> Self {
        match value {
            GatheringKind::TimeOnly => SdkGatheringKind::TimeOnly,
            GatheringKind::PlaceOnly => SdkGatheringKind::PlaceOnly,
            GatheringKind::Both => SdkGatheringKind::Both,
        }
    }
}

impl From<SdkGatheringKind> for GatheringKind {
    fn from(value: SdkGatheringKind) -> Self {
        match value {
            SdkGatheringKind::TimeOnly => GatheringKind::TimeOnly,
            SdkGatheringKind::PlaceOnly => GatheringKind::PlaceOnly,
            SdkGatheringKind::Both => GatheringKind::Both,
        }
    }
}

/// Gathering lifecycle status for database operations.
///
/// Legal transitions live in [`crate::lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "gathering_status")]
pub enum GatheringStatus {
    Voting,
    Tiebreak,
    Confirmed,
    Expired,
}

impl From<GatheringStatus> for SdkGatheringStatus {
    fn from(value: GatheringStatus) -> Self {
        match value {
            GatheringStatus::Voting => SdkGatheringStatus::Voting,
            GatheringStatus::Tiebreak => SdkGatheringStatus::Tiebreak,
            GatheringStatus::Confirmed => SdkGatheringStatus::Confirmed,
            GatheringStatus::Expired => SdkGatheringStatus::Expired,
        }
    }
}

impl From<SdkGatheringStatus> for GatheringStatus {
    fn from(value: SdkGatheringStatus) -> Self {
        match value {
            SdkGatheringStatus::Voting => GatheringStatus::Voting,
            SdkGatheringStatus::Tiebreak => GatheringStatus::Tiebreak,
            SdkGatheringStatus::Confirmed => GatheringStatus::Confirmed,
            SdkGatheringStatus::Expired => GatheringStatus::Expired,
        }
    }
}

/// Which candidate table a vote refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "candidate_kind")]
pub enum CandidateKind {
    Time,
    Place,
}

impl std::fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateKind::Time => write!(f, "time"),
            CandidateKind::Place => write!(f, "place"),
        }
    }
}

/// How a confirmed result was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(rename_all = "lowercase", type_name = "confirm_type")]
pub enum ConfirmType {
    Auto,
    Host,
}

impl From<ConfirmType> for SdkConfirmedBy {
    fn from(value: ConfirmType) -> Self {
        match value {
            ConfirmType::Auto => SdkConfirmedBy::Auto,
            ConfirmType::Host => SdkConfirmedBy::Host,
        }
    }
}

impl From<SdkConfirmedBy> for ConfirmType {
    fn from(value: SdkConfirmedBy) -> Self {
        match value {
            SdkConfirmedBy::Auto => ConfirmType::Auto,
            SdkConfirmedBy::Host => ConfirmType::Host,
        }
    }
}
