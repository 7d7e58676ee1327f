pub mod confirm;
pub mod error;
pub mod gathering;
pub mod result;

pub use confirm::CandidateSelection;
pub use error::{ErrorCode, ErrorResponse};
pub use gathering::{ConfirmedBy, GatheringKind, GatheringStatus};
pub use result::{ConfirmedPlace, ConfirmedResultResponse, ConfirmedTime};
