pub mod dedup;
pub mod dto;
pub mod guard;

pub use dedup::RecentSubmission;
pub use guard::{SubmissionGuard, SubmissionOptions, ThreadView};
