pub mod notifications;
pub mod session;
pub mod submit_comment;
pub mod toggle_like;

pub use notifications::{Notification, NotificationKind, NotificationLevel, Notifier};
pub use session::StaticSession;
pub use submit_comment::{SubmissionGuard, SubmissionOptions, ThreadView};
pub use toggle_like::{LikeView, ToggleOptions, ToggleReconciler};
