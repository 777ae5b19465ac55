pub mod dto;
pub mod reconciler;
pub mod state;

pub use reconciler::{ToggleOptions, ToggleReconciler};
pub use state::{Dispatch, DispatchKind, LikeView, ReadTicket, Reconciled, ToggleState};
