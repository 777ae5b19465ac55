//! Timer and task plumbing shared by the reconciliation components.

pub mod debounce;
pub mod in_flight;

pub use debounce::Debouncer;
pub use in_flight::InFlight;
