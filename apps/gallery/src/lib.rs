//! Optimistic likes and comments.
//!
//! The client side ([`application`]) keeps UI state responsive: it applies
//! user intent locally, coalesces bursts into as few requests as possible, and
//! reconciles with whatever the server answers. The server side
//! ([`presentation`]) is a small axum API with the same contract, backed by an
//! in-memory store, for local development and end-to-end tests.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
