//! Likeable entities, their comment threads, and the seams the client engine
//! talks through.

pub mod comment;
pub mod errors;
pub mod gateway;
pub mod ids;
pub mod like;
pub mod repository;
pub mod session;

pub use comment::CommentRecord;
pub use errors::{DomainError, GatewayError, Rejection};
pub use gateway::{CommentGateway, LikeGateway};
pub use ids::{CommentId, EntityId, UserId};
pub use like::LikeSnapshot;
pub use session::Session;
