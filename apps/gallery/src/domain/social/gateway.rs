//! Remote calls the engine depends on. Every method is a single round trip;
//! dropping the returned future aborts the call.

use super::{
    comment::CommentRecord,
    errors::GatewayError,
    ids::{CommentId, EntityId, UserId},
    like::LikeSnapshot,
};
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LikeGateway: Send + Sync {
    /// `GET /likes?entity_id=`. Read only.
    async fn fetch_like(
        &self,
        entity_id: &EntityId,
        user_id: Option<UserId>,
    ) -> Result<LikeSnapshot, GatewayError>;

    /// `POST /likes`. Flips the user's like server-side and returns the new
    /// authoritative state. One call is exactly one toggle.
    async fn toggle_like(
        &self,
        entity_id: &EntityId,
        user_id: &UserId,
    ) -> Result<LikeSnapshot, GatewayError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentGateway: Send + Sync {
    async fn list_comments(&self, entity_id: &EntityId) -> Result<Vec<CommentRecord>, GatewayError>;

    async fn create_comment(
        &self,
        entity_id: &EntityId,
        user_id: &UserId,
        content: &str,
    ) -> Result<CommentRecord, GatewayError>;

    async fn delete_comment(
        &self,
        comment_id: &CommentId,
        user_id: &UserId,
    ) -> Result<(), GatewayError>;
}
