use super::{
    comment::CommentRecord,
    errors::DomainError,
    ids::{CommentId, EntityId, UserId},
    like::LikeSnapshot,
};
use async_trait::async_trait;

/// Server-side storage behind the contract endpoints.
#[async_trait]
pub trait SocialRepository: Send + Sync {
    async fn toggle_like(
        &self,
        entity_id: &EntityId,
        user_id: &UserId,
    ) -> Result<LikeSnapshot, DomainError>;
    async fn like_state(
        &self,
        entity_id: &EntityId,
        user_id: Option<&UserId>,
    ) -> Result<LikeSnapshot, DomainError>;
    async fn add_comment(
        &self,
        entity_id: EntityId,
        user_id: UserId,
        content: String,
    ) -> Result<CommentRecord, DomainError>;
    async fn get_comments(&self, entity_id: &EntityId) -> Result<Vec<CommentRecord>, DomainError>;
    async fn delete_comment(
        &self,
        comment_id: &CommentId,
        user_id: &UserId,
    ) -> Result<(), DomainError>;
}
