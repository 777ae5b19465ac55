use crate::domain::social::{
    CommentId, CommentRecord, DomainError, EntityId, LikeSnapshot, UserId,
    repository::SocialRepository,
};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// Process-local storage for likes and comments.
#[derive(Default)]
pub struct InMemoryInteractionStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    likes: HashMap<EntityId, HashSet<UserId>>,
    /// Insertion order is creation order.
    comments: Vec<CommentRecord>,
}

impl InMemoryInteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn snapshot(tables: &Tables, entity_id: &EntityId, user_id: Option<&UserId>) -> LikeSnapshot {
        let likers = tables.likes.get(entity_id);
        LikeSnapshot {
            liked: user_id
                .zip(likers)
                .is_some_and(|(user, likers)| likers.contains(user)),
            count: likers.map_or(0, |l| l.len() as i64),
        }
    }
}

#[async_trait]
impl SocialRepository for InMemoryInteractionStore {
    async fn toggle_like(
        &self,
        entity_id: &EntityId,
        user_id: &UserId,
    ) -> Result<LikeSnapshot, DomainError> {
        let mut tables = self.tables.write();
        let likers = tables.likes.entry(entity_id.clone()).or_default();
        if !likers.remove(user_id) {
            likers.insert(user_id.clone());
        }
        Ok(Self::snapshot(&tables, entity_id, Some(user_id)))
    }

    async fn like_state(
        &self,
        entity_id: &EntityId,
        user_id: Option<&UserId>,
    ) -> Result<LikeSnapshot, DomainError> {
        Ok(Self::snapshot(&self.tables.read(), entity_id, user_id))
    }

    async fn add_comment(
        &self,
        entity_id: EntityId,
        user_id: UserId,
        content: String,
    ) -> Result<CommentRecord, DomainError> {
        let content = content.trim().to_string();
        if content.is_empty() {
            return Err(DomainError::ValidationError(
                "Comment cannot be empty".into(),
            ));
        }

        let record = CommentRecord {
            id: CommentId::new(Uuid::now_v7().to_string()),
            entity_id,
            user_id,
            content,
            created_at: Utc::now(),
        };
        self.tables.write().comments.push(record.clone());
        Ok(record)
    }

    async fn get_comments(&self, entity_id: &EntityId) -> Result<Vec<CommentRecord>, DomainError> {
        Ok(self
            .tables
            .read()
            .comments
            .iter()
            .filter(|c| &c.entity_id == entity_id)
            .cloned()
            .collect())
    }

    async fn delete_comment(
        &self,
        comment_id: &CommentId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.write();
        let index = tables
            .comments
            .iter()
            .position(|c| &c.id == comment_id)
            .ok_or_else(|| DomainError::NotFound(format!("comment {comment_id}")))?;
        if &tables.comments[index].user_id != user_id {
            return Err(DomainError::Forbidden(
                "Only the author can delete this comment".into(),
            ));
        }
        tables.comments.remove(index);
        Ok(())
    }
}
