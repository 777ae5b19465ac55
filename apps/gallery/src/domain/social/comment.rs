use super::ids::{CommentId, EntityId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CommentRecord {
    pub id: CommentId,
    pub entity_id: EntityId,
    pub user_id: UserId,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
