use crate::domain::social::EntityId;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

/// Body of `POST /comments`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, TS)]
#[ts(export)]
pub struct AddCommentRequest {
    pub entity_id: EntityId,
    #[validate(length(min = 1, max = 500, message = "Comment must be 1-500 characters"))]
    pub content: String,
}

/// Query of `GET /comments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentsQuery {
    pub entity_id: EntityId,
}

/// `{ "data": ... }` wrapper used by the comment endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}
