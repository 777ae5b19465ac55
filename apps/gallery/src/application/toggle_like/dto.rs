use crate::domain::social::EntityId;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Body of `POST /likes`. The server flips the caller's like and answers with
/// the resulting [`LikeSnapshot`](crate::domain::social::LikeSnapshot).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ToggleLikeRequest {
    pub entity_id: EntityId,
}

/// Query of `GET /likes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeQuery {
    pub entity_id: EntityId,
}
