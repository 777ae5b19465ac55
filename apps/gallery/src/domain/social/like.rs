use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Like state of one entity as seen by one user: whether they like it and how
/// many likes it has in total. This is the body of both `GET` and `POST /likes`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LikeSnapshot {
    pub liked: bool,
    pub count: i64,
}

impl LikeSnapshot {
    pub fn new(liked: bool, count: i64) -> Self {
        Self { liked, count }
    }
}
