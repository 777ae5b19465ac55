use crate::application::submit_comment::dto::{AddCommentRequest, CommentsQuery, DataEnvelope};
use crate::domain::social::{CommentId, CommentRecord};
use crate::presentation::http::{
    errors::AppError, middleware::user::required_user, state::AppState,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use serde_json::json;
use validator::Validate;

pub async fn add_comment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<AddCommentRequest>,
) -> Result<(StatusCode, Json<DataEnvelope<CommentRecord>>), AppError> {
    let user_id = required_user(&headers)?;
    body.validate()?;
    if body.content.trim().is_empty() {
        return Err(AppError::ValidationError("Comment cannot be empty".into()));
    }

    let record = state
        .social_repo
        .add_comment(body.entity_id, user_id, body.content)
        .await?;
    tracing::info!(
        comment_id = %record.id,
        entity_id = %record.entity_id,
        "comment created"
    );
    Ok((StatusCode::CREATED, Json(DataEnvelope { data: record })))
}

/// Thread of one entity, oldest first.
pub async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<CommentsQuery>,
) -> Result<Json<DataEnvelope<Vec<CommentRecord>>>, AppError> {
    let comments = state.social_repo.get_comments(&query.entity_id).await?;
    Ok(Json(DataEnvelope { data: comments }))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<CommentId>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, AppError> {
    let user_id = required_user(&headers)?;
    state
        .social_repo
        .delete_comment(&comment_id, &user_id)
        .await?;
    tracing::info!(comment_id = %comment_id, "comment deleted");
    Ok(Json(json!({ "data": { "id": comment_id } })))
}
