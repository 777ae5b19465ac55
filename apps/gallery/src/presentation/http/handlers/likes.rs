use crate::application::toggle_like::dto::{LikeQuery, ToggleLikeRequest};
use crate::domain::social::LikeSnapshot;
use crate::presentation::http::{
    errors::AppError,
    middleware::user::{optional_user, required_user},
    state::AppState,
};
use axum::{
    Json,
    extract::{Query, State},
    http::HeaderMap,
};

/// `GET /api/likes?entity_id=`. Anonymous callers get the count with
/// `liked: false`.
pub async fn get_like(
    State(state): State<AppState>,
    Query(query): Query<LikeQuery>,
    headers: HeaderMap,
) -> Result<Json<LikeSnapshot>, AppError> {
    let user_id = optional_user(&headers);
    let snapshot = state
        .social_repo
        .like_state(&query.entity_id, user_id.as_ref())
        .await?;
    Ok(Json(snapshot))
}

pub async fn toggle_like(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ToggleLikeRequest>,
) -> Result<Json<LikeSnapshot>, AppError> {
    let user_id = required_user(&headers)?;
    let snapshot = state
        .social_repo
        .toggle_like(&body.entity_id, &user_id)
        .await?;
    tracing::debug!(
        entity_id = %body.entity_id,
        user_id = %user_id,
        liked = snapshot.liked,
        count = snapshot.count,
        "like toggled"
    );
    Ok(Json(snapshot))
}
