use super::{
    handlers::{comments, health, likes},
    middleware::request_id::request_id_middleware,
    state::AppState,
};
use axum::{
    Router, middleware,
    routing::{delete, get},
};
use tower_http::trace::TraceLayer;

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/likes", get(likes::get_like).post(likes::toggle_like))
        .route(
            "/comments",
            get(comments::list_comments).post(comments::add_comment),
        )
        .route("/comments/{id}", delete(comments::delete_comment));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
