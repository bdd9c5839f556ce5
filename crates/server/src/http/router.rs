use super::handlers::{admin, comments};
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub fn build_router(state: AppState, allowed_origins: &str) -> Router {
    let cors = if allowed_origins == "*" {
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
            .allow_origin(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .filter_map(|s| s.parse::<HeaderValue>().ok())
            .collect();

        if origins.is_empty() {
            tracing::warn!("CORS config is invalid or empty, falling back to allow ANY.");
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
                .allow_origin(Any)
                .allow_headers(Any)
        } else {
            tracing::info!("CORS enabled for origins: {:?}", origins);
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
                .allow_origin(origins)
                .allow_headers(Any)
        }
    };

    Router::new()
        .route(
            "/api/posts/:post_id/comments",
            get(comments::list_comments).post(comments::post_comment),
        )
        .route(
            "/api/posts/:post_id/comments/tree",
            get(comments::get_comment_tree),
        )
        .route(
            "/api/posts/:post_id/comments/count",
            get(comments::get_comment_count),
        )
        .route(
            "/api/comments/:id",
            get(comments::get_comment)
                .patch(comments::patch_comment)
                .delete(comments::delete_comment),
        )
        .route("/api/comments/:id/like", post(comments::like_comment))
        .route("/api/comments/:id/unlike", post(comments::unlike_comment))
        .route(
            "/api/authors/:author_id/comments",
            get(comments::list_author_comments),
        )
        .route(
            "/api/admin/posts/:post_id/repair-counts",
            post(admin::repair_reply_counts),
        )
        .route(
            "/api/admin/comments/:id/reply-count",
            post(admin::adjust_reply_count),
        )
        .layer(cors)
        .with_state(state)
}
