use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use domain::PostId;
use serde::Deserialize;

use super::map_store_error;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct AdjustReplyCountRequest {
    pub delta: i64,
}

fn check_admin(headers: &HeaderMap, admin_token: &str) -> Result<(), (StatusCode, String)> {
    let auth_header = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or((
            StatusCode::UNAUTHORIZED,
            "Missing Authorization header".to_string(),
        ))?;
    let expected_token = format!("Bearer {}", admin_token);
    if auth_header != expected_token {
        return Err((StatusCode::FORBIDDEN, "Invalid Admin Token".into()));
    }
    Ok(())
}

/// 全量重算某帖的 reply_count，处理增量维护跑偏后的修复
pub async fn repair_reply_counts(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(post_id_str): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    check_admin(&headers, &state.admin_token)?;

    let post_id = PostId::new(post_id_str).map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let repaired = state
        .db
        .repair_reply_counts(&post_id)
        .await
        .map_err(map_store_error)?;

    Ok(Json(serde_json::json!({ "repaired": repaired })))
}

/// 裸的计数调整原语，只给运维用；不钳制负值
pub async fn adjust_reply_count(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(comment_id): Path<String>,
    Json(payload): Json<AdjustReplyCountRequest>,
) -> Result<Json<&'static str>, (StatusCode, String)> {
    check_admin(&headers, &state.admin_token)?;

    state
        .db
        .update_reply_count(&comment_id, payload.delta)
        .await
        .map_err(map_store_error)?;

    Ok(Json("Updated"))
}
