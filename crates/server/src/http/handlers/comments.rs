use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::{Comment, CommentNode, PostId};
use serde::Deserialize;

use super::map_store_error;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub author_id: String,
    pub author_name: String,
    pub content: String,
    pub parent_comment_id: Option<String>,
}

#[derive(Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct LikeRequest {
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct PatchCommentRequest {
    pub content: Option<String>,
    pub comment_type: Option<String>,
    pub tags: Option<Vec<String>>,
}

fn parse_post_id(raw: String) -> Result<PostId, (StatusCode, String)> {
    PostId::new(raw).map_err(|e| (StatusCode::BAD_REQUEST, e))
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(post_id_str): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Comment>>, (StatusCode, String)> {
    let post_id = parse_post_id(post_id_str)?;

    let comments = state
        .db
        .list_comments(&post_id, params.limit)
        .await
        .map_err(map_store_error)?;

    Ok(Json(comments))
}

pub async fn get_comment_tree(
    State(state): State<AppState>,
    Path(post_id_str): Path<String>,
) -> Result<Json<Vec<CommentNode>>, (StatusCode, String)> {
    let post_id = parse_post_id(post_id_str)?;

    let forest = state
        .db
        .build_comment_tree(&post_id)
        .await
        .map_err(map_store_error)?;

    Ok(Json(forest))
}

pub async fn get_comment_count(
    State(state): State<AppState>,
    Path(post_id_str): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let post_id = parse_post_id(post_id_str)?;

    let count = state
        .db
        .comment_count(&post_id)
        .await
        .map_err(map_store_error)?;

    Ok(Json(serde_json::json!({ "count": count })))
}

pub async fn post_comment(
    State(state): State<AppState>,
    Path(post_id_str): Path<String>,
    Json(payload): Json<CreateCommentRequest>,
) -> Result<(StatusCode, Json<Comment>), (StatusCode, String)> {
    let post_id = parse_post_id(post_id_str)?;

    // 边界校验放在 HTTP 层，存储层信任入参非空
    if payload.author_id.trim().is_empty() || payload.author_name.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Author must not be empty".into()));
    }
    if payload.content.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "Content must not be empty".into()));
    }

    let comment = state
        .db
        .create_comment(
            &post_id,
            &payload.author_id,
            &payload.author_name,
            &payload.content,
            payload.parent_comment_id.as_deref(),
        )
        .await
        .map_err(map_store_error)?;

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn get_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> Result<Json<Comment>, (StatusCode, String)> {
    let comment = state
        .db
        .get_comment(&comment_id)
        .await
        .map_err(map_store_error)?;

    match comment {
        Some(c) => Ok(Json(c)),
        None => Err((
            StatusCode::NOT_FOUND,
            format!("Comment not found: {}", comment_id),
        )),
    }
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
) -> Result<Json<&'static str>, (StatusCode, String)> {
    // 软删除；不存在的 ID 也返回成功，便于客户端重试
    state
        .db
        .delete_comment(&comment_id)
        .await
        .map_err(map_store_error)?;
    Ok(Json("Deleted"))
}

pub async fn patch_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Json(payload): Json<PatchCommentRequest>,
) -> Result<Json<Comment>, (StatusCode, String)> {
    let mut updated = None;

    if let Some(content) = &payload.content {
        if content.trim().is_empty() {
            return Err((StatusCode::BAD_REQUEST, "Content must not be empty".into()));
        }
        updated = state
            .db
            .edit_content(&comment_id, content)
            .await
            .map_err(map_store_error)?;
    }
    if let Some(comment_type) = &payload.comment_type {
        updated = state
            .db
            .set_comment_type(&comment_id, comment_type)
            .await
            .map_err(map_store_error)?;
    }
    if let Some(tags) = &payload.tags {
        updated = state
            .db
            .set_tags(&comment_id, tags)
            .await
            .map_err(map_store_error)?;
    }

    match updated {
        Some(c) => Ok(Json(c)),
        None => Err((
            StatusCode::NOT_FOUND,
            format!("Comment not found or not editable: {}", comment_id),
        )),
    }
}

pub async fn like_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Json(payload): Json<LikeRequest>,
) -> Result<Json<Comment>, (StatusCode, String)> {
    let comment = state
        .db
        .like_comment(&comment_id, &payload.user_id)
        .await
        .map_err(map_store_error)?;

    match comment {
        Some(c) => Ok(Json(c)),
        None => Err((
            StatusCode::NOT_FOUND,
            format!("Comment not found: {}", comment_id),
        )),
    }
}

pub async fn unlike_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<String>,
    Json(payload): Json<LikeRequest>,
) -> Result<Json<Comment>, (StatusCode, String)> {
    let comment = state
        .db
        .unlike_comment(&comment_id, &payload.user_id)
        .await
        .map_err(map_store_error)?;

    match comment {
        Some(c) => Ok(Json(c)),
        None => Err((
            StatusCode::NOT_FOUND,
            format!("Comment not found: {}", comment_id),
        )),
    }
}

pub async fn list_author_comments(
    State(state): State<AppState>,
    Path(author_id): Path<String>,
) -> Result<Json<Vec<Comment>>, (StatusCode, String)> {
    let comments = state
        .db
        .list_comments_by_author(&author_id)
        .await
        .map_err(map_store_error)?;
    Ok(Json(comments))
}
