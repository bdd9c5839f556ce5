pub mod admin;
pub mod comments;

use axum::http::StatusCode;
use domain::CommentError;

/// 存储层错误统一落到 500，域内的 ParentNotFound 单独翻译成 404
pub(crate) fn map_store_error(e: anyhow::Error) -> (StatusCode, String) {
    if let Some(CommentError::ParentNotFound(id)) = e.downcast_ref::<CommentError>() {
        return (
            StatusCode::NOT_FOUND,
            format!("Parent comment not found: {}", id),
        );
    }
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
