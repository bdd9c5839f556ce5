use thiserror::Error;

/// 评论域内唯一需要类型化的错误。
/// 其余失败（连接、SQL 约束）统一走 anyhow 向上透传。
#[derive(Debug, Error)]
pub enum CommentError {
    #[error("parent comment not found: {0}")]
    ParentNotFound(String),
}
