use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 软删除后展示的占位内容，原文不可恢复
pub const DELETION_MARKER: &str = "[Deleted]";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(s: impl Into<String>) -> Result<Self, String> {
        let s = s.into();
        if s.is_empty() {
            return Err("Post ID cannot be empty.".to_string());
        }
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
        {
            return Err("Post ID contains invalid characters.".to_string());
        }
        if s.len() > 128 {
            return Err("Post ID is too long (max 128 chars).".to_string());
        }
        Ok(Self(s))
    }

    pub fn new_unchecked(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentStatus {
    Active,
    Deleted,
}

impl CommentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommentStatus::Active => "active",
            CommentStatus::Deleted => "deleted",
        }
    }

    /// 数据库列是纯文本，未知值一律按 active 处理
    pub fn parse(s: &str) -> Self {
        match s {
            "deleted" => CommentStatus::Deleted,
            _ => CommentStatus::Active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub post_id: PostId,
    pub author_id: String,
    // 快照值：发布时的昵称，之后不随用户资料变更
    pub author_name: String,
    pub content: String,
    pub parent_comment_id: Option<String>,
    pub depth: i64,
    pub reply_count: i64,
    pub likes: i64,
    pub liked_by: Vec<String>,
    pub comment_type: String,
    pub tags: Vec<String>,
    pub status: CommentStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Comment {
    pub fn is_active(&self) -> bool {
        self.status == CommentStatus::Active
    }
}
