use chrono::NaiveDateTime;
use domain::{Comment, CommentStatus, PostId};
use sqlx::FromRow;

#[derive(FromRow)]
pub struct SqlComment {
    pub id: String,
    pub post_id: String,
    pub author_id: String,
    pub author_name: String,
    pub content: String,
    pub parent_comment_id: Option<String>,
    pub depth: i64,
    pub reply_count: i64,
    pub likes: i64,
    pub comment_type: String,
    pub tags: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl SqlComment {
    /// liked_by 不是 comments 表的列，由调用方从 comment_likes 查好后注入
    pub fn into_comment(self, liked_by: Vec<String>) -> Comment {
        Comment {
            id: self.id,
            post_id: PostId::new_unchecked(self.post_id),
            author_id: self.author_id,
            author_name: self.author_name,
            content: self.content,
            parent_comment_id: self.parent_comment_id,
            depth: self.depth,
            reply_count: self.reply_count,
            likes: self.likes,
            liked_by,
            comment_type: self.comment_type,
            // 坏数据按空数组处理，不让一行脏 JSON 拖垮整个列表
            tags: serde_json::from_str(&self.tags).unwrap_or_default(),
            status: CommentStatus::parse(&self.status),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
