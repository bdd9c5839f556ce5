use crate::{models::SqlComment, repo::comments::COMMENT_COLS, Db};
use domain::{Comment, PostId};
use sqlx::Row;

impl Db {
    /// 某作者的全部评论，不过滤状态：个人页保留已删条目的占位行。
    /// liked_by 不在此路径填充，个人页不展示点赞名单。
    pub async fn list_comments_by_author(&self, author_id: &str) -> anyhow::Result<Vec<Comment>> {
        let sql = format!(
            "SELECT {} FROM comments WHERE author_id = ? ORDER BY created_at ASC, rowid ASC",
            COMMENT_COLS
        );
        let rows = sqlx::query_as::<_, SqlComment>(&sql)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|r| r.into_comment(Vec::new())).collect())
    }

    /// 帖子的活跃评论数，供计数角标使用
    pub async fn comment_count(&self, post_id: &PostId) -> anyhow::Result<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) FROM comments WHERE post_id = ? AND status = 'active'",
        )
        .bind(post_id.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get(0))
    }

    /// 管理修复：全量扫描重算 reply_count。
    /// 基准值取活跃直接子节点数，与「创建 +1 / 软删 -1」的增量规则收敛到同一结果。
    pub async fn repair_reply_counts(&self, post_id: &PostId) -> anyhow::Result<u64> {
        let res = sqlx::query(
            r#"
            UPDATE comments
            SET reply_count = (
                SELECT COUNT(*) FROM comments AS child
                WHERE child.parent_comment_id = comments.id
                  AND child.status = 'active'
            )
            WHERE post_id = ?
            "#,
        )
        .bind(post_id.as_str())
        .execute(&self.pool)
        .await?;

        tracing::info!(
            post_id = %post_id,
            repaired = res.rows_affected(),
            "reply counts repaired"
        );
        Ok(res.rows_affected())
    }
}
