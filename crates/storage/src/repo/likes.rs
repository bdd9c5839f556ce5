use crate::Db;
use chrono::Utc;
use domain::Comment;
use sqlx::Row;
use std::collections::HashMap;

impl Db {
    /// 点赞。幂等：同一用户重复点赞不改变任何状态。
    /// 目标评论不存在时返回 None，调用方可安全重试。
    pub async fn like_comment(
        &self,
        comment_id: &str,
        user_id: &str,
    ) -> anyhow::Result<Option<Comment>> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query("SELECT 1 FROM comments WHERE id = ?")
            .bind(comment_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(None);
        }

        let now = Utc::now().naive_utc();
        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO comment_likes (comment_id, user_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(comment_id)
        .bind(user_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        // likes 列与集合表同事务内联动，保持 likes == len(liked_by)
        if inserted.rows_affected() == 1 {
            sqlx::query("UPDATE comments SET likes = likes + 1, updated_at = ? WHERE id = ?")
                .bind(now)
                .bind(comment_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        self.get_comment(comment_id).await
    }

    /// 取消点赞。从未点过赞的用户取消是无事发生。
    pub async fn unlike_comment(
        &self,
        comment_id: &str,
        user_id: &str,
    ) -> anyhow::Result<Option<Comment>> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query("SELECT 1 FROM comments WHERE id = ?")
            .bind(comment_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Ok(None);
        }

        let removed = sqlx::query("DELETE FROM comment_likes WHERE comment_id = ? AND user_id = ?")
            .bind(comment_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if removed.rows_affected() == 1 {
            let now = Utc::now().naive_utc();
            sqlx::query("UPDATE comments SET likes = likes - 1, updated_at = ? WHERE id = ?")
                .bind(now)
                .bind(comment_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        self.get_comment(comment_id).await
    }

    /// 单条评论的点赞用户列表，按点赞先后排序
    pub(crate) async fn liked_by(&self, comment_id: &str) -> anyhow::Result<Vec<String>> {
        let rows = sqlx::query(
            "SELECT user_id FROM comment_likes WHERE comment_id = ? ORDER BY rowid ASC",
        )
        .bind(comment_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| r.get(0)).collect())
    }

    /// 整帖的点赞集合一次取回，按评论 ID 分组；列表/树查询用它避免 N+1
    pub(crate) async fn likes_for_post(
        &self,
        post_id: &str,
    ) -> anyhow::Result<HashMap<String, Vec<String>>> {
        let rows = sqlx::query(
            r#"
            SELECT l.comment_id, l.user_id
            FROM comment_likes l
            JOIN comments c ON l.comment_id = c.id
            WHERE c.post_id = ?
            ORDER BY l.rowid ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        let mut map: HashMap<String, Vec<String>> = HashMap::new();
        for row in rows {
            map.entry(row.get(0)).or_default().push(row.get(1));
        }
        Ok(map)
    }
}
