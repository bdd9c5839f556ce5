use crate::{models::SqlComment, Db};
use chrono::Utc;
use domain::{Comment, CommentError, PostId, DELETION_MARKER};
use sqlx::Row;

pub(crate) const COMMENT_COLS: &str = "id, post_id, author_id, author_name, content, \
     parent_comment_id, depth, reply_count, likes, comment_type, tags, status, \
     created_at, updated_at";

impl Db {
    /// 写入一条评论（根评论或回复）。
    /// 回复场景下：父评论存在性校验、子行插入、父行 reply_count 自增
    /// 三步在同一事务里完成，要么全部生效要么全部回滚。
    pub async fn create_comment(
        &self,
        post_id: &PostId,
        author_id: &str,
        author_name: &str,
        content: &str,
        parent_comment_id: Option<&str>,
    ) -> anyhow::Result<Comment> {
        let mut tx = self.pool.begin().await?;

        // 父评论允许处于任意状态（含已软删），只要求行还在
        let depth = match parent_comment_id {
            Some(parent_id) => {
                let row = sqlx::query("SELECT depth FROM comments WHERE id = ?")
                    .bind(parent_id)
                    .fetch_optional(&mut *tx)
                    .await?;
                match row {
                    Some(r) => r.get::<i64, _>(0) + 1,
                    None => {
                        return Err(CommentError::ParentNotFound(parent_id.to_string()).into())
                    }
                }
            }
            None => 0,
        };

        let id = domain::new_comment_id();
        let now = Utc::now().naive_utc();

        sqlx::query(
            r#"
            INSERT INTO comments (
                id, post_id, author_id, author_name, content,
                parent_comment_id, depth, reply_count, likes,
                comment_type, tags, status, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, 0, 0, 'comment', '[]', 'active', ?, ?)
            "#,
        )
        .bind(&id)
        .bind(post_id.as_str())
        .bind(author_id)
        .bind(author_name)
        .bind(content)
        .bind(parent_comment_id)
        .bind(depth)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if let Some(parent_id) = parent_comment_id {
            // SQL 侧原子自增，并发创建兄弟回复不会丢计数
            sqlx::query("UPDATE comments SET reply_count = reply_count + 1 WHERE id = ?")
                .bind(parent_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(Comment {
            id,
            post_id: post_id.clone(),
            author_id: author_id.to_string(),
            author_name: author_name.to_string(),
            content: content.to_string(),
            parent_comment_id: parent_comment_id.map(|p| p.to_string()),
            depth,
            reply_count: 0,
            likes: 0,
            liked_by: Vec::new(),
            comment_type: "comment".to_string(),
            tags: Vec::new(),
            status: domain::CommentStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    /// 按主键取评论，不区分状态；软删行返回占位内容
    pub async fn get_comment(&self, comment_id: &str) -> anyhow::Result<Option<Comment>> {
        let sql = format!("SELECT {} FROM comments WHERE id = ?", COMMENT_COLS);
        let row = sqlx::query_as::<_, SqlComment>(&sql)
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(sql_comment) => {
                let liked_by = self.liked_by(comment_id).await?;
                Ok(Some(sql_comment.into_comment(liked_by)))
            }
            None => Ok(None),
        }
    }

    /// 帖子下的活跃评论，created_at 升序，同时间戳按插入顺序（rowid）稳定排序。
    /// limit 截取最早的 N 条。
    pub async fn list_comments(
        &self,
        post_id: &PostId,
        limit: Option<i64>,
    ) -> anyhow::Result<Vec<Comment>> {
        let sql = format!(
            "SELECT {} FROM comments \
             WHERE post_id = ? AND status = 'active' \
             ORDER BY created_at ASC, rowid ASC \
             LIMIT ?",
            COMMENT_COLS
        );
        let rows = sqlx::query_as::<_, SqlComment>(&sql)
            .bind(post_id.as_str())
            // SQLite 中 LIMIT -1 表示不限制
            .bind(limit.unwrap_or(-1))
            .fetch_all(&self.pool)
            .await?;

        // 点赞集合一次查全帖，避免每行一次子查询
        let mut likes_map = self.likes_for_post(post_id.as_str()).await?;
        Ok(rows
            .into_iter()
            .map(|r| {
                let liked_by = likes_map.remove(&r.id).unwrap_or_default();
                r.into_comment(liked_by)
            })
            .collect())
    }

    /// 软删除：保留行和 ID 以维持评论树结构，只遮蔽内容并隐藏节点。
    /// 不存在的 ID 和已删除的行都按无事发生处理（重试安全，父计数不会二次递减）。
    pub async fn delete_comment(&self, comment_id: &str) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT parent_comment_id, status FROM comments WHERE id = ?")
            .bind(comment_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(row) = row else {
            return Ok(());
        };
        if row.get::<String, _>(1) == "deleted" {
            return Ok(());
        }

        let now = Utc::now().naive_utc();
        sqlx::query(
            "UPDATE comments SET status = 'deleted', content = ?, updated_at = ? WHERE id = ?",
        )
        .bind(DELETION_MARKER)
        .bind(now)
        .bind(comment_id)
        .execute(&mut *tx)
        .await?;

        // 镜像创建时的自增：只动直接父节点，子孙各自的计数不受影响
        if let Some(parent_id) = row.get::<Option<String>, _>(0) {
            sqlx::query("UPDATE comments SET reply_count = reply_count - 1 WHERE id = ?")
                .bind(parent_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// 编辑正文，仅限活跃评论；目标不存在或已删除时返回 None
    pub async fn edit_content(
        &self,
        comment_id: &str,
        content: &str,
    ) -> anyhow::Result<Option<Comment>> {
        let now = Utc::now().naive_utc();
        let res = sqlx::query(
            "UPDATE comments SET content = ?, updated_at = ? WHERE id = ? AND status = 'active'",
        )
        .bind(content)
        .bind(now)
        .bind(comment_id)
        .execute(&self.pool)
        .await?;

        if res.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_comment(comment_id).await
    }

    pub async fn set_comment_type(
        &self,
        comment_id: &str,
        comment_type: &str,
    ) -> anyhow::Result<Option<Comment>> {
        let now = Utc::now().naive_utc();
        let res = sqlx::query("UPDATE comments SET comment_type = ?, updated_at = ? WHERE id = ?")
            .bind(comment_type)
            .bind(now)
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        if res.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_comment(comment_id).await
    }

    pub async fn set_tags(
        &self,
        comment_id: &str,
        tags: &[String],
    ) -> anyhow::Result<Option<Comment>> {
        let now = Utc::now().naive_utc();
        let res = sqlx::query("UPDATE comments SET tags = ?, updated_at = ? WHERE id = ?")
            .bind(serde_json::to_string(tags)?)
            .bind(now)
            .bind(comment_id)
            .execute(&self.pool)
            .await?;

        if res.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_comment(comment_id).await
    }

    /// 管理用原语：直接对 reply_count 加 delta。
    /// 不做下限钳制，调用方自己保证不把计数推成负数。
    pub async fn update_reply_count(&self, comment_id: &str, delta: i64) -> anyhow::Result<()> {
        sqlx::query("UPDATE comments SET reply_count = reply_count + ? WHERE id = ?")
            .bind(delta)
            .bind(comment_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
