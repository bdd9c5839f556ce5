use crate::Db;
use domain::{build_forest, CommentNode, PostId};

impl Db {
    /// 重建整帖的回复森林：按时间序取活跃评论，内存中一趟组装。
    /// 只读路径，可与写操作并发执行。
    pub async fn build_comment_tree(&self, post_id: &PostId) -> anyhow::Result<Vec<CommentNode>> {
        let comments = self.list_comments(post_id, None).await?;
        Ok(build_forest(comments))
    }
}

#[cfg(test)]
mod tests {
    use crate::test_db;
    use domain::PostId;

    #[tokio::test]
    async fn test_empty_post_yields_empty_forest() {
        let db = test_db().await;
        let p = PostId::new("post-with-no-comments").unwrap();
        assert!(db.build_comment_tree(&p).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_nested_tree_shape() {
        let db = test_db().await;
        let p = PostId::new("post-1").unwrap();

        let r = db.create_comment(&p, "u1", "A", "root", None).await.unwrap();
        let c1 = db
            .create_comment(&p, "u2", "B", "reply", Some(&r.id))
            .await
            .unwrap();
        let c2 = db
            .create_comment(&p, "u3", "C", "reply of reply", Some(&c1.id))
            .await
            .unwrap();

        let forest = db.build_comment_tree(&p).await.unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].comment.id, r.id);
        assert_eq!(forest[0].replies[0].comment.id, c1.id);
        assert_eq!(forest[0].replies[0].replies[0].comment.id, c2.id);
        assert!(forest[0].replies[0].replies[0].replies.is_empty());
    }

    #[tokio::test]
    async fn test_fan_out_order() {
        let db = test_db().await;
        let p = PostId::new("post-1").unwrap();

        let r = db.create_comment(&p, "u1", "A", "root", None).await.unwrap();
        let mut expected = Vec::new();
        for i in 0..5 {
            let c = db
                .create_comment(&p, "u2", "B", &format!("r{}", i), Some(&r.id))
                .await
                .unwrap();
            expected.push(c.id);
        }

        let forest = db.build_comment_tree(&p).await.unwrap();
        assert_eq!(forest.len(), 1);
        let got: Vec<String> = forest[0]
            .replies
            .iter()
            .map(|n| n.comment.id.clone())
            .collect();
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn test_deleted_parent_promotes_child_to_root() {
        let db = test_db().await;
        let p = PostId::new("post-1").unwrap();

        let a = db.create_comment(&p, "u1", "A", "parent", None).await.unwrap();
        let b = db
            .create_comment(&p, "u2", "B", "child", Some(&a.id))
            .await
            .unwrap();
        db.delete_comment(&a.id).await.unwrap();

        let forest = db.build_comment_tree(&p).await.unwrap();
        // A 被软删后不再出现，B 提升为根而不是被丢弃
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].comment.id, b.id);
        assert!(forest[0].replies.is_empty());
        assert_eq!(forest[0].comment.depth, 1);
    }

    #[tokio::test]
    async fn test_tree_excludes_other_posts() {
        let db = test_db().await;
        let p1 = PostId::new("post-1").unwrap();
        let p2 = PostId::new("post-2").unwrap();

        db.create_comment(&p1, "u1", "A", "here", None).await.unwrap();
        db.create_comment(&p2, "u2", "B", "elsewhere", None).await.unwrap();

        let forest = db.build_comment_tree(&p1).await.unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].comment.content, "here");
    }
}
