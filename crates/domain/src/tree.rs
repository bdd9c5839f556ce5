use crate::models::Comment;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// 评论树节点：一条评论加上按时间排序的直接回复
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentNode {
    pub comment: Comment,
    pub replies: Vec<CommentNode>,
}

/// 把按 created_at 升序取出的平铺评论行组装成回复森林。
///
/// 单趟 O(n)，纯迭代：倒序扫描输入，把已组装好的子节点暂存在
/// parent_id -> children 的 map 里，轮到父节点时一次性领走。
/// 父评论的持久化一定先于子评论，所以倒序扫描时子节点必然先被处理。
///
/// 父节点不在本批行里（已被软删、或挂在别的帖子下）的评论会被
/// 提升为根节点，而不是被丢弃，也不会继续向上找更远的祖先。
pub fn build_forest(comments: Vec<Comment>) -> Vec<CommentNode> {
    let ids: HashSet<String> = comments.iter().map(|c| c.id.clone()).collect();

    let mut pending: HashMap<String, Vec<CommentNode>> = HashMap::new();
    let mut roots: Vec<CommentNode> = Vec::new();

    for comment in comments.into_iter().rev() {
        // 倒序收集的子节点也是倒序的，翻回升序
        let mut replies = pending.remove(&comment.id).unwrap_or_default();
        replies.reverse();

        let parent = comment
            .parent_comment_id
            .clone()
            .filter(|p| ids.contains(p));

        let node = CommentNode { comment, replies };
        match parent {
            Some(parent_id) => pending.entry(parent_id).or_default().push(node),
            None => roots.push(node),
        }
    }

    roots.reverse();
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommentStatus, PostId};
    use chrono::DateTime;

    fn comment(id: &str, parent: Option<&str>, depth: i64, seq: i64) -> Comment {
        let ts = DateTime::from_timestamp(1_700_000_000 + seq, 0)
            .unwrap()
            .naive_utc();
        Comment {
            id: id.to_string(),
            post_id: PostId::new_unchecked("post-1".to_string()),
            author_id: "user-1".to_string(),
            author_name: "测试用户".to_string(),
            content: format!("comment {}", id),
            parent_comment_id: parent.map(|p| p.to_string()),
            depth,
            reply_count: 0,
            likes: 0,
            liked_by: Vec::new(),
            comment_type: "comment".to_string(),
            tags: Vec::new(),
            status: CommentStatus::Active,
            created_at: ts,
            updated_at: ts,
        }
    }

    fn collect_ids(forest: &[CommentNode], out: &mut Vec<String>) {
        for node in forest {
            out.push(node.comment.id.clone());
            collect_ids(&node.replies, out);
        }
    }

    #[test]
    fn test_empty_forest() {
        assert!(build_forest(Vec::new()).is_empty());
    }

    #[test]
    fn test_linear_chain() {
        let forest = build_forest(vec![
            comment("r", None, 0, 0),
            comment("c1", Some("r"), 1, 1),
            comment("c2", Some("c1"), 2, 2),
        ]);

        assert_eq!(forest.len(), 1);
        let r = &forest[0];
        assert_eq!(r.comment.id, "r");
        assert_eq!(r.replies.len(), 1);
        assert_eq!(r.replies[0].comment.id, "c1");
        assert_eq!(r.replies[0].replies[0].comment.id, "c2");
        assert!(r.replies[0].replies[0].replies.is_empty());
    }

    #[test]
    fn test_fan_out_preserves_sibling_order() {
        let mut rows = vec![comment("r", None, 0, 0)];
        for i in 1..=5 {
            rows.push(comment(&format!("c{}", i), Some("r"), 1, i));
        }

        let forest = build_forest(rows);
        assert_eq!(forest.len(), 1);
        let replies: Vec<&str> = forest[0]
            .replies
            .iter()
            .map(|n| n.comment.id.as_str())
            .collect();
        assert_eq!(replies, vec!["c1", "c2", "c3", "c4", "c5"]);
    }

    #[test]
    fn test_multiple_roots_in_creation_order() {
        let forest = build_forest(vec![
            comment("a", None, 0, 0),
            comment("b", None, 0, 1),
            comment("c", None, 0, 2),
        ]);
        let ids: Vec<&str> = forest.iter().map(|n| n.comment.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_missing_parent_promotes_to_root() {
        // "ghost" 不在取回的行里（被软删或属于其它帖子）
        let forest = build_forest(vec![
            comment("a", None, 0, 0),
            comment("orphan", Some("ghost"), 3, 1),
        ]);

        let ids: Vec<&str> = forest.iter().map(|n| n.comment.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "orphan"]);
        // depth 保持创建时的值，不因提升为根而归零
        assert_eq!(forest[1].comment.depth, 3);
    }

    #[test]
    fn test_every_comment_appears_exactly_once() {
        let rows = vec![
            comment("r1", None, 0, 0),
            comment("r2", None, 0, 1),
            comment("c1", Some("r1"), 1, 2),
            comment("c2", Some("r2"), 1, 3),
            comment("c3", Some("c1"), 2, 4),
            comment("c4", Some("r1"), 1, 5),
        ];
        let expected = rows.len();

        let forest = build_forest(rows);
        let mut ids = Vec::new();
        collect_ids(&forest, &mut ids);
        assert_eq!(ids.len(), expected);
        let unique: HashSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), expected);
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        // 500 层深度：递归实现会爆栈，迭代实现不在乎
        let mut rows = vec![comment("n0", None, 0, 0)];
        for i in 1..500 {
            rows.push(comment(
                &format!("n{}", i),
                Some(&format!("n{}", i - 1)),
                i,
                i,
            ));
        }

        let forest = build_forest(rows);
        assert_eq!(forest.len(), 1);

        let mut depth = 0;
        let mut cursor = &forest[0];
        while let Some(next) = cursor.replies.first() {
            depth += 1;
            cursor = next;
        }
        assert_eq!(depth, 499);
    }

    #[test]
    fn test_tie_timestamps_keep_insertion_order() {
        // created_at 相同的兄弟按取回顺序稳定排列
        let forest = build_forest(vec![
            comment("r", None, 0, 0),
            comment("x", Some("r"), 1, 1),
            comment("y", Some("r"), 1, 1),
            comment("z", Some("r"), 1, 1),
        ]);
        let replies: Vec<&str> = forest[0]
            .replies
            .iter()
            .map(|n| n.comment.id.as_str())
            .collect();
        assert_eq!(replies, vec!["x", "y", "z"]);
    }
}
