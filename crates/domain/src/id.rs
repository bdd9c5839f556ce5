use rand::{distributions::Alphanumeric, Rng};

/// 生成形如 `comment-aB3xK9...` 的随机 ID。
/// 16 位字母数字 ≈ 95 bit 熵，碰撞概率可以忽略。
pub fn new_comment_id() -> String {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(16)
        .map(char::from)
        .collect();
    format!("comment-{}", token)
}
