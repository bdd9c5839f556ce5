mod error;
mod id;
mod models;
mod tree;

pub use error::CommentError;
pub use id::new_comment_id;
pub use models::{Comment, CommentStatus, PostId, DELETION_MARKER};
pub use tree::{build_forest, CommentNode};
