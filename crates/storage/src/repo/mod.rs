pub(crate) mod comments;
mod likes;
mod queries;
mod tree;
