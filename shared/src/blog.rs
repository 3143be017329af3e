use serde::{Deserialize, Serialize};

use crate::account::AccountView;

/// A blog post published by an admin.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BlogPost {
    pub id: u64,
    pub title: String,
    pub content: String,
    /// The author in account id.
    pub author: u64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Comments in posting order.
    pub comments: Vec<Comment>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Comment {
    pub id: u64,
    pub post: u64,
    pub author: u64,
    pub text: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// How the author of a comment is shown.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", content = "account", rename_all = "snake_case")]
pub enum Byline {
    /// The plain admin label, hiding the admin's profile.
    Admin,
    Account(AccountView),
    /// The author no longer exists.
    Unknown,
}

#[derive(Serialize, Deserialize)]
pub struct NewBlogDescriptor {
    pub title: String,
    pub content: String,
}

#[derive(Serialize, Deserialize)]
pub struct BlogTarget {
    pub id: u64,
}

#[derive(Serialize, Deserialize)]
pub struct CommentDescriptor {
    pub post: u64,
    pub text: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CommentView {
    pub comment: Comment,
    pub byline: Byline,
}

/// A blog post with comment bylines resolved.
#[derive(Serialize, Deserialize, Debug)]
pub struct BlogPostView {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub author: Byline,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub comments: Vec<CommentView>,
}
