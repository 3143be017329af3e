pub mod handle;

use serde::{Deserialize, Serialize};

use crate::media::MediaRef;

/// Represents a post posted by a user.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserPost {
    /// The only id of this post.
    pub id: u64,
    /// The author in account id.
    pub author: u64,
    pub content: String,
    /// An uploaded image attached to this post.
    pub media: Option<MediaRef>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
