use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct NewPostDescriptor {
    pub content: String,
    /// Hash of an uploaded image.
    pub media: Option<u64>,
}

#[derive(Serialize, Deserialize)]
pub struct PostTarget {
    pub id: u64,
}

#[derive(Serialize, Deserialize)]
pub struct GetMediaDescriptor {
    pub hash: u64,
}
