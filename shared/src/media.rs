use serde::{Deserialize, Serialize};

/// A reference to an uploaded blob.
///
/// The holder never sees the bytes, only the content hash and its MIME type.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaRef {
    pub hash: u64,
    pub mime: String,
}
