use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use webster_shared::{media::MediaRef, post::handle::GetMediaDescriptor};

use super::Upload;
use crate::{session::RequireSession, Error, Global};

/// Stores an uploaded image with its reference returned.
///
/// The image is checked before the store is locked.
pub async fn upload(
    session: RequireSession,
    State(Global { store, .. }): State<Global>,
    bytes: Bytes,
) -> Result<Json<MediaRef>, Error> {
    let upload = Upload::new(bytes.to_vec())?;
    let media = store.write().media.insert(session.account, upload);
    tracing::debug!("account {} uploaded media {}", session.account, media.hash);
    Ok(Json(media))
}

/// Gets the bytes of an uploaded image.
pub async fn get_media(
    State(Global { store, .. }): State<Global>,
    Json(GetMediaDescriptor { hash }): Json<GetMediaDescriptor>,
) -> Result<impl IntoResponse, Error> {
    let store = store.read();
    let blob = store.media.get(hash).ok_or(Error::MediaNotFound(hash))?;
    Ok((
        [(header::CONTENT_TYPE, blob.mime.to_string())],
        blob.bytes.clone(),
    ))
}
