use axum::{extract::State, Json};
use webster_shared::post::{handle::*, UserPost};

use crate::{session::RequireSession, Error, Global};

pub async fn list(State(Global { store, .. }): State<Global>) -> Json<Vec<UserPost>> {
    Json(store.read().posts.list().to_vec())
}

pub async fn create(
    session: RequireSession,
    State(Global { store, .. }): State<Global>,
    Json(NewPostDescriptor { content, media }): Json<NewPostDescriptor>,
) -> Result<Json<UserPost>, Error> {
    let mut store = store.write();
    let id = store.create_post(session.account, &content, media)?;
    store
        .posts
        .get(id)
        .cloned()
        .map(Json)
        .ok_or(Error::PostNotFound(id))
}

/// Removes a post as a moderator.
pub async fn delete(
    session: RequireSession,
    State(Global { store, .. }): State<Global>,
    Json(PostTarget { id }): Json<PostTarget>,
) -> Result<(), Error> {
    store.write().delete_post(session.account, id)
}
