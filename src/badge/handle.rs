use axum::{extract::State, Json};
use webster_shared::badge::*;

use crate::{session::RequireSession, Error, Global};

pub async fn list(State(Global { store, .. }): State<Global>) -> Json<Vec<Badge>> {
    Json(store.read().badges.list().to_vec())
}

pub async fn create(
    session: RequireSession,
    State(Global { store, .. }): State<Global>,
    Json(descriptor): Json<BadgeDescriptor>,
) -> Result<Json<Badge>, Error> {
    let mut store = store.write();
    let id = store.create_badge(session.account, descriptor)?;
    store
        .badges
        .get(id)
        .cloned()
        .map(Json)
        .ok_or(Error::BadgeNotFound(id))
}

pub async fn edit(
    session: RequireSession,
    State(Global { store, .. }): State<Global>,
    Json(EditBadgeDescriptor { id, badge }): Json<EditBadgeDescriptor>,
) -> Result<(), Error> {
    store.write().edit_badge(session.account, id, badge)
}

/// Deletes a badge, removing it from every account holding it.
pub async fn delete(
    session: RequireSession,
    State(Global { store, .. }): State<Global>,
    Json(DeleteBadgeDescriptor { id }): Json<DeleteBadgeDescriptor>,
) -> Result<(), Error> {
    store.write().delete_badge(session.account, id)
}
