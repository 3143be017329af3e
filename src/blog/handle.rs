use axum::{extract::State, Json};
use webster_shared::blog::*;

use crate::{session::RequireSession, Error, Global};

/// Lists blog posts, newest first.
pub async fn list(State(Global { store, .. }): State<Global>) -> Json<Vec<BlogPostView>> {
    let store = store.read();
    Json(
        store
            .blogs
            .list()
            .iter()
            .filter_map(|p| store.blogs.view(p.id, &store.accounts))
            .collect(),
    )
}

pub async fn get_post(
    State(Global { store, .. }): State<Global>,
    Json(BlogTarget { id }): Json<BlogTarget>,
) -> Result<Json<BlogPostView>, Error> {
    let store = store.read();
    store
        .blogs
        .view(id, &store.accounts)
        .map(Json)
        .ok_or(Error::BlogPostNotFound(id))
}

pub async fn create(
    session: RequireSession,
    State(Global { store, .. }): State<Global>,
    Json(descriptor): Json<NewBlogDescriptor>,
) -> Result<Json<BlogTarget>, Error> {
    let id = store.write().create_blog(session.account, descriptor)?;
    Ok(Json(BlogTarget { id }))
}

pub async fn delete(
    session: RequireSession,
    State(Global { store, .. }): State<Global>,
    Json(BlogTarget { id }): Json<BlogTarget>,
) -> Result<(), Error> {
    store.write().delete_blog(session.account, id)
}

/// Comments on a blog post and returns the post with the new comment.
pub async fn comment(
    session: RequireSession,
    State(Global { store, .. }): State<Global>,
    Json(CommentDescriptor { post, text }): Json<CommentDescriptor>,
) -> Result<Json<BlogPostView>, Error> {
    let mut store = store.write();
    store.comment(session.account, post, &text)?;
    store
        .blogs
        .view(post, &store.accounts)
        .map(Json)
        .ok_or(Error::BlogPostNotFound(post))
}
