use axum::{
    extract::{Query, State},
    Json,
};
use webster_shared::site::*;

use crate::{session::RequireSession, Error, Global};

pub async fn styles(State(Global { store, .. }): State<Global>) -> Json<SiteStyles> {
    Json(store.read().site.styles)
}

pub async fn edit_styles(
    session: RequireSession,
    State(Global { store, .. }): State<Global>,
    Json(StylesEditDescriptor { variants }): Json<StylesEditDescriptor>,
) -> Result<Json<SiteStyles>, Error> {
    store
        .write()
        .edit_styles(session.account, variants)
        .map(Json)
}

pub async fn status(State(Global { store, .. }): State<Global>) -> Json<StatusDescriptor> {
    Json(StatusDescriptor {
        status: store.read().site.status,
    })
}

pub async fn set_status(
    session: RequireSession,
    State(Global { store, .. }): State<Global>,
    Json(StatusDescriptor { status }): Json<StatusDescriptor>,
) -> Result<(), Error> {
    store.write().set_status(session.account, status)
}

/// Gets the SMTP settings, without the password.
pub async fn smtp(
    session: RequireSession,
    State(Global { store, .. }): State<Global>,
) -> Result<Json<SmtpSettings>, Error> {
    store.read().smtp(session.account).map(Json)
}

pub async fn save_smtp(
    session: RequireSession,
    State(Global { store, .. }): State<Global>,
    Json(settings): Json<SmtpSettings>,
) -> Result<(), Error> {
    store.write().save_smtp(session.account, settings)
}

/// Gets the section texts of a page, `index` in `en` by default.
pub async fn content(
    State(Global { store, .. }): State<Global>,
    Query(ContentQuery { page, lang }): Query<ContentQuery>,
) -> Json<ContentResult> {
    Json(ContentResult {
        content: store.read().site.content(
            page.as_deref().unwrap_or(super::DEFAULT_PAGE),
            lang.as_deref().unwrap_or(super::DEFAULT_LANG),
        ),
    })
}

pub async fn save_content(
    session: RequireSession,
    State(Global { store, .. }): State<Global>,
    Json(ContentDescriptor {
        page,
        lang,
        content,
    }): Json<ContentDescriptor>,
) -> Result<(), Error> {
    store
        .write()
        .save_content(session.account, &page, &lang, content)
}
