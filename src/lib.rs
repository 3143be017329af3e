use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use lettre::transport::smtp;
use parking_lot::RwLock;
use rand::Rng;
use serde::Serialize;

pub mod config;

pub mod account;
pub mod badge;
pub mod blog;
pub mod media;
pub mod permission;
pub mod post;
pub mod route;
pub mod session;
pub mod site;
pub mod store;

/// The module for unit testing, will only be availabled in dev env.
#[cfg(test)]
mod tests;

pub use store::Store;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Email already exists")]
    EmailExists,
    #[error("Username already taken")]
    UsernameTaken,
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("permission denied")]
    PermissionDenied,
    #[error("not logged in")]
    NotLoggedIn,
    #[error("invalid or expired session")]
    SessionExpired,
    #[error("auth header is not in `Bearer {{token}}` syntax")]
    InvalidAuthHeader,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("please verify your email address")]
    Unverified,
    #[error("invalid or expired token")]
    VerificationToken,

    #[error("account {0} not found")]
    AccountNotFound(u64),
    #[error("admin account {0} not found")]
    AdminNotFound(u64),
    #[error("badge {0} not found")]
    BadgeNotFound(u64),
    #[error("blog post {0} not found")]
    BlogPostNotFound(u64),
    #[error("post {0} not found")]
    PostNotFound(u64),
    #[error("media {0} not found")]
    MediaNotFound(u64),

    #[error("cannot delete the last admin account")]
    LastAdmin,
    #[error("cannot delete the default admin until the password is changed")]
    SeedAdminLocked,
    #[error("cannot delete your own account")]
    DeleteSelf,

    #[error("media too large: {0} bytes, max 50MB")]
    MediaTooLarge(usize),
    #[error("unsupported media type")]
    UnsupportedMedia,
    #[error("image error: {0}")]
    Image(image::ImageError),

    #[error("address error: {0}")]
    EmailAddress(lettre::address::AddressError),
    #[error("email message error: {0}")]
    Lettre(lettre::error::Error),
    #[error("invalid smtp settings: {0}")]
    Smtp(smtp::Error),
}

impl Error {
    pub fn to_status_code(&self) -> StatusCode {
        match self {
            Error::EmptyField(_)
            | Error::InvalidAuthHeader
            | Error::VerificationToken
            | Error::Image(_)
            | Error::EmailAddress(_)
            | Error::Smtp(_) => StatusCode::BAD_REQUEST,
            Error::EmailExists
            | Error::UsernameTaken
            | Error::LastAdmin
            | Error::SeedAdminLocked
            | Error::DeleteSelf => StatusCode::CONFLICT,
            Error::NotLoggedIn | Error::SessionExpired | Error::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            Error::AccountNotFound(_)
            | Error::AdminNotFound(_)
            | Error::BadgeNotFound(_)
            | Error::BlogPostNotFound(_)
            | Error::PostNotFound(_)
            | Error::MediaNotFound(_) => StatusCode::NOT_FOUND,
            Error::MediaTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Error::UnsupportedMedia => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Error::Lettre(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::PermissionDenied | Error::Unverified => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for Error {
    #[inline]
    fn into_response(self) -> axum::response::Response {
        #[derive(Serialize)]
        struct ErrorInfo {
            error: String,
        }
        (
            self.to_status_code(),
            axum::Json(ErrorInfo {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Implements `From<T>` for [`Error`].
macro_rules! impl_from {
    ($($t:ty => $v:ident),* $(,)?) => {
        $(
            impl From<$t> for $crate::Error {
                #[inline]
                fn from(err: $t) -> Self {
                    Self::$v(err)
                }
            }
        )*
    };
}

impl_from! {
    lettre::address::AddressError => EmailAddress,
    lettre::error::Error => Lettre,
    smtp::Error => Smtp,
    image::ImageError => Image,
}

/// Shared state of the server.
#[derive(Clone)]
pub struct Global {
    /// All site state, behind one lock so every operation applies atomically.
    pub store: Arc<RwLock<Store>>,
    pub sessions: Arc<session::Sessions>,
    pub config: Arc<config::Config>,
}

impl Global {
    /// Creates the state with the seed data described by `config`.
    pub fn new(config: config::Config) -> Self {
        Self {
            store: Arc::new(RwLock::new(Store::new(&config))),
            sessions: Arc::new(session::Sessions::new()),
            config: Arc::new(config),
        }
    }
}

/// Generates a random nonzero id that `taken` rejects.
pub(crate) fn gen_id(taken: impl Fn(u64) -> bool) -> u64 {
    let mut rng = rand::thread_rng();
    loop {
        let id = rng.gen_range(1..u64::MAX);
        if !taken(id) {
            return id;
        }
    }
}

/// Construct a router.
pub fn router(global: Global) -> axum::Router {
    axum::Router::new()
        // account
        .route("/api/account/register", post(account::handle::register))
        .route("/api/account/verify", post(account::handle::verify_manual))
        .route("/verify", get(account::handle::verify_token))
        .route("/api/account/login", post(account::handle::login))
        .route("/api/admin/login", post(account::handle::admin_login))
        .route("/api/account/logout", post(account::handle::logout))
        .route("/api/account/session", get(account::handle::session))
        .route("/api/account/edit", post(account::handle::edit_profile))
        .route("/api/account/view", post(account::handle::view_profile))
        // account management
        .route("/api/account/list", get(account::handle::manage::list_accounts))
        .route(
            "/api/account/badge/assign",
            post(account::handle::manage::assign_badge),
        )
        .route(
            "/api/account/badge/remove",
            post(account::handle::manage::remove_badge),
        )
        .route("/api/admin/list", get(account::handle::manage::list_admins))
        .route("/api/admin/create", post(account::handle::manage::make_admin))
        .route("/api/admin/modify", post(account::handle::manage::modify_admin))
        .route("/api/admin/delete", post(account::handle::manage::delete_admin))
        .route("/api/admin/link", post(account::handle::manage::link))
        // badges
        .route("/api/badge/list", get(badge::handle::list))
        .route("/api/badge/create", post(badge::handle::create))
        .route("/api/badge/edit", post(badge::handle::edit))
        .route("/api/badge/delete", post(badge::handle::delete))
        // blog
        .route("/api/blog/list", get(blog::handle::list))
        .route("/api/blog/get", post(blog::handle::get_post))
        .route("/api/blog/create", post(blog::handle::create))
        .route("/api/blog/delete", post(blog::handle::delete))
        .route("/api/blog/comment", post(blog::handle::comment))
        // user posts
        .route("/api/post/list", get(post::handle::list))
        .route("/api/post/create", post(post::handle::create))
        .route("/api/post/delete", post(post::handle::delete))
        .route(
            "/api/media/upload",
            post(media::handle::upload).layer(DefaultBodyLimit::max(media::MAX_SIZE)),
        )
        .route("/api/media/get", post(media::handle::get_media))
        // site
        .route(
            "/api/site/styles",
            get(site::handle::styles).post(site::handle::edit_styles),
        )
        .route(
            "/api/site/status",
            get(site::handle::status).post(site::handle::set_status),
        )
        .route(
            "/api/site/smtp",
            get(site::handle::smtp).post(site::handle::save_smtp),
        )
        .route(
            "/api/content",
            get(site::handle::content).post(site::handle::save_content),
        )
        .route("/api/route/resolve", post(route::resolve_handle))
        .with_state(global)
}
