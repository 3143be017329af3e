//! Resolution of location hashes into what the site shows.

use axum::{extract::State, Json};
use webster_shared::route::*;

use crate::{
    account::AccountRef,
    permission::{self, Permission},
    session::RequireSession,
    Global, Store,
};

/// Resolves a location hash for `viewer`.
#[inline]
pub fn resolve(store: &Store, viewer: Option<u64>, hash: &str) -> Resolved {
    resolve_route(store, viewer, Route::from_hash(hash))
}

/// Resolves a route for `viewer`, loading the entity it names.
///
/// A blog post that doesn't exist falls back to the blog list. Pages the
/// viewer may not open redirect to where it can continue.
pub fn resolve_route(store: &Store, viewer: Option<u64>, route: Route) -> Resolved {
    let account = viewer.and_then(|id| store.accounts.get(id));
    match route {
        Route::BlogPost(id) => match store.blogs.view(id, &store.accounts) {
            Some(post) => Resolved::BlogPost { post },
            None => Resolved::Fallback {
                route: Route::Blog,
                hash: Route::Blog.to_hash(),
            },
        },
        Route::Profile if account.is_none() => redirect(Route::Login),
        Route::Shop if permission::authorize(account, Permission::ViewShop).is_err() => {
            redirect(Route::Home)
        }
        Route::AdminDashboard => match account {
            Some(AccountRef::Admin(admin)) => {
                let password_prompt = store
                    .accounts
                    .password_rotation_pending(admin.profile.id);
                Resolved::Dashboard {
                    section: if password_prompt {
                        DashboardSection::ManageAdmins
                    } else {
                        DashboardSection::Overview
                    },
                    password_prompt,
                }
            }
            _ => redirect(Route::AdminLogin),
        },
        route => Resolved::Page { route },
    }
}

#[inline]
fn redirect(route: Route) -> Resolved {
    Resolved::Redirect {
        route,
        hash: route.to_hash(),
    }
}

pub async fn resolve_handle(
    session: Option<RequireSession>,
    State(Global { store, .. }): State<Global>,
    Json(ResolveDescriptor { hash }): Json<ResolveDescriptor>,
) -> Json<Resolved> {
    Json(resolve(
        &store.read(),
        session.map(|s| s.account),
        &hash,
    ))
}
