use axum::{
    extract::{Query, State},
    Json,
};
use webster_shared::{
    account::handle::*,
    route::DashboardSection,
};

use crate::{session::RequireSession, Error, Global};

/// Creates an unverified account and composes its verification notice.
pub async fn register(
    State(Global { store, config, .. }): State<Global>,
    Json(descriptor): Json<RegisterDescriptor>,
) -> Result<Json<RegisterResult>, Error> {
    let email: lettre::Address = descriptor.email.trim().parse()?;
    let (account_id, notice) = store.write().register(
        &config.mail,
        &descriptor.username,
        email,
        &descriptor.password,
    )?;
    Ok(Json(RegisterResult { account_id, notice }))
}

/// Verifies an account without a token.
///
/// This backs the manual verify button of the simulated email flow, so it
/// takes no session and accepts any account id.
pub async fn verify_manual(
    State(Global { store, .. }): State<Global>,
    Json(ManualVerifyDescriptor { account_id }): Json<ManualVerifyDescriptor>,
) -> Result<(), Error> {
    store.write().accounts.verify(account_id)?;
    tracing::info!("verified account {account_id} manually");
    Ok(())
}

/// Verifies an account through the link of its verification notice.
pub async fn verify_token(
    State(Global { store, .. }): State<Global>,
    Query(VerifyTokenQuery { token }): Query<VerifyTokenQuery>,
) -> Result<Json<ManualVerifyDescriptor>, Error> {
    let account_id = store
        .write()
        .accounts
        .verify_token(&token, chrono::Utc::now())?;
    tracing::info!("verified account {account_id} by token");
    Ok(Json(ManualVerifyDescriptor { account_id }))
}

pub async fn login(
    State(Global {
        store, sessions, ..
    }): State<Global>,
    Json(LoginDescriptor { email, password }): Json<LoginDescriptor>,
) -> Result<Json<LoginResult>, Error> {
    let email = parse_login_email(&email)?;
    let account_id = store.read().accounts.login(&email, &password)?;
    let token = sessions.open(account_id);
    tracing::info!("account {account_id} logged in");
    Ok(Json(LoginResult { account_id, token }))
}

/// Logs in to an admin account.
///
/// The seed admin is sent to the admin management section until it
/// changes its password.
pub async fn admin_login(
    State(Global {
        store, sessions, ..
    }): State<Global>,
    Json(LoginDescriptor { email, password }): Json<LoginDescriptor>,
) -> Result<Json<AdminLoginResult>, Error> {
    let email = parse_login_email(&email)?;
    let (account_id, force_password_change) =
        store.read().accounts.admin_login(&email, &password)?;
    let token = sessions.open(account_id);
    if force_password_change {
        tracing::warn!("admin {account_id} logged in with its initial password");
    } else {
        tracing::info!("admin {account_id} logged in");
    }

    Ok(Json(AdminLoginResult {
        account_id,
        token,
        force_password_change,
        section: if force_password_change {
            DashboardSection::ManageAdmins
        } else {
            DashboardSection::Overview
        },
    }))
}

/// A malformed address can't belong to any account.
#[inline]
fn parse_login_email(email: &str) -> Result<lettre::Address, Error> {
    email.trim().parse().map_err(|_| Error::InvalidCredentials)
}

pub async fn logout(
    session: RequireSession,
    State(Global { sessions, .. }): State<Global>,
) -> Result<(), Error> {
    sessions.close(&session.token);
    Ok(())
}

/// Gets the account of the current session.
pub async fn session(
    session: RequireSession,
    State(Global { store, .. }): State<Global>,
) -> Result<Json<SessionView>, Error> {
    let store = store.read();
    let account = store
        .accounts
        .get(session.account)
        .ok_or(Error::SessionExpired)?;

    Ok(Json(SessionView {
        account: account.view(),
        password_prompt: store.accounts.password_rotation_pending(session.account),
        sections: account
            .as_admin()
            .map_or_else(Vec::new, |a| DashboardSection::visible(&a.permissions)),
    }))
}

/// Edits the username and avatar of the current account.
pub async fn edit_profile(
    session: RequireSession,
    State(Global { store, .. }): State<Global>,
    Json(descriptor): Json<ProfileEditDescriptor>,
) -> Result<(), Error> {
    let mut store = store.write();
    let avatar = match descriptor.avatar {
        Some(hash) => Some(
            store
                .media
                .reference(hash)
                .ok_or(Error::MediaNotFound(hash))?,
        ),
        None => None,
    };
    store
        .accounts
        .update_profile(session.account, descriptor.username.as_deref(), avatar)
}

/// Gets the public profile of an account.
pub async fn view_profile(
    State(Global { store, .. }): State<Global>,
    Json(ViewProfileDescriptor { account_id }): Json<ViewProfileDescriptor>,
) -> Result<Json<ProfileView>, Error> {
    let store = store.read();
    store
        .accounts
        .profile_view(account_id, store.badges.list())
        .map(Json)
}

/// Manage accounts for admins.
pub mod manage {
    use axum::{extract::State, Json};
    use webster_shared::account::{handle::manage::*, AccountView};

    use crate::{session::RequireSession, Error, Global};

    pub async fn list_accounts(
        session: RequireSession,
        State(Global { store, .. }): State<Global>,
    ) -> Result<Json<ListAccountsResult>, Error> {
        store.read().accounts.list(session.account).map(Json)
    }

    pub async fn assign_badge(
        session: RequireSession,
        State(Global { store, .. }): State<Global>,
        Json(BadgeAssignDescriptor {
            account_id,
            badge_id,
        }): Json<BadgeAssignDescriptor>,
    ) -> Result<(), Error> {
        store
            .write()
            .assign_badge(session.account, account_id, badge_id)
    }

    pub async fn remove_badge(
        session: RequireSession,
        State(Global { store, .. }): State<Global>,
        Json(BadgeAssignDescriptor {
            account_id,
            badge_id,
        }): Json<BadgeAssignDescriptor>,
    ) -> Result<(), Error> {
        store
            .write()
            .remove_badge(session.account, account_id, badge_id)
    }

    pub async fn list_admins(
        session: RequireSession,
        State(Global { store, .. }): State<Global>,
    ) -> Result<Json<Vec<AccountView>>, Error> {
        store.read().accounts.list_admins(session.account).map(Json)
    }

    /// Creates a verified admin account.
    pub async fn make_admin(
        session: RequireSession,
        State(Global { store, .. }): State<Global>,
        Json(descriptor): Json<MakeAdminDescriptor>,
    ) -> Result<Json<AccountView>, Error> {
        let mut store = store.write();
        let id = store.accounts.make_admin(session.account, descriptor)?;
        tracing::info!("admin {} created admin {id}", session.account);
        store
            .accounts
            .admin(id)
            .map(|a| Json(a.view()))
            .ok_or(Error::AdminNotFound(id))
    }

    pub async fn modify_admin(
        session: RequireSession,
        State(Global { store, .. }): State<Global>,
        Json(descriptor): Json<ModifyAdminDescriptor>,
    ) -> Result<(), Error> {
        let id = descriptor.admin_id;
        store
            .write()
            .accounts
            .modify_admin(session.account, descriptor)?;
        tracing::info!("admin {} modified admin {id}", session.account);
        Ok(())
    }

    /// Deletes an admin account and closes its sessions.
    pub async fn delete_admin(
        session: RequireSession,
        State(Global {
            store, sessions, ..
        }): State<Global>,
        Json(DeleteAdminDescriptor { admin_id }): Json<DeleteAdminDescriptor>,
    ) -> Result<(), Error> {
        store
            .write()
            .accounts
            .delete_admin(session.account, admin_id)?;
        sessions.close_account(admin_id);
        tracing::info!("admin {} deleted admin {admin_id}", session.account);
        Ok(())
    }

    /// Links an admin account to a standard account, or unlinks it.
    pub async fn link(
        session: RequireSession,
        State(Global { store, .. }): State<Global>,
        Json(LinkDescriptor { admin_id, user_id }): Json<LinkDescriptor>,
    ) -> Result<(), Error> {
        store
            .write()
            .accounts
            .link(session.account, admin_id, user_id)
    }
}
