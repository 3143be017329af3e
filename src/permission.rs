//! The permission gate run before every privileged mutation.

use crate::{account::AccountRef, Error};

pub use webster_shared::account::{Permission, Permissions};

/// Checks that `actor` is an admin holding `required`.
///
/// # Errors
///
/// - [`Error::NotLoggedIn`] if there is no actor.
/// - [`Error::PermissionDenied`] if the actor is a standard account, or an
/// admin without the permission.
pub fn authorize(actor: Option<AccountRef<'_>>, required: Permission) -> Result<(), Error> {
    match actor {
        None => Err(Error::NotLoggedIn),
        Some(AccountRef::Admin(admin)) if admin.permissions.contains(&required) => Ok(()),
        Some(_) => Err(Error::PermissionDenied),
    }
}
