use serde::{Deserialize, Serialize};

use crate::{badge::Badge, route::DashboardSection};

#[derive(Serialize, Deserialize)]
pub struct RegisterDescriptor {
    pub username: String,
    /// Parsed by the server, so a malformed address is reported like any
    /// other invalid field.
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct RegisterResult {
    pub account_id: u64,
    /// The "check your email" notice to show the user.
    pub notice: String,
}

/// Marks an account as verified without a token.
#[derive(Serialize, Deserialize)]
pub struct ManualVerifyDescriptor {
    pub account_id: u64,
}

#[derive(Serialize, Deserialize)]
pub struct VerifyTokenQuery {
    pub token: String,
}

#[derive(Serialize, Deserialize)]
pub struct LoginDescriptor {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResult {
    pub account_id: u64,
    pub token: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct AdminLoginResult {
    pub account_id: u64,
    pub token: String,
    /// Set while the seed admin still carries its initial password.
    pub force_password_change: bool,
    /// The dashboard section to open after logging in.
    pub section: DashboardSection,
}

/// The state of the current session.
#[derive(Serialize, Deserialize, Debug)]
pub struct SessionView {
    pub account: super::AccountView,
    /// The password change banner, which can't be dismissed.
    pub password_prompt: bool,
    /// Dashboard sections the account may open. Empty for standard accounts.
    pub sections: Vec<DashboardSection>,
}

#[derive(Serialize, Deserialize, Default)]
pub struct ProfileEditDescriptor {
    /// A new username, ignored if blank.
    pub username: Option<String>,
    /// Hash of an uploaded image to use as avatar.
    pub avatar: Option<u64>,
}

#[derive(Serialize, Deserialize)]
pub struct ViewProfileDescriptor {
    pub account_id: u64,
}

/// A public profile, with badges resolved.
#[derive(Serialize, Deserialize, Debug)]
pub struct ProfileView {
    pub account: super::AccountView,
    /// Badges to display.
    ///
    /// An admin shows its own badges and those of its linked user. A user
    /// some admin is linked to shows only [`Badge::linked_admin`].
    pub badges: Vec<Badge>,
    /// Whether an admin is linked to this standard account.
    pub linked_admin: bool,
    /// The linked counterpart of this account: the admin currently linked to
    /// a user, or the user an admin is linked to.
    pub linked: Option<LinkedView>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct LinkedView {
    pub id: u64,
    pub username: String,
}

/// Manage accounts for admins.
pub mod manage {
    use crate::account::{AccountView, Permissions};
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    pub struct MakeAdminDescriptor {
        /// Generated if blank.
        pub username: String,
        pub email: String,
        pub password: String,
        pub permissions: Permissions,
    }

    #[derive(Serialize, Deserialize)]
    pub struct ModifyAdminDescriptor {
        pub admin_id: u64,
        /// Kept if blank.
        pub username: String,
        /// Kept if `None` or blank.
        pub email: Option<String>,
        /// Kept if blank. A new password clears the password change banner.
        pub password: String,
        pub permissions: Permissions,
    }

    #[derive(Serialize, Deserialize)]
    pub struct DeleteAdminDescriptor {
        pub admin_id: u64,
    }

    #[derive(Serialize, Deserialize)]
    pub struct BadgeAssignDescriptor {
        pub account_id: u64,
        pub badge_id: u64,
    }

    #[derive(Serialize, Deserialize)]
    pub struct LinkDescriptor {
        pub admin_id: u64,
        /// Unlinks if `None`.
        pub user_id: Option<u64>,
    }

    #[derive(Serialize, Deserialize, Debug)]
    pub struct ListAccountsResult {
        pub users: Vec<AccountView>,
        pub admins: Vec<AccountView>,
    }
}
