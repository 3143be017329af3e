pub mod handle;

use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt::Display, str::FromStr};

use crate::media::MediaRef;

/// Represents a user's public metadata.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AccountView {
    pub id: u64,
    pub username: String,
    pub email: lettre::Address,
    pub verified: bool,
    /// Badge ids in assignment order.
    pub badges: Vec<u64>,
    pub avatar: Option<MediaRef>,
    pub registration_time: chrono::DateTime<chrono::Utc>,
    /// Present only for admin accounts.
    pub admin: Option<AdminView>,
}

impl AccountView {
    #[inline]
    pub fn is_admin(&self) -> bool {
        self.admin.is_some()
    }
}

/// Admin-only attributes of an account.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AdminView {
    pub permissions: Permissions,
    pub password_changed: bool,
    /// The standard account this admin is linked to for display.
    pub linked_user: Option<u64>,
}

pub type Permissions = BTreeSet<Permission>;

/// Represent permissions an admin account may hold.
///
/// Permissions are an explicit set per admin. No permission implies another.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Edit page content.
    ManageContent,
    /// Change the site styles.
    ManageStyles,
    /// Create and delete blog posts.
    ManageBlogs,
    /// Assign badges and link admin accounts to users.
    ManageUsers,
    /// Create, modify and delete admin accounts.
    ManageAdmins,
    /// Create, edit and delete badges.
    ManageBadges,
    ViewShop,
    /// SMTP settings and server status.
    ConfigureSystem,
    /// Delete user posts.
    ModeratePosts,
    /// Comment under the plain admin label.
    CommentAsAdmin,
}

impl Permission {
    /// Every permission, in declaration order.
    pub const ALL: [Permission; 10] = [
        Permission::ManageContent,
        Permission::ManageStyles,
        Permission::ManageBlogs,
        Permission::ManageUsers,
        Permission::ManageAdmins,
        Permission::ManageBadges,
        Permission::ViewShop,
        Permission::ConfigureSystem,
        Permission::ModeratePosts,
        Permission::CommentAsAdmin,
    ];

    /// The token of this permission.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ManageContent => "manage_content",
            Permission::ManageStyles => "manage_styles",
            Permission::ManageBlogs => "manage_blogs",
            Permission::ManageUsers => "manage_users",
            Permission::ManageAdmins => "manage_admins",
            Permission::ManageBadges => "manage_badges",
            Permission::ViewShop => "view_shop",
            Permission::ConfigureSystem => "configure_system",
            Permission::ModeratePosts => "moderate_posts",
            Permission::CommentAsAdmin => "comment_as_admin",
        }
    }

    /// A set containing every permission.
    #[inline]
    pub fn all() -> Permissions {
        Self::ALL.into_iter().collect()
    }
}

impl Display for Permission {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPermission(pub String);

impl Display for UnknownPermission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown permission token \"{}\"", self.0)
    }
}

impl std::error::Error for UnknownPermission {}

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPermission(s.to_owned()))
    }
}
