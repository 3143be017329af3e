use serde::{Deserialize, Serialize};

/// A reusable label attachable to any account.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub id: u64,
    pub name: String,
    pub emoji: String,
    pub description: String,
}

impl Badge {
    /// Id of [`Badge::linked_admin`]. Never assigned to a stored badge.
    pub const LINKED_ADMIN: u64 = 0;

    /// The badge shown on a standard account some admin is linked to.
    pub fn linked_admin() -> Self {
        Self {
            id: Self::LINKED_ADMIN,
            name: "Admin".to_owned(),
            emoji: "🛡️".to_owned(),
            description: "Linked Admin Account".to_owned(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone)]
pub struct BadgeDescriptor {
    pub name: String,
    pub emoji: String,
    pub description: String,
}

#[derive(Serialize, Deserialize)]
pub struct EditBadgeDescriptor {
    pub id: u64,
    #[serde(flatten)]
    pub badge: BadgeDescriptor,
}

#[derive(Serialize, Deserialize)]
pub struct DeleteBadgeDescriptor {
    pub id: u64,
}
