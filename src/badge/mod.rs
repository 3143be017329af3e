pub mod handle;

use webster_shared::badge::{Badge, BadgeDescriptor};

use crate::{
    permission::{self, Permission},
    Error, Store,
};

/// Badges in creation order.
#[derive(Debug, Default)]
pub struct Badges {
    inner: Vec<Badge>,
}

impl Badges {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn list(&self) -> &[Badge] {
        &self.inner
    }

    #[inline]
    pub fn get(&self, id: u64) -> Option<&Badge> {
        self.inner.iter().find(|b| b.id == id)
    }

    #[inline]
    pub fn contains(&self, id: u64) -> bool {
        self.get(id).is_some()
    }

    /// Inserts a badge without checking permissions, returning its id.
    pub(crate) fn insert(&mut self, descriptor: BadgeDescriptor) -> u64 {
        let id = crate::gen_id(|id| self.contains(id));
        self.inner.push(Badge {
            id,
            name: descriptor.name,
            emoji: descriptor.emoji,
            description: descriptor.description,
        });
        id
    }
}

/// Trims the descriptor, rejecting a blank name.
fn validate(mut descriptor: BadgeDescriptor) -> Result<BadgeDescriptor, Error> {
    descriptor.name = descriptor.name.trim().to_owned();
    if descriptor.name.is_empty() {
        return Err(Error::EmptyField("name"));
    }
    descriptor.emoji = descriptor.emoji.trim().to_owned();
    Ok(descriptor)
}

impl Store {
    /// Requires [`Permission::ManageBadges`].
    pub fn create_badge(&mut self, actor: u64, descriptor: BadgeDescriptor) -> Result<u64, Error> {
        permission::authorize(self.accounts.get(actor), Permission::ManageBadges)?;
        let id = self.badges.insert(validate(descriptor)?);
        tracing::info!("admin {actor} created badge {id}");
        Ok(id)
    }

    /// Requires [`Permission::ManageBadges`].
    pub fn edit_badge(
        &mut self,
        actor: u64,
        id: u64,
        descriptor: BadgeDescriptor,
    ) -> Result<(), Error> {
        permission::authorize(self.accounts.get(actor), Permission::ManageBadges)?;
        let descriptor = validate(descriptor)?;
        let badge = self
            .badges
            .inner
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or(Error::BadgeNotFound(id))?;
        badge.name = descriptor.name;
        badge.emoji = descriptor.emoji;
        badge.description = descriptor.description;
        Ok(())
    }

    /// Deletes a badge and removes it from every account.
    ///
    /// Requires [`Permission::ManageBadges`].
    pub fn delete_badge(&mut self, actor: u64, id: u64) -> Result<(), Error> {
        permission::authorize(self.accounts.get(actor), Permission::ManageBadges)?;
        let index = self
            .badges
            .inner
            .iter()
            .position(|b| b.id == id)
            .ok_or(Error::BadgeNotFound(id))?;
        self.badges.inner.remove(index);

        let holders = self
            .accounts
            .profiles_mut()
            .map(|p| p.remove_badge(id))
            .filter(|removed| *removed)
            .count();
        tracing::info!("admin {actor} deleted badge {id}, removed from {holders} accounts");
        Ok(())
    }

    /// Assigns an existing badge to an account. Assigning a held badge
    /// does nothing.
    ///
    /// Requires [`Permission::ManageUsers`].
    pub fn assign_badge(&mut self, actor: u64, account: u64, badge: u64) -> Result<(), Error> {
        permission::authorize(self.accounts.get(actor), Permission::ManageUsers)?;
        if !self.badges.contains(badge) {
            return Err(Error::BadgeNotFound(badge));
        }
        self.accounts
            .profile_mut(account)
            .ok_or(Error::AccountNotFound(account))?
            .assign_badge(badge);
        Ok(())
    }

    /// Removes a badge from an account. Removing an unheld badge does nothing.
    ///
    /// Requires [`Permission::ManageUsers`].
    pub fn remove_badge(&mut self, actor: u64, account: u64, badge: u64) -> Result<(), Error> {
        permission::authorize(self.accounts.get(actor), Permission::ManageUsers)?;
        self.accounts
            .profile_mut(account)
            .ok_or(Error::AccountNotFound(account))?
            .remove_badge(badge);
        Ok(())
    }
}
