pub mod handle;
pub mod verify;

use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use sha256::digest;

use crate::{
    config,
    permission::{self, Permission, Permissions},
    Error, Store,
};

pub use webster_shared::account::{handle::manage::ListAccountsResult, AccountView, AdminView};
use webster_shared::{
    account::handle::{manage::*, LinkedView, ProfileView},
    badge::Badge,
    media::MediaRef,
};

/// Attributes every account has.
#[derive(Debug, Clone)]
pub struct Profile {
    pub id: u64,
    pub username: String,
    pub email: lettre::Address,
    pub verified: bool,
    /// Badge ids in assignment order, without duplicates.
    pub badges: Vec<u64>,
    pub avatar: Option<MediaRef>,
    pub registration_time: DateTime<Utc>,
    /// Hash of this account's password.
    password_sha: String,
}

impl Profile {
    /// Creates an unverified profile.
    pub fn new(id: u64, username: String, email: lettre::Address, password: &str) -> Self {
        Self {
            id,
            username,
            email,
            verified: false,
            badges: Vec::new(),
            avatar: None,
            registration_time: Utc::now(),
            password_sha: digest(password),
        }
    }

    #[inline]
    pub fn password_matches(&self, password: &str) -> bool {
        digest(password) == self.password_sha
    }

    #[inline]
    fn set_password(&mut self, password: &str) {
        self.password_sha = digest(password)
    }

    /// Appends a badge, returning `false` if it is already held.
    pub fn assign_badge(&mut self, badge: u64) -> bool {
        if self.badges.contains(&badge) {
            false
        } else {
            self.badges.push(badge);
            true
        }
    }

    /// Removes a badge, returning `false` if it wasn't held.
    pub fn remove_badge(&mut self, badge: u64) -> bool {
        let len = self.badges.len();
        self.badges.retain(|b| *b != badge);
        len != self.badges.len()
    }

    fn view(&self, admin: Option<AdminView>) -> AccountView {
        AccountView {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            verified: self.verified,
            badges: self.badges.clone(),
            avatar: self.avatar.clone(),
            registration_time: self.registration_time,
            admin,
        }
    }
}

/// An account created by registration.
#[derive(Debug, Clone)]
pub struct StandardAccount {
    pub profile: Profile,
    /// The pending email verification, until the account is verified.
    verify: Option<verify::Context>,
}

impl StandardAccount {
    #[inline]
    pub fn new(profile: Profile) -> Self {
        Self {
            profile,
            verify: None,
        }
    }

    /// The token of the pending email verification.
    #[inline]
    pub fn verification_token(&self) -> Option<&str> {
        self.verify.as_ref().map(verify::Context::token)
    }

    #[inline]
    pub fn view(&self) -> AccountView {
        self.profile.view(None)
    }
}

/// An account holding an explicit set of permissions.
#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub profile: Profile,
    pub permissions: Permissions,
    /// Whether the initial password was replaced.
    pub password_changed: bool,
    /// The standard account this admin is shown as.
    pub linked_user: Option<u64>,
    /// When `linked_user` was last set, in linking order.
    link_seq: u64,
}

impl AdminAccount {
    /// Creates a verified admin.
    pub fn new(mut profile: Profile, permissions: Permissions) -> Self {
        profile.verified = true;
        Self {
            profile,
            permissions,
            password_changed: true,
            linked_user: None,
            link_seq: 0,
        }
    }

    #[inline]
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }

    pub fn view(&self) -> AccountView {
        self.profile.view(Some(AdminView {
            permissions: self.permissions.clone(),
            password_changed: self.password_changed,
            linked_user: self.linked_user,
        }))
    }
}

/// A borrowed account of either variant.
#[derive(Debug, Clone, Copy)]
pub enum AccountRef<'a> {
    Standard(&'a StandardAccount),
    Admin(&'a AdminAccount),
}

impl<'a> AccountRef<'a> {
    #[inline]
    pub fn profile(&self) -> &'a Profile {
        match self {
            AccountRef::Standard(a) => &a.profile,
            AccountRef::Admin(a) => &a.profile,
        }
    }

    #[inline]
    pub fn as_admin(&self) -> Option<&'a AdminAccount> {
        match self {
            AccountRef::Admin(a) => Some(a),
            AccountRef::Standard(_) => None,
        }
    }

    #[inline]
    pub fn view(&self) -> AccountView {
        match self {
            AccountRef::Standard(a) => a.view(),
            AccountRef::Admin(a) => a.view(),
        }
    }
}

/// The standard and admin account collections.
///
/// Usernames and emails are unique across both collections, compared
/// exactly.
#[derive(Debug)]
pub struct Directory {
    users: Vec<StandardAccount>,
    admins: Vec<AdminAccount>,
    /// The admin created at startup.
    seed_admin: u64,
    /// Number of links made so far.
    links: u64,
}

impl Directory {
    /// Creates a directory holding only the seed admin, with every permission
    /// and its initial password.
    pub fn new(seed: &config::SeedAdmin) -> Self {
        let id = crate::gen_id(|_| false);
        let mut admin = AdminAccount::new(
            Profile::new(id, seed.username.clone(), seed.email.clone(), &seed.password),
            Permission::all(),
        );
        admin.password_changed = false;

        Self {
            users: Vec::new(),
            admins: vec![admin],
            seed_admin: id,
            links: 0,
        }
    }

    #[inline]
    pub fn users(&self) -> &[StandardAccount] {
        &self.users
    }

    #[inline]
    pub fn admins(&self) -> &[AdminAccount] {
        &self.admins
    }

    #[inline]
    pub fn seed_admin(&self) -> u64 {
        self.seed_admin
    }

    /// Resolves an account by id across both collections.
    pub fn get(&self, id: u64) -> Option<AccountRef<'_>> {
        self.user(id)
            .map(AccountRef::Standard)
            .or_else(|| self.admin(id).map(AccountRef::Admin))
    }

    #[inline]
    pub fn user(&self, id: u64) -> Option<&StandardAccount> {
        self.users.iter().find(|a| a.profile.id == id)
    }

    #[inline]
    pub fn admin(&self, id: u64) -> Option<&AdminAccount> {
        self.admins.iter().find(|a| a.profile.id == id)
    }

    #[inline]
    fn user_mut(&mut self, id: u64) -> Option<&mut StandardAccount> {
        self.users.iter_mut().find(|a| a.profile.id == id)
    }

    #[inline]
    fn admin_mut(&mut self, id: u64) -> Option<&mut AdminAccount> {
        self.admins.iter_mut().find(|a| a.profile.id == id)
    }

    pub(crate) fn profile_mut(&mut self, id: u64) -> Option<&mut Profile> {
        if self.user(id).is_some() {
            return self.user_mut(id).map(|u| &mut u.profile);
        }
        self.admin_mut(id).map(|a| &mut a.profile)
    }

    /// Every profile of both collections.
    pub(crate) fn profiles_mut(&mut self) -> impl Iterator<Item = &mut Profile> {
        self.users
            .iter_mut()
            .map(|a| &mut a.profile)
            .chain(self.admins.iter_mut().map(|a| &mut a.profile))
    }

    fn profiles(&self) -> impl Iterator<Item = &Profile> {
        self.users
            .iter()
            .map(|a| &a.profile)
            .chain(self.admins.iter().map(|a| &a.profile))
    }

    #[inline]
    fn taken(&self, id: u64) -> bool {
        self.get(id).is_some()
    }

    /// Checks the uniqueness of an email and a username, ignoring the account
    /// `except`.
    ///
    /// # Errors
    ///
    /// - [`Error::EmailExists`] is checked before [`Error::UsernameTaken`].
    pub fn ensure_unique(
        &self,
        email: Option<&lettre::Address>,
        username: Option<&str>,
        except: Option<u64>,
    ) -> Result<(), Error> {
        let others = move || self.profiles().filter(move |p| Some(p.id) != except);
        if let Some(email) = email {
            if others().any(|p| &p.email == email) {
                return Err(Error::EmailExists);
            }
        }
        if let Some(username) = username {
            if others().any(|p| p.username == username) {
                return Err(Error::UsernameTaken);
            }
        }
        Ok(())
    }

    /// Creates an unverified standard account with a pending verification.
    ///
    /// Returns the id of the account.
    #[inline]
    pub fn register(
        &mut self,
        username: &str,
        email: lettre::Address,
        password: &str,
    ) -> Result<u64, Error> {
        self.register_with(username, email, password, verify::Context::new())
    }

    /// Creates an unverified standard account pending the verification `cx`.
    pub fn register_with(
        &mut self,
        username: &str,
        email: lettre::Address,
        password: &str,
        cx: verify::Context,
    ) -> Result<u64, Error> {
        let username = username.trim();
        self.ensure_unique(Some(&email), Some(username), None)?;
        if username.is_empty() {
            return Err(Error::EmptyField("username"));
        }
        if password.is_empty() {
            return Err(Error::EmptyField("password"));
        }

        let id = crate::gen_id(|id| self.taken(id));
        let mut account = StandardAccount::new(Profile::new(
            id,
            username.to_owned(),
            email,
            password,
        ));
        account.verify = Some(cx);
        self.users.push(account);
        Ok(id)
    }

    /// Marks an account as verified without checking a token.
    pub fn verify(&mut self, id: u64) -> Result<(), Error> {
        if self.admin(id).is_some() {
            return Ok(());
        }
        let account = self.user_mut(id).ok_or(Error::AccountNotFound(id))?;
        account.profile.verified = true;
        account.verify = None;
        Ok(())
    }

    /// Verifies the account holding a pending verification `token`.
    ///
    /// # Errors
    ///
    /// - Errors if no unverified account holds the token, or the token was
    /// issued more than a day before `now`.
    pub fn verify_token(&mut self, token: &str, now: DateTime<Utc>) -> Result<u64, Error> {
        let account = self
            .users
            .iter_mut()
            .find(|a| {
                !a.profile.verified
                    && a.verify
                        .as_ref()
                        .map_or(false, |cx| cx.token() == token && !cx.is_expired(now))
            })
            .ok_or(Error::VerificationToken)?;
        account.profile.verified = true;
        account.verify = None;
        Ok(account.profile.id)
    }

    /// Checks standard account credentials and returns the account id.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidCredentials`] if the email is unknown or the
    /// password is wrong.
    /// - [`Error::Unverified`] if the account isn't verified yet.
    pub fn login(&self, email: &lettre::Address, password: &str) -> Result<u64, Error> {
        let account = self
            .users
            .iter()
            .find(|a| &a.profile.email == email && a.profile.password_matches(password))
            .ok_or(Error::InvalidCredentials)?;
        if !account.profile.verified {
            return Err(Error::Unverified);
        }
        Ok(account.profile.id)
    }

    /// Checks admin credentials and returns the account id, and whether the
    /// admin has to change its password.
    pub fn admin_login(
        &self,
        email: &lettre::Address,
        password: &str,
    ) -> Result<(u64, bool), Error> {
        let admin = self
            .admins
            .iter()
            .find(|a| &a.profile.email == email && a.profile.password_matches(password))
            .ok_or(Error::InvalidCredentials)?;
        let id = admin.profile.id;
        Ok((id, self.password_rotation_pending(id)))
    }

    /// Whether `id` is the seed admin still carrying its initial password.
    pub fn password_rotation_pending(&self, id: u64) -> bool {
        id == self.seed_admin && self.admin(id).map_or(false, |a| !a.password_changed)
    }

    /// Updates the username and avatar of any account.
    ///
    /// A blank username keeps the current one.
    pub fn update_profile(
        &mut self,
        id: u64,
        username: Option<&str>,
        avatar: Option<MediaRef>,
    ) -> Result<(), Error> {
        let username = username.map(str::trim).filter(|u| !u.is_empty());
        if self.get(id).is_none() {
            return Err(Error::AccountNotFound(id));
        }
        self.ensure_unique(None, username, Some(id))?;

        let profile = self.profile_mut(id).ok_or(Error::AccountNotFound(id))?;
        if let Some(username) = username {
            profile.username = username.to_owned();
        }
        if avatar.is_some() {
            profile.avatar = avatar;
        }
        Ok(())
    }

    /// Creates a verified admin account.
    ///
    /// Requires [`Permission::ManageAdmins`].
    pub fn make_admin(&mut self, actor: u64, descriptor: MakeAdminDescriptor) -> Result<u64, Error> {
        permission::authorize(self.get(actor), Permission::ManageAdmins)?;

        let username = match descriptor.username.trim() {
            "" => format!(
                "Admin_{}",
                rand::thread_rng()
                    .sample_iter(&Alphanumeric)
                    .take(4)
                    .map(char::from)
                    .collect::<String>()
            ),
            name => name.to_owned(),
        };
        let email: lettre::Address = descriptor.email.trim().parse()?;
        if descriptor.password.is_empty() {
            return Err(Error::EmptyField("password"));
        }
        self.ensure_unique(Some(&email), Some(&username), None)?;

        let id = crate::gen_id(|id| self.taken(id));
        self.admins.push(AdminAccount::new(
            Profile::new(id, username, email, &descriptor.password),
            descriptor.permissions,
        ));
        Ok(id)
    }

    /// Modifies an admin account.
    ///
    /// Requires [`Permission::ManageAdmins`].
    pub fn modify_admin(&mut self, actor: u64, descriptor: ModifyAdminDescriptor) -> Result<(), Error> {
        permission::authorize(self.get(actor), Permission::ManageAdmins)?;

        let id = descriptor.admin_id;
        if self.admin(id).is_none() {
            return Err(Error::AdminNotFound(id));
        }
        let username = Some(descriptor.username.trim()).filter(|u| !u.is_empty());
        let email = descriptor
            .email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::parse::<lettre::Address>)
            .transpose()?;
        self.ensure_unique(email.as_ref(), username, Some(id))?;

        let admin = self.admin_mut(id).ok_or(Error::AdminNotFound(id))?;
        if let Some(username) = username {
            admin.profile.username = username.to_owned();
        }
        if let Some(email) = email {
            admin.profile.email = email;
        }
        admin.permissions = descriptor.permissions;
        if !descriptor.password.is_empty() {
            admin.profile.set_password(&descriptor.password);
            admin.password_changed = true;
        }
        Ok(())
    }

    /// Deletes an admin account.
    ///
    /// Requires [`Permission::ManageAdmins`].
    ///
    /// # Errors
    ///
    /// In checking order:
    ///
    /// - [`Error::SeedAdminLocked`] if the target is the seed admin and its
    /// password was never changed.
    /// - [`Error::LastAdmin`] if the target is the only admin.
    /// - [`Error::DeleteSelf`] if the target is the actor.
    pub fn delete_admin(&mut self, actor: u64, id: u64) -> Result<(), Error> {
        permission::authorize(self.get(actor), Permission::ManageAdmins)?;

        let index = self
            .admins
            .iter()
            .position(|a| a.profile.id == id)
            .ok_or(Error::AdminNotFound(id))?;
        if self.password_rotation_pending(id) {
            return Err(Error::SeedAdminLocked);
        }
        if self.admins.len() <= 1 {
            return Err(Error::LastAdmin);
        }
        if actor == id {
            return Err(Error::DeleteSelf);
        }

        self.admins.remove(index);
        Ok(())
    }

    /// Points an admin at a standard account, or clears the pointer.
    ///
    /// Other admins pointing at the same user keep their pointer.
    ///
    /// Requires [`Permission::ManageUsers`].
    pub fn link(&mut self, actor: u64, admin_id: u64, user: Option<u64>) -> Result<(), Error> {
        permission::authorize(self.get(actor), Permission::ManageUsers)?;

        if let Some(user) = user {
            if self.user(user).is_none() {
                return Err(Error::AccountNotFound(user));
            }
        }
        self.links += 1;
        let seq = self.links;
        let admin = self.admin_mut(admin_id).ok_or(Error::AdminNotFound(admin_id))?;
        admin.linked_user = user;
        admin.link_seq = seq;
        Ok(())
    }

    /// The admin a standard account is shown with: of the admins pointing at
    /// it, the one linked most recently.
    pub fn linked_admin_of(&self, user: u64) -> Option<&AdminAccount> {
        self.admins
            .iter()
            .filter(|a| a.linked_user == Some(user))
            .max_by_key(|a| a.link_seq)
    }

    /// Lists every account.
    ///
    /// Requires [`Permission::ManageUsers`].
    pub fn list(&self, actor: u64) -> Result<ListAccountsResult, Error> {
        permission::authorize(self.get(actor), Permission::ManageUsers)?;
        Ok(ListAccountsResult {
            users: self.users.iter().map(StandardAccount::view).collect(),
            admins: self.admins.iter().map(AdminAccount::view).collect(),
        })
    }

    /// Lists admin accounts.
    ///
    /// Requires [`Permission::ManageAdmins`].
    pub fn list_admins(&self, actor: u64) -> Result<Vec<AccountView>, Error> {
        permission::authorize(self.get(actor), Permission::ManageAdmins)?;
        Ok(self.admins.iter().map(AdminAccount::view).collect())
    }

    /// Public profile of an account with its display link and merged badges.
    pub fn profile_view(&self, id: u64, badges: &[Badge]) -> Result<ProfileView, Error> {
        let account = self.get(id).ok_or(Error::AccountNotFound(id))?;
        let resolve = |ids: &[u64]| -> Vec<Badge> {
            ids.iter()
                .filter_map(|b| badges.iter().find(|badge| badge.id == *b).cloned())
                .collect()
        };

        let (linked, badges, linked_admin) = match account {
            AccountRef::Standard(user) => match self.linked_admin_of(id) {
                Some(admin) => (
                    Some(LinkedView {
                        id: admin.profile.id,
                        username: admin.profile.username.clone(),
                    }),
                    vec![Badge::linked_admin()],
                    true,
                ),
                None => (None, resolve(&user.profile.badges), false),
            },
            AccountRef::Admin(admin) => {
                let user = admin.linked_user.and_then(|user| self.user(user));
                let mut ids = admin.profile.badges.clone();
                let user_badges = user.map_or(&[][..], |u| u.profile.badges.as_slice());
                for badge in user_badges {
                    if !ids.contains(badge) {
                        ids.push(*badge);
                    }
                }
                (
                    user.map(|u| LinkedView {
                        id: u.profile.id,
                        username: u.profile.username.clone(),
                    }),
                    resolve(&ids),
                    false,
                )
            }
        };

        Ok(ProfileView {
            account: account.view(),
            badges,
            linked,
            linked_admin,
        })
    }
}

impl Store {
    /// Registers a standard account and composes its verification notice.
    ///
    /// Returns the account id and the notice to show.
    pub fn register(
        &mut self,
        mail: &config::Mail,
        username: &str,
        email: lettre::Address,
        password: &str,
    ) -> Result<(u64, String), Error> {
        let cx = verify::Context::new();
        let notice = verify::verification_notice(mail, email.clone(), username.trim(), cx.token())?;
        let id = self
            .accounts
            .register_with(username, email.clone(), password, cx)?;
        self.outbox.push(notice);
        tracing::info!("registered account {id}");

        Ok((
            id,
            format!(
                "Registration successful! Please check {email} for a verification link (simulation)."
            ),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(user: &str) -> lettre::Address {
        lettre::Address::new(user, "example.com").unwrap()
    }

    #[test]
    fn uniqueness_is_exact() {
        let mut accounts = Directory::new(&config::SeedAdmin::default());
        let alice = accounts.register("alice", address("alice"), "pw").unwrap();

        assert!(matches!(
            accounts.register("bob", address("alice"), "pw"),
            Err(Error::EmailExists)
        ));
        // email is checked first
        assert!(matches!(
            accounts.register("alice", address("alice"), "pw"),
            Err(Error::EmailExists)
        ));
        assert!(matches!(
            accounts.register("Admin", address("other"), "pw"),
            Err(Error::UsernameTaken)
        ));
        assert!(accounts.register("Alice", address("Alice"), "pw").is_ok());

        assert!(accounts
            .ensure_unique(Some(&address("alice")), Some("alice"), Some(alice))
            .is_ok());
    }

    #[test]
    fn badges_are_a_set() {
        let mut profile = Profile::new(1, "alice".to_owned(), address("alice"), "pw");
        assert!(profile.assign_badge(3));
        assert!(!profile.assign_badge(3));
        assert!(profile.assign_badge(4));
        assert_eq!(profile.badges, [3, 4]);
        assert!(profile.remove_badge(3));
        assert!(!profile.remove_badge(3));
        assert_eq!(profile.badges, [4]);
    }

    #[test]
    fn seed_admin_rotation() {
        let mut accounts = Directory::new(&config::SeedAdmin::default());
        let seed = accounts.seed_admin();
        let (id, pending) = accounts
            .admin_login(&config::SeedAdmin::default().email, "admin")
            .unwrap();
        assert_eq!(id, seed);
        assert!(pending);

        accounts
            .modify_admin(
                seed,
                ModifyAdminDescriptor {
                    admin_id: seed,
                    username: String::new(),
                    email: None,
                    password: "rotated".to_owned(),
                    permissions: Permission::all(),
                },
            )
            .unwrap();
        assert!(!accounts.password_rotation_pending(seed));
        assert!(accounts.admin(seed).unwrap().password_changed);
    }
}
