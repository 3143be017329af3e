//! The string key/value store a browser keeps the login state in.

use dashmap::DashMap;

pub const IS_LOGGED_IN: &str = "isLoggedIn";
pub const USER_EMAIL: &str = "userEmail";
pub const AUTH_TOKEN: &str = "authToken";
pub const IS_ADMIN: &str = "isAdmin";

pub const LOGIN_PAGE: &str = "/login/login.html";
pub const ADMIN_LOGIN_PAGE: &str = "/login/alogin.html";

/// Login state as string pairs. Nothing expires, a 401 clears everything.
#[derive(Debug, Default)]
pub struct Store {
    inner: DashMap<String, String>,
}

impl Store {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|v| v.value().to_owned())
    }

    #[inline]
    pub fn set(&self, key: &str, value: impl Into<String>) {
        self.inner.insert(key.to_owned(), value.into());
    }

    #[inline]
    pub fn clear(&self) {
        self.inner.clear()
    }

    #[inline]
    fn flag(&self, key: &str) -> bool {
        self.inner.get(key).map_or(false, |v| v.value() == "true")
    }

    #[inline]
    pub fn token(&self) -> Option<String> {
        self.get(AUTH_TOKEN).filter(|t| !t.is_empty())
    }

    #[inline]
    pub fn is_logged_in(&self) -> bool {
        self.flag(IS_LOGGED_IN)
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.flag(IS_ADMIN)
    }

    /// The page to log in again from.
    #[inline]
    pub fn login_page(&self) -> &'static str {
        if self.is_admin() {
            ADMIN_LOGIN_PAGE
        } else {
            LOGIN_PAGE
        }
    }

    /// Checks whether a protected page at `path` may be shown, returning the
    /// login page to redirect to if not.
    ///
    /// Pages under `/admin/` need an admin login, other pages any login.
    pub fn guard(&self, path: &str) -> Result<(), &'static str> {
        let logged_in = self.is_logged_in() && self.token().is_some();
        if path.starts_with("/admin/") {
            if logged_in && self.is_admin() {
                Ok(())
            } else {
                Err(ADMIN_LOGIN_PAGE)
            }
        } else if logged_in {
            Ok(())
        } else {
            Err(LOGIN_PAGE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard() {
        let store = Store::new();
        assert_eq!(store.guard("/profile.html"), Err(LOGIN_PAGE));
        assert_eq!(store.guard("/admin/admin.html"), Err(ADMIN_LOGIN_PAGE));

        store.set(IS_LOGGED_IN, "true");
        assert_eq!(store.guard("/profile.html"), Err(LOGIN_PAGE));
        store.set(AUTH_TOKEN, "token");
        assert_eq!(store.guard("/profile.html"), Ok(()));
        assert_eq!(store.guard("/admin/admin.html"), Err(ADMIN_LOGIN_PAGE));

        store.set(IS_ADMIN, "true");
        assert_eq!(store.guard("/admin/admin.html"), Ok(()));
        assert_eq!(store.login_page(), ADMIN_LOGIN_PAGE);

        store.clear();
        assert!(!store.is_logged_in());
        assert_eq!(store.login_page(), LOGIN_PAGE);
    }
}
