use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::{account::verify::random_token, Error, Global};

/// An opened login session.
#[derive(Debug, Clone, Copy)]
pub struct Session {
    pub account: u64,
    pub opened: DateTime<Utc>,
}

impl Session {
    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.opened >= Duration::hours(24)
    }
}

/// Login sessions by token.
///
/// Sessions refer to accounts by id, so every read goes through the current
/// state of the account.
#[derive(Debug, Default)]
pub struct Sessions {
    inner: DashMap<String, Session>,
}

impl Sessions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a session for an account and returns its token.
    ///
    /// Expired sessions are dropped on every login.
    pub fn open(&self, account: u64) -> String {
        let now = Utc::now();
        self.sweep(now);
        let token = random_token();
        self.inner.insert(
            token.clone(),
            Session {
                account,
                opened: now,
            },
        );
        token
    }

    /// Drops every session expired at `now`.
    pub fn sweep(&self, now: DateTime<Utc>) {
        self.inner.retain(|_, s| !s.is_expired(now))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The account of a session, closing it if it has expired.
    pub fn get(&self, token: &str) -> Option<u64> {
        let session = *self.inner.get(token)?;
        if session.is_expired(Utc::now()) {
            self.inner.remove(token);
            None
        } else {
            Some(session.account)
        }
    }

    /// Closes a session, returning whether it was open.
    #[inline]
    pub fn close(&self, token: &str) -> bool {
        self.inner.remove(token).is_some()
    }

    /// Closes every session of an account.
    pub fn close_account(&self, account: u64) {
        self.inner.retain(|_, s| s.account != account)
    }
}

/// The session a request is made in, taken from the
/// `Authorization: Bearer {token}` header.
#[derive(Debug, Clone)]
pub struct RequireSession {
    pub token: String,
    pub account: u64,
}

#[async_trait]
impl FromRequestParts<Global> for RequireSession {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &Global) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .ok_or(Error::NotLoggedIn)?;
        let token = value
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(Error::InvalidAuthHeader)?;

        let account = state.sessions.get(token).ok_or(Error::SessionExpired)?;
        if state.store.read().accounts.get(account).is_none() {
            state.sessions.close(token);
            return Err(Error::SessionExpired);
        }
        Ok(Self {
            token: token.to_owned(),
            account,
        })
    }
}
