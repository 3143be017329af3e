use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};

use crate::{config, Error};

/// Context used for email verification.
#[derive(Debug, Clone)]
pub struct Context {
    token: String,
    /// The time the token was issued.
    issued: DateTime<Utc>,
}

impl Context {
    /// Tokens stay valid for a day.
    const EXPIRATION: i64 = 24;

    /// Creates a new verify context with the current time
    /// and a randomly generated token.
    #[inline]
    pub(super) fn new() -> Self {
        Self {
            token: random_token(),
            issued: Utc::now(),
        }
    }

    #[inline]
    pub fn token(&self) -> &str {
        &self.token
    }

    #[inline]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now - self.issued >= Duration::hours(Self::EXPIRATION)
    }
}

/// Generates a 32 characters alphanumeric token.
pub fn random_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Composes the verification notice of an account.
pub fn verification_notice(
    mail: &config::Mail,
    to: lettre::Address,
    username: &str,
    token: &str,
) -> Result<lettre::Message, Error> {
    Ok(lettre::Message::builder()
        .from(lettre::message::Mailbox {
            name: Some(mail.sender_name.to_owned()),
            email: mail.sender.to_owned(),
        })
        .to(lettre::message::Mailbox {
            name: Some(username.to_owned()),
            email: to,
        })
        .subject("Verify your email address")
        .body(format!(
            "Hello {username},\n\nopen the link below to verify your account:\n\n{}{token}\n",
            mail.verification_link_base
        ))?)
}

/// Composed notices that are never delivered, keeping only the most recent
/// [`Outbox::CAPACITY`] of them.
#[derive(Debug, Default)]
pub struct Outbox {
    messages: VecDeque<lettre::Message>,
}

impl Outbox {
    pub const CAPACITY: usize = 256;

    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps a notice, dropping the oldest one when full.
    pub fn push(&mut self, message: lettre::Message) {
        if self.messages.len() >= Self::CAPACITY {
            self.messages.pop_front();
        }
        self.messages.push_back(message);
    }

    #[inline]
    pub fn messages(&self) -> &VecDeque<lettre::Message> {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_shape() {
        let token = random_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, random_token());
    }

    #[test]
    fn expiration() {
        let cx = Context::new();
        assert!(!cx.is_expired(Utc::now()));
        assert!(!cx.is_expired(Utc::now() + Duration::hours(23)));
        assert!(cx.is_expired(Utc::now() + Duration::hours(25)));
    }

    #[test]
    fn notice_addressed_to_account() {
        let to = lettre::Address::new("alice", "example.com").unwrap();
        let msg = verification_notice(&config::Mail::default(), to.clone(), "alice", "tok").unwrap();
        assert_eq!(msg.envelope().to(), &[to]);
    }

    #[test]
    fn outbox_is_bounded() {
        let mut outbox = Outbox::new();
        for i in 0..Outbox::CAPACITY + 3 {
            let to = lettre::Address::new(format!("user{i}"), "example.com").unwrap();
            outbox.push(verification_notice(&config::Mail::default(), to, "user", "tok").unwrap());
        }
        assert_eq!(outbox.messages().len(), Outbox::CAPACITY);

        let first = lettre::Address::new("user3", "example.com").unwrap();
        assert_eq!(outbox.messages()[0].envelope().to(), &[first]);
    }
}
