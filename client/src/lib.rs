//! Client of the website backend, keeping the login state the way the
//! browser does.

pub mod raw;
pub mod session;

pub use raw::call;
pub use webster_shared::route::Route;

/// A connection to the backend with its login state.
pub struct Context {
    url_prefix: String,
    req_client: reqwest::Client,
    pub session: session::Store,
}

impl Context {
    pub fn new(url_prefix: impl Into<String>) -> Self {
        Self {
            url_prefix: url_prefix.into(),
            req_client: reqwest::Client::new(),
            session: session::Store::new(),
        }
    }

    /// Logs in to a standard account and keeps the session.
    pub async fn login(&self, email: &str, password: &str) -> anyhow::Result<()> {
        let res = call(
            raw::auth::Login {
                email: email.to_owned(),
                password: password.to_owned(),
            },
            self,
        )
        .await?;
        self.session.set(session::AUTH_TOKEN, res.token);
        self.session
            .set(session::USER_EMAIL, res.email.as_deref().unwrap_or(email));
        self.session.set(session::IS_LOGGED_IN, "true");
        Ok(())
    }

    /// Logs in to an admin account and keeps the session.
    pub async fn admin_login(&self, email: &str, password: &str) -> anyhow::Result<()> {
        let res = call(
            raw::auth::AdminLogin {
                email: email.to_owned(),
                password: password.to_owned(),
            },
            self,
        )
        .await?;
        self.session.set(session::AUTH_TOKEN, res.token);
        self.session.set(session::USER_EMAIL, email);
        self.session.set(session::IS_LOGGED_IN, "true");
        self.session.set(session::IS_ADMIN, "true");
        Ok(())
    }

    /// Signs up, keeping the token if the backend returns one.
    pub async fn signup(&self, email: &str, password: &str, confirm_password: &str) -> anyhow::Result<()> {
        let res = call(
            raw::auth::Signup {
                email: email.to_owned(),
                password: password.to_owned(),
                confirm_password: confirm_password.to_owned(),
            },
            self,
        )
        .await?;
        self.session.set(session::IS_LOGGED_IN, "true");
        self.session.set(session::USER_EMAIL, email.trim());
        if let Some(token) = res.token {
            self.session.set(session::AUTH_TOKEN, token);
        }
        Ok(())
    }

    /// Forgets the session, returning the page to continue on.
    pub fn logout(&self) -> Route {
        self.session.clear();
        Route::Home
    }
}
