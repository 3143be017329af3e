use reqwest::{RequestBuilder, Response};
use serde::{Deserialize, Serialize};

/// Creates a website account, which may need email verification.
pub struct Signup {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignupBody<'a> {
    email: &'a str,
    password: &'a str,
    confirm_password: &'a str,
}

#[derive(Deserialize, Debug)]
pub struct SignupResult {
    /// Present if the backend logs in right away.
    #[serde(default)]
    pub token: Option<String>,
}

#[async_trait::async_trait]
impl super::Request for Signup {
    type Output = SignupResult;
    const URL_SUFFIX: &'static str = "/auth/signup";

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        let email = self.email.trim();
        let password = self.password.trim();
        let confirm_password = self.confirm_password.trim();
        if email.is_empty() || password.is_empty() || confirm_password.is_empty() {
            anyhow::bail!("Please fill out all fields.");
        }
        if password != confirm_password {
            anyhow::bail!("Passwords do not match.");
        }
        email.parse::<lettre::Address>()?;

        Ok(req.json(&SignupBody {
            email,
            password,
            confirm_password,
        }))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::parse_envelope(response).await
    }
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

pub struct Login {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Debug)]
pub struct LoginResult {
    pub token: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[async_trait::async_trait]
impl super::Request for Login {
    type Output = LoginResult;
    const URL_SUFFIX: &'static str = "/auth/login";

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.json(&Credentials {
            email: &self.email,
            password: &self.password,
        }))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::parse_envelope(response).await
    }
}

pub struct AdminLogin {
    pub email: String,
    pub password: String,
}

#[async_trait::async_trait]
impl super::Request for AdminLogin {
    type Output = LoginResult;
    const URL_SUFFIX: &'static str = "/admin/login";

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.json(&Credentials {
            email: &self.email,
            password: &self.password,
        }))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::parse_envelope(response).await
    }
}

/// Verifies an email address with the token of its verification link.
pub struct Verify {
    pub token: String,
}

#[derive(Deserialize)]
pub(crate) struct Empty {}

#[async_trait::async_trait]
impl super::Request for Verify {
    type Output = ();
    const URL_SUFFIX: &'static str = "/verify";
    const METHOD: reqwest::Method = reqwest::Method::GET;

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.query(&[("token", &self.token)]))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::parse_envelope::<Empty>(response).await.map(|_| ())
    }
}
