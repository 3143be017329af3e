use std::fmt::{Formatter, Write};

use serde::{de::DeserializeOwned, Deserialize};

pub mod auth;
pub mod content;
pub mod registration;

#[async_trait::async_trait]
pub trait Request {
    type Output;

    const URL_SUFFIX: &'static str;
    const METHOD: reqwest::Method = reqwest::Method::POST;

    fn make_req(&self, req: reqwest::RequestBuilder) -> anyhow::Result<reqwest::RequestBuilder>;

    async fn parse_res(&mut self, response: reqwest::Response) -> anyhow::Result<Self::Output>;
}

/// Builds a [`Request`] with the headers of the current session.
pub fn build<T: Request>(req: &T, cx: &crate::Context) -> anyhow::Result<reqwest::Request> {
    let mut builder = cx
        .req_client
        .request(T::METHOD, format!("{}{}", cx.url_prefix, T::URL_SUFFIX))
        .header(reqwest::header::ACCEPT, "application/json");
    if let Some(token) = cx.session.token() {
        builder = builder.bearer_auth(token);
    }
    if cx.session.is_admin() {
        builder = builder.header("X-Admin", "true");
    }
    Ok(req.make_req(builder)?.build()?)
}

/// Calls a [`Request`] and return its output.
///
/// A 401 clears the session, failing with [`SessionExpired`].
pub async fn call<T: Request>(
    mut req: T,
    cx: &crate::Context,
) -> anyhow::Result<<T as Request>::Output> {
    let response = cx.req_client.execute(build(&req, cx)?).await?;
    let status = response.status();

    if status == reqwest::StatusCode::UNAUTHORIZED {
        let login_page = cx.session.login_page();
        cx.session.clear();
        return Err(anyhow::Error::new(SessionExpired { login_page }));
    }

    if !status.is_success() {
        #[derive(Deserialize)]
        struct ThrownError {
            message: Option<String>,
            error: Option<String>,
        }

        let err_msg = response
            .json::<ThrownError>()
            .await
            .ok()
            .and_then(|msg| msg.message.or(msg.error));

        return Err(anyhow::Error::new(ResponseError {
            status_code: status,
            error: err_msg,
        }));
    }

    req.parse_res(response).await
}

#[derive(Debug)]
pub struct ResponseError {
    pub status_code: reqwest::StatusCode,
    pub error: Option<String>,
}

impl std::fmt::Display for ResponseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.status_code.as_str())?;

        if let Some(msg) = self.status_code.canonical_reason() {
            f.write_char(' ')?;
            f.write_str(msg)?;
        }

        if let Some(ref msg) = self.error {
            f.write_str(": ")?;
            f.write_str(msg)?;
        }

        Ok(())
    }
}

impl std::error::Error for ResponseError {}

/// The session was rejected. The session store is already cleared.
#[derive(Debug)]
pub struct SessionExpired {
    /// The page to log in again from.
    pub login_page: &'static str,
}

impl std::fmt::Display for SessionExpired {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Session expired. Please login again.")
    }
}

impl std::error::Error for SessionExpired {}

/// A successful status with `success: false` in the body.
#[derive(Debug)]
pub struct Unsuccessful {
    pub message: Option<String>,
}

impl std::fmt::Display for Unsuccessful {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message.as_deref().unwrap_or("request failed"))
    }
}

impl std::error::Error for Unsuccessful {}

/// Parses a `{ "success": bool, "message": .., ... }` body.
pub(crate) async fn parse_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
) -> anyhow::Result<T> {
    envelope(&response.bytes().await?)
}

fn envelope<T: DeserializeOwned>(bytes: &[u8]) -> anyhow::Result<T> {
    #[derive(Deserialize)]
    struct Envelope<T> {
        #[serde(default)]
        success: bool,
        #[serde(default)]
        message: Option<String>,
        #[serde(flatten)]
        body: Option<T>,
    }

    let Envelope {
        success,
        message,
        body,
    } = serde_json::from_slice::<Envelope<T>>(bytes)?;
    if !success {
        return Err(anyhow::Error::new(Unsuccessful { message }));
    }
    body.ok_or_else(|| anyhow::anyhow!("malformed response body"))
}
