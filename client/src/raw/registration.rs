use reqwest::{RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use super::auth::Empty;

/// Game editions a player applies with.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Java,
    Bedrock,
    Both,
}

/// The in-game names field stores both editions as `java[]bedrock`, with
/// `none` for a missing one.
const IGN_SEPARATOR: &str = "[]";
const NO_IGN: &str = "none";

/// Joins edition names into the stored form.
pub fn join_ign(java: Option<&str>, bedrock: Option<&str>) -> String {
    let part = |ign: Option<&str>| {
        ign.map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(NO_IGN)
            .to_owned()
    };
    format!("{}{IGN_SEPARATOR}{}", part(java), part(bedrock))
}

/// Splits the stored form into the java and bedrock names.
pub fn split_ign(ign: &str) -> (Option<&str>, Option<&str>) {
    let (java, bedrock) = ign.split_once(IGN_SEPARATOR).unwrap_or((ign, NO_IGN));
    let some = |s: &str| s != NO_IGN && !s.is_empty();
    (
        Some(java).filter(|s| some(*s)),
        Some(bedrock).filter(|s| some(*s)),
    )
}

/// Applies for the server whitelist.
pub struct Register {
    pub platform: Platform,
    pub java_ign: Option<String>,
    pub bedrock_ign: Option<String>,
    pub discord: String,
    pub telegram: Option<String>,
    pub email: String,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    #[serde(rename = "type")]
    platform: Platform,
    ign: String,
    discord: &'a str,
    telegram: Option<&'a str>,
    email: &'a str,
}

#[async_trait::async_trait]
impl super::Request for Register {
    type Output = ();
    const URL_SUFFIX: &'static str = "/register";

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        let (java, bedrock) = match self.platform {
            Platform::Java => (self.java_ign.as_deref(), None),
            Platform::Bedrock => (None, self.bedrock_ign.as_deref()),
            Platform::Both => (self.java_ign.as_deref(), self.bedrock_ign.as_deref()),
        };
        Ok(req.json(&RegisterBody {
            platform: self.platform,
            ign: join_ign(java, bedrock),
            discord: &self.discord,
            telegram: self.telegram.as_deref(),
            email: &self.email,
        }))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::parse_envelope::<Empty>(response).await.map(|_| ())
    }
}

/// The lists of the whitelist review.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserList {
    Pending,
    Accepted,
    Denied,
    Audit,
}

/// A whitelist application.
#[derive(Deserialize, Debug, Clone)]
pub struct Applicant {
    pub ign: String,
    #[serde(default)]
    pub discord: Option<String>,
    #[serde(default)]
    pub telegram: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub accepted_by: Option<String>,
    #[serde(default)]
    pub accepted_date: Option<String>,
    #[serde(default)]
    pub denied_by: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub denied_date: Option<String>,
}

impl Applicant {
    #[inline]
    pub fn igns(&self) -> (Option<&str>, Option<&str>) {
        split_ign(&self.ign)
    }
}

/// A review action.
#[derive(Deserialize, Debug, Clone)]
pub struct AuditEntry {
    pub action_date: String,
    pub action_type: String,
    pub user_ign: String,
    #[serde(default)]
    pub performed_by: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum UserRow {
    Audit(AuditEntry),
    Applicant(Applicant),
}

/// Lists whitelist applications, or the review log.
pub struct Users {
    pub list: UserList,
}

#[derive(Deserialize)]
struct UsersResult {
    #[serde(default)]
    users: Vec<UserRow>,
}

#[async_trait::async_trait]
impl super::Request for Users {
    type Output = Vec<UserRow>;
    const URL_SUFFIX: &'static str = "/users";
    const METHOD: reqwest::Method = reqwest::Method::GET;

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.query(&[("type", self.list)]))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::parse_envelope::<UsersResult>(response)
            .await
            .map(|res| res.users)
    }
}

pub struct Accept {
    pub ign: String,
    /// Email of the reviewing admin.
    pub accepted_by: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AcceptBody<'a> {
    ign: &'a str,
    accepted_by: &'a str,
}

#[async_trait::async_trait]
impl super::Request for Accept {
    type Output = ();
    const URL_SUFFIX: &'static str = "/users/accept";

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.json(&AcceptBody {
            ign: &self.ign,
            accepted_by: &self.accepted_by,
        }))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::parse_envelope::<Empty>(response).await.map(|_| ())
    }
}

pub struct Deny {
    pub ign: String,
    pub reason: String,
    /// Email of the reviewing admin.
    pub denied_by: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DenyBody<'a> {
    ign: &'a str,
    reason: &'a str,
    denied_by: &'a str,
}

#[async_trait::async_trait]
impl super::Request for Deny {
    type Output = ();
    const URL_SUFFIX: &'static str = "/users/deny";

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        let reason = self.reason.trim();
        if reason.is_empty() {
            anyhow::bail!("Please provide a reason for denial.");
        }
        Ok(req.json(&DenyBody {
            ign: &self.ign,
            reason,
            denied_by: &self.denied_by,
        }))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::parse_envelope::<Empty>(response).await.map(|_| ())
    }
}
