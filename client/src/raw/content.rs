use std::collections::BTreeMap;

use reqwest::{RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use super::auth::Empty;

/// Gets the section texts of a page.
pub struct GetContent {
    pub page: String,
    pub lang: String,
}

#[derive(Deserialize)]
struct ContentResult {
    #[serde(default)]
    content: BTreeMap<String, String>,
}

#[async_trait::async_trait]
impl super::Request for GetContent {
    type Output = BTreeMap<String, String>;
    const URL_SUFFIX: &'static str = "/api/content";
    const METHOD: reqwest::Method = reqwest::Method::GET;

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.query(&[("page", &self.page), ("lang", &self.lang)]))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::parse_envelope::<ContentResult>(response)
            .await
            .map(|res| res.content)
    }
}

/// Saves the section texts of a page.
pub struct SaveContent {
    pub page: String,
    pub lang: String,
    pub content: BTreeMap<String, String>,
    /// Email of the editing admin.
    pub modified_by: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveContentBody<'a> {
    page: &'a str,
    lang: &'a str,
    content: &'a BTreeMap<String, String>,
    modified_by: &'a str,
}

#[async_trait::async_trait]
impl super::Request for SaveContent {
    type Output = ();
    const URL_SUFFIX: &'static str = "/api/content";

    fn make_req(&self, req: RequestBuilder) -> anyhow::Result<RequestBuilder> {
        Ok(req.json(&SaveContentBody {
            page: &self.page,
            lang: &self.lang,
            content: &self.content,
            modified_by: &self.modified_by,
        }))
    }

    async fn parse_res(&mut self, response: Response) -> anyhow::Result<Self::Output> {
        super::parse_envelope::<Empty>(response).await.map(|_| ())
    }
}
