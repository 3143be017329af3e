mod admin;
mod blog;

use axum::http::{self, Method};
use hyper::{Body, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{config::Config, Global};

/// State with the default seed data.
fn global() -> Global {
    Global::new(Config::default())
}

/// Sends a request with an optional bearer token and JSON body, returning
/// the status and the parsed body.
async fn call(
    app: &axum::Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().uri(uri).method(method);
    if let Some(token) = token {
        req = req.header(http::header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => req
            .header(http::header::CONTENT_TYPE, mime::APPLICATION_JSON.as_ref())
            .body(Body::from(serde_json::to_vec(&body).unwrap())),
        None => req.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post(app: &axum::Router, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
    call(app, Method::POST, uri, token, Some(body)).await
}

async fn get(app: &axum::Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    call(app, Method::GET, uri, token, None).await
}

/// Logs in as the seed admin, returning the account id and token.
async fn seed_admin(app: &axum::Router) -> (u64, String) {
    let (status, res) = post(
        app,
        "/api/admin/login",
        None,
        json!({ "email": "admin@mmpcs.net", "password": "admin" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    (
        res["account_id"].as_u64().unwrap(),
        res["token"].as_str().unwrap().to_owned(),
    )
}

/// Registers and verifies a standard account, then logs in.
async fn user(app: &axum::Router, name: &str) -> (u64, String) {
    let (status, res) = post(
        app,
        "/api/account/register",
        None,
        json!({
            "username": name,
            "email": format!("{name}@example.com"),
            "password": "password",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = res["account_id"].as_u64().unwrap();

    let (status, _) = post(app, "/api/account/verify", None, json!({ "account_id": id })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, res) = post(
        app,
        "/api/account/login",
        None,
        json!({ "email": format!("{name}@example.com"), "password": "password" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    (id, res["token"].as_str().unwrap().to_owned())
}

/// Creates an admin with the given permissions and logs in as it.
async fn admin(
    app: &axum::Router,
    seed_token: &str,
    name: &str,
    permissions: Value,
) -> (u64, String) {
    let (status, res) = post(
        app,
        "/api/admin/create",
        Some(seed_token),
        json!({
            "username": name,
            "email": format!("{name}@example.com"),
            "password": "password",
            "permissions": permissions,
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let id = res["id"].as_u64().unwrap();

    let (status, res) = post(
        app,
        "/api/admin/login",
        None,
        json!({ "email": format!("{name}@example.com"), "password": "password" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    (id, res["token"].as_str().unwrap().to_owned())
}
