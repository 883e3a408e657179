use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use gibiteca::{api, store::SharedState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    api::router(SharedState::default())
}

async fn send(
    app: &Router,
    method: &str,
    path: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> Result<(StatusCode, Value)> {
    let mut builder = Request::builder().method(method).uri(path);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body)?))?,
        None => builder.body(Body::empty())?,
    };

    let response = app
        .clone()
        .oneshot(request)
        .await
        .map_err(|err| anyhow::anyhow!("request failed: {err}"))?;

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, body))
}

async fn register_user(app: &Router, username: &str, password: &str) -> Result<()> {
    let (status, _) = send(
        app,
        "POST",
        "/users/register",
        Some(json!({ "username": username, "password": password })),
        None,
    )
    .await?;
    anyhow::ensure!(status == StatusCode::CREATED, "got {status}");
    Ok(())
}

async fn login(app: &Router, username: &str, password: &str) -> Result<String> {
    let (status, body) = send(
        app,
        "POST",
        "/users/login",
        Some(json!({ "username": username, "password": password })),
        None,
    )
    .await?;
    anyhow::ensure!(status == StatusCode::OK, "got {status}");
    Ok(body["token"]
        .as_str()
        .context("token missing from login response")?
        .to_string())
}

fn comic(name: &str) -> Value {
    json!({
        "name": name,
        "publisher": "DC",
        "licensor": "Panini",
        "genre": "Super-herói",
        "price": 29.9,
    })
}

#[tokio::test]
async fn full_scenario() -> Result<()> {
    let app = app();

    // Register Bruce.
    let (status, body) = send(
        &app,
        "POST",
        "/users/register",
        Some(json!({ "username": "Bruce", "password": "batman" })),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "username": "Bruce" }));

    // Login with the same credentials.
    let token = login(&app, "Bruce", "batman").await?;
    assert!(!token.is_empty());

    // Register a comic with that token.
    let (status, body) = send(
        &app,
        "POST",
        "/comics/register",
        Some(comic("Batman: Ano Um")),
        Some(&token),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, comic("Batman: Ano Um"));

    // Re-registering the same name fails.
    let (status, body) = send(
        &app,
        "POST",
        "/comics/register",
        Some(comic("Batman: Ano Um")),
        Some(&token),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Revista já registrada");

    // The comic shows up in the public listing.
    let (status, body) = send(&app, "GET", "/comics", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([comic("Batman: Ano Um")]));

    Ok(())
}

#[tokio::test]
async fn register_user_missing_fields() -> Result<()> {
    let app = app();

    for body in [
        json!({ "username": "Bruce" }),
        json!({ "password": "batman" }),
        json!({ "username": "", "password": "batman" }),
        json!({}),
    ] {
        let (status, body) = send(&app, "POST", "/users/register", Some(body), None).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Usuário e senha são obrigatórios");
    }

    // No body at all behaves like missing fields.
    let (status, body) = send(&app, "POST", "/users/register", None, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Usuário e senha são obrigatórios");

    Ok(())
}

#[tokio::test]
async fn register_user_twice_conflicts() -> Result<()> {
    let app = app();
    register_user(&app, "Bruce", "batman").await?;

    // Different password, same username: still a conflict.
    let (status, body) = send(
        &app,
        "POST",
        "/users/register",
        Some(json!({ "username": "Bruce", "password": "nightwing" })),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Usuário já existe");
    Ok(())
}

#[tokio::test]
async fn login_with_wrong_password_is_unauthorized() -> Result<()> {
    let app = app();
    register_user(&app, "Bruce", "batman").await?;

    let (status, body) = send(
        &app,
        "POST",
        "/users/login",
        Some(json!({ "username": "Bruce", "password": "batman2" })),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Credenciais inválidas");
    Ok(())
}

#[tokio::test]
async fn lookup_user() -> Result<()> {
    let app = app();
    register_user(&app, "Bruce", "batman").await?;

    let (status, body) = send(&app, "GET", "/users/Bruce", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "username": "Bruce" }));

    let (status, body) = send(&app, "GET", "/users/Alfred", None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Usuário não encontrado");
    Ok(())
}

#[tokio::test]
async fn comic_registration_requires_a_token() -> Result<()> {
    let app = app();

    // No Authorization header at all.
    let (status, body) = send(
        &app,
        "POST",
        "/comics/register",
        Some(comic("Watchmen")),
        None,
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token não informado");

    // Header present, token unknown.
    let (status, body) = send(
        &app,
        "POST",
        "/comics/register",
        Some(comic("Watchmen")),
        Some("bogus"),
    )
    .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token inválido");

    // Header without any token after the scheme.
    let request = Request::builder()
        .method("POST")
        .uri("/comics/register")
        .header(header::AUTHORIZATION, "Bearer")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&comic("Watchmen"))?))?;
    let response = app
        .clone()
        .oneshot(request)
        .await
        .map_err(|err| anyhow::anyhow!("request failed: {err}"))?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["message"], "Token inválido");

    Ok(())
}

#[tokio::test]
async fn comic_registration_validates_fields() -> Result<()> {
    let app = app();
    register_user(&app, "Bruce", "batman").await?;
    let token = login(&app, "Bruce", "batman").await?;

    // Drop each required field in turn.
    for field in ["name", "publisher", "licensor", "genre", "price"] {
        let mut payload = comic("Watchmen");
        payload
            .as_object_mut()
            .context("payload should be an object")?
            .remove(field);

        let (status, body) = send(
            &app,
            "POST",
            "/comics/register",
            Some(payload),
            Some(&token),
        )
        .await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "field: {field}");
        assert_eq!(body["message"], "Todos os campos são obrigatórios");
    }

    // Price zero is treated as missing.
    let mut payload = comic("Watchmen");
    payload["price"] = json!(0);
    let (status, body) = send(
        &app,
        "POST",
        "/comics/register",
        Some(payload),
        Some(&token),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Todos os campos são obrigatórios");

    Ok(())
}

#[tokio::test]
async fn comics_list_preserves_registration_order() -> Result<()> {
    let app = app();
    register_user(&app, "Bruce", "batman").await?;
    let token = login(&app, "Bruce", "batman").await?;

    let names = ["Watchmen", "Sandman", "Monica"];
    for name in names {
        let (status, _) = send(
            &app,
            "POST",
            "/comics/register",
            Some(comic(name)),
            Some(&token),
        )
        .await?;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, "GET", "/comics", None, None).await?;
    assert_eq!(status, StatusCode::OK);

    let listed = body.as_array().context("expected an array")?;
    assert_eq!(listed.len(), names.len());
    for (entry, name) in listed.iter().zip(names) {
        assert_eq!(entry["name"], name);
    }
    Ok(())
}

#[tokio::test]
async fn empty_comics_list_is_an_empty_array() -> Result<()> {
    let app = app();
    let (status, body) = send(&app, "GET", "/comics", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    Ok(())
}

#[tokio::test]
async fn health_is_public() -> Result<()> {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "gibiteca");
    Ok(())
}
