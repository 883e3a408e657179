use crate::{
    api::error::{ApiError, ErrorBody},
    store::SharedState,
};
use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

pub const MISSING_CREDENTIALS: &str = "Usuário e senha são obrigatórios";
pub const USER_NOT_FOUND: &str = "Usuário não encontrado";

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Credentials {
    username: Option<String>,
    password: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Username {
    pub username: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Token {
    pub token: String,
}

// Empty strings count as missing, mirroring the original falsy check.
fn required(field: Option<&String>) -> Option<&str> {
    field.map(String::as_str).filter(|value| !value.is_empty())
}

fn credentials(payload: Option<Json<Credentials>>) -> Result<(String, String), ApiError> {
    let Some(Json(payload)) = payload else {
        return Err(ApiError::Validation(MISSING_CREDENTIALS.to_string()));
    };

    match (
        required(payload.username.as_ref()),
        required(payload.password.as_ref()),
    ) {
        (Some(username), Some(password)) => Ok((username.to_string(), password.to_string())),
        _ => Err(ApiError::Validation(MISSING_CREDENTIALS.to_string())),
    }
}

#[utoipa::path(
    post,
    path= "/users/register",
    request_body = Credentials,
    responses (
        (status = 201, description = "Registration successful", body = Username),
        (status = 400, description = "Missing fields or username taken", body = ErrorBody),
    ),
    tag = "users",
)]
#[instrument(skip(state, payload))]
pub async fn register(
    Extension(state): Extension<SharedState>,
    payload: Option<Json<Credentials>>,
) -> Result<(StatusCode, Json<Username>), ApiError> {
    let (username, password) = credentials(payload)?;

    let user = state
        .users
        .register(&username, &password)
        .map_err(|err| ApiError::Conflict(err.to_string()))?;

    debug!("registered user: {}", user.username);

    Ok((
        StatusCode::CREATED,
        Json(Username {
            username: user.username,
        }),
    ))
}

#[utoipa::path(
    post,
    path= "/users/login",
    request_body = Credentials,
    responses (
        (status = 200, description = "Login successful", body = Token),
        (status = 400, description = "Missing fields", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
    ),
    tag = "users",
)]
#[instrument(skip(state, payload))]
pub async fn login(
    Extension(state): Extension<SharedState>,
    payload: Option<Json<Credentials>>,
) -> Result<Json<Token>, ApiError> {
    let (username, password) = credentials(payload)?;

    let user = state
        .users
        .verify_credentials(&username, &password)
        .map_err(|err| ApiError::Auth(err.to_string()))?;

    let token = state.tokens.issue(&user.username);

    debug!("issued token for: {}", user.username);

    Ok(Json(Token { token }))
}

#[utoipa::path(
    get,
    path= "/users/{username}",
    params(
        ("username" = String, Path, description = "Username to look up")
    ),
    responses (
        (status = 200, description = "User found", body = Username),
        (status = 404, description = "Unknown username", body = ErrorBody),
    ),
    tag = "users",
)]
#[instrument(skip(state))]
pub async fn lookup(
    Extension(state): Extension<SharedState>,
    Path(username): Path<String>,
) -> Result<Json<Username>, ApiError> {
    let user = state
        .users
        .lookup(&username)
        .ok_or_else(|| ApiError::NotFound(USER_NOT_FOUND.to_string()))?;

    Ok(Json(Username {
        username: user.username,
    }))
}
