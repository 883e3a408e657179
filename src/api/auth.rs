use crate::{
    api::error::ApiError,
    store::{SharedState, User},
};
use axum::{
    extract::{Extension, Request},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tracing::debug;

pub const TOKEN_MISSING: &str = "Token não informado";
pub const TOKEN_INVALID: &str = "Token inválido";

/// User resolved by the Bearer gate, attached to request extensions so the
/// protected handler can read it. Currently nothing downstream consumes it,
/// but it is there.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Bearer authentication gate for protected routes.
///
/// The header is expected as `Bearer <token>`; the token is the second
/// space-separated word. A missing header and an unresolvable token produce
/// distinct 401 messages. Malformed input degrades to unauthorized, never to
/// a crash.
pub async fn require_bearer(
    Extension(state): Extension<SharedState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(header) = request.headers().get(AUTHORIZATION) else {
        debug!("Authorization header missing");
        return Err(ApiError::Auth(TOKEN_MISSING.to_string()));
    };

    let user = header
        .to_str()
        .ok()
        .and_then(|value| value.split(' ').nth(1))
        .and_then(|token| state.verify_token(token))
        .ok_or_else(|| {
            debug!("Bearer token did not resolve");
            ApiError::Auth(TOKEN_INVALID.to_string())
        })?;

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}
