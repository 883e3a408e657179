use crate::{
    api::{
        auth::CurrentUser,
        error::{ApiError, ErrorBody},
    },
    store::{Comic, SharedState},
};
use axum::{extract::Extension, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use utoipa::ToSchema;

pub const ALL_FIELDS_REQUIRED: &str = "Todos os campos são obrigatórios";

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ComicPayload {
    name: Option<String>,
    publisher: Option<String>,
    licensor: Option<String>,
    genre: Option<String>,
    price: Option<f64>,
}

fn required(field: Option<&String>) -> Option<String> {
    field.filter(|value| !value.is_empty()).cloned()
}

fn validate(payload: Option<Json<ComicPayload>>) -> Result<Comic, ApiError> {
    let missing = || ApiError::Validation(ALL_FIELDS_REQUIRED.to_string());

    let Some(Json(payload)) = payload else {
        return Err(missing());
    };

    // Truthy checks like the original: empty strings are missing, and so is
    // a price of exactly zero.
    let price = payload.price.filter(|value| *value != 0.0);

    match (
        required(payload.name.as_ref()),
        required(payload.publisher.as_ref()),
        required(payload.licensor.as_ref()),
        required(payload.genre.as_ref()),
        price,
    ) {
        (Some(name), Some(publisher), Some(licensor), Some(genre), Some(price)) => Ok(Comic {
            name,
            publisher,
            licensor,
            genre,
            price,
        }),
        _ => Err(missing()),
    }
}

#[utoipa::path(
    post,
    path= "/comics/register",
    request_body = ComicPayload,
    responses (
        (status = 201, description = "Comic registered", body = Comic),
        (status = 400, description = "Missing fields or comic already registered", body = ErrorBody),
        (status = 401, description = "Missing or invalid Bearer token", body = ErrorBody),
    ),
    security(
        ("bearer" = [])
    ),
    tag = "comics",
)]
#[instrument(skip(state, current_user, payload))]
pub async fn register(
    Extension(state): Extension<SharedState>,
    Extension(current_user): Extension<CurrentUser>,
    payload: Option<Json<ComicPayload>>,
) -> Result<(StatusCode, Json<Comic>), ApiError> {
    let comic = validate(payload)?;

    let comic = state
        .comics
        .register(comic)
        .map_err(|err| ApiError::Conflict(err.to_string()))?;

    debug!(
        "comic registered: {} (by {})",
        comic.name, current_user.0.username
    );

    Ok((StatusCode::CREATED, Json(comic)))
}

#[utoipa::path(
    get,
    path= "/comics",
    responses (
        (status = 200, description = "All registered comics, in registration order", body = [Comic]),
    ),
    tag = "comics",
)]
#[instrument(skip(state))]
pub async fn list(Extension(state): Extension<SharedState>) -> Json<Vec<Comic>> {
    Json(state.comics.list())
}
