use crate::store::SharedState;
use anyhow::Result;
use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Method, Request},
    middleware,
    routing::{get, post},
    Extension, Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{debug_span, info, Span};
use ulid::Ulid;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

pub mod auth;
pub mod error;
pub mod handlers;

use self::handlers::{comics, health, users};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        users::register,
        users::login,
        users::lookup,
        comics::register,
        comics::list,
    ),
    components(
        schemas(
            health::Health,
            users::Credentials,
            users::Username,
            users::Token,
            comics::ComicPayload,
            crate::store::Comic,
            error::ErrorBody,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "users", description = "User registration, login and lookup"),
        (name = "comics", description = "Comic registry"),
        (name = "health", description = "Service health"),
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
        );
    }
}

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

/// Build the application router around a shared state handle.
///
/// Split from [`new`] so the integration tests can drive the exact same
/// router in-process.
#[must_use]
pub fn router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        // allow `GET` and `POST` when accessing the resource
        .allow_methods([Method::GET, Method::POST])
        // allow requests from any origin
        .allow_origin(Any);

    // Only comic registration sits behind the Bearer gate.
    let protected = Router::new()
        .route("/comics/register", post(comics::register))
        .route_layer(middleware::from_fn(auth::require_bearer));

    Router::new()
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users/:username", get(users::lookup))
        .route("/comics", get(comics::list))
        .merge(protected)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static("x-request-id"),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    "x-request-id",
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(cors)
                .layer(Extension(state.clone())),
        )
        .route("/health", get(health::health).options(health::health))
        .layer(Extension(state))
}

/// Bind and serve until ctrl-c.
/// # Errors
/// Returns an error if the server fails to start
pub async fn new(port: u16) -> Result<()> {
    let state = SharedState::default();
    let app = router(state);

    let listener = TcpListener::bind(format!("::0:{port}")).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Gracefully shutdown");
        })
        .await?;

    Ok(())
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let headers = request.headers();
    let path = request.uri().path();
    let request_id = headers
        .get("x-request-id")
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!("http-request", path, ?headers, request_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_documents_every_route() {
        let doc = openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/health",
            "/users/register",
            "/users/login",
            "/users/{username}",
            "/comics/register",
            "/comics",
        ] {
            assert!(paths.contains_key(path), "missing path: {path}");
        }
    }

    #[test]
    fn openapi_declares_bearer_scheme() {
        let doc = openapi();
        let components = doc.components.expect("components should exist");
        assert!(components.security_schemes.contains_key("bearer"));
    }
}
