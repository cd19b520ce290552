use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::middleware;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use http::Request;
use http::Response;
use http::StatusCode;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_profile::get_profile;
use super::handlers::login::login;
use super::handlers::register::register;
use super::handlers::todos::create_todo;
use super::handlers::todos::delete_todo;
use super::handlers::todos::get_todo;
use super::handlers::todos::list_todos;
use super::handlers::todos::update_todo;
use super::handlers::update_profile::update_profile;
use super::handlers::ApiError;
use super::middleware::authenticate as auth_middleware;
use crate::domain::todo::ports::TodoServicePort;
use crate::domain::user::ports::AuthServicePort;

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthServicePort>,
    pub todo_service: Arc<dyn TodoServicePort>,
    pub authenticator: Arc<Authenticator>,
}

/// Build the HTTP pipeline.
///
/// Public routes go straight to their handlers; every other route passes the
/// auth gate first, which either attaches an `AuthenticatedUser` or answers 401.
pub fn create_router(
    auth_service: Arc<dyn AuthServicePort>,
    todo_service: Arc<dyn TodoServicePort>,
    authenticator: Arc<Authenticator>,
    request_timeout: Duration,
) -> Router {
    let state = AppState {
        auth_service,
        todo_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login));

    let protected_routes = Router::new()
        .route("/users/profile", get(get_profile).put(update_profile))
        .route("/todos", post(create_todo).get(list_todos))
        .route(
            "/todos/:todo_id",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        // Generic resource paths for the same owned items.
        .route("/resources", post(create_todo).get(list_todos))
        .route(
            "/resources/:todo_id",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let application = Router::new()
        .merge(public_routes)
        .merge(protected_routes);

    with_http_layers(application, request_timeout).with_state(state)
}

/// Wrap a router in the timeout, trace and CORS layers.
///
/// Each layer is applied with its own `Router::layer` call so every one of
/// them sees a plain axum `Body`.
fn with_http_layers<S>(router: Router<S>, request_timeout: Duration) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    router
        .layer(TimeoutLayer::new(request_timeout))
        .layer(middleware::map_response(timeout_envelope))
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
}

/// Give the bare 408 produced by `TimeoutLayer` the usual error envelope.
async fn timeout_envelope(response: Response<Body>) -> Response<Body> {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return ApiError::RequestTimeout("Request timed out".to_string()).into_response();
    }
    response
}
