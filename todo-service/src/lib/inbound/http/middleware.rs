use auth::Authenticator;
use auth::JwtError;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Request-scoped identity attached by the auth gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: Option<String>,
}

/// Why the gate refused a request.
///
/// Only logged; every variant produces the same 401 response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    NoToken,
    BadFormat,
    Invalid,
    Expired,
}

impl GateRejection {
    pub fn kind(&self) -> &'static str {
        match self {
            GateRejection::NoToken => "no_token",
            GateRejection::BadFormat => "bad_format",
            GateRejection::Invalid => "invalid",
            GateRejection::Expired => "expired",
        }
    }
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        ApiError::Unauthorized("Invalid or missing authentication token".to_string()).into_response()
    }
}

/// Pull the bearer token out of the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, GateRejection> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(GateRejection::NoToken)?
        .to_str()
        .map_err(|_| GateRejection::BadFormat)?;

    let token = value
        .strip_prefix("Bearer ")
        .ok_or(GateRejection::BadFormat)?
        .trim();

    if token.is_empty() {
        return Err(GateRejection::BadFormat);
    }

    Ok(token)
}

/// Turn request headers into an authenticated principal, or say why not.
///
/// Pure apart from reading `now`; safe to call any number of times.
pub fn authenticate_bearer(
    headers: &HeaderMap,
    authenticator: &Authenticator,
    now: DateTime<Utc>,
) -> Result<AuthenticatedUser, GateRejection> {
    let token = bearer_token(headers)?;

    let claims = authenticator
        .validate_token(token, now)
        .map_err(|e| match e {
            JwtError::Expired => GateRejection::Expired,
            _ => GateRejection::Invalid,
        })?;

    let user_id = UserId::from_string(&claims.sub).map_err(|_| GateRejection::Invalid)?;

    Ok(AuthenticatedUser {
        user_id,
        username: claims.username,
    })
}

/// Middleware that validates bearer tokens and adds the principal to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, GateRejection> {
    let principal = authenticate_bearer(req.headers(), &state.authenticator, Utc::now())
        .map_err(|rejection| {
            tracing::warn!(
                reason = rejection.kind(),
                method = %req.method(),
                uri = %req.uri(),
                "Request rejected by auth gate"
            );
            rejection
        })?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
