use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::parse_todo_id;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthenticatedUser>,
    Path(todo_id): Path<String>,
) -> Result<ApiSuccess<Option<()>>, ApiError> {
    let todo_id = parse_todo_id(&todo_id)?;

    state
        .todo_service
        .delete_todo(&principal.user_id, &todo_id)
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, "Todo deleted", None))
}
