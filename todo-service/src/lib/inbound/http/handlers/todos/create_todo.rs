use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use crate::domain::todo::models::CreateTodoCommand;
use crate::domain::todo::models::TodoDescription;
use crate::domain::todo::models::TodoTitle;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::JsonBody;
use crate::inbound::http::handlers::TodoData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::todo::errors::TodoError;

pub async fn create_todo(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthenticatedUser>,
    JsonBody(body): JsonBody<CreateTodoRequest>,
) -> Result<ApiSuccess<TodoData>, ApiError> {
    let command = body.try_into_command()?;

    state
        .todo_service
        .create_todo(&principal.user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref todo| ApiSuccess::new(StatusCode::CREATED, "Todo created", todo.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateTodoRequest {
    title: String,
    #[serde(default)]
    description: Option<String>,
}

impl CreateTodoRequest {
    fn try_into_command(self) -> Result<CreateTodoCommand, TodoError> {
        Ok(CreateTodoCommand {
            title: TodoTitle::new(self.title)?,
            description: self.description.map(TodoDescription::new).transpose()?,
        })
    }
}
