use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::parse_todo_id;
use crate::domain::field_update::FieldUpdate;
use crate::domain::todo::models::TodoDescription;
use crate::domain::todo::models::TodoTitle;
use crate::domain::todo::models::UpdateTodoCommand;
use crate::inbound::http::handlers::deserialize_present;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::handlers::ApiSuccess;
use crate::inbound::http::handlers::JsonBody;
use crate::inbound::http::handlers::TodoData;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::todo::errors::TodoError;

/// HTTP request body for a partial todo update (raw JSON)
///
/// `description: null` clears the description; `null` on `title` or
/// `completed` is rejected.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default, deserialize_with = "deserialize_present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub completed: Option<Option<bool>>,
}

impl UpdateTodoRequest {
    fn try_into_command(self) -> Result<UpdateTodoCommand, TodoError> {
        let title = match self.title {
            Some(None) => {
                return Err(TodoError::InvalidUpdate("title cannot be null".to_string()))
            }
            Some(Some(title)) => Some(TodoTitle::new(title)?),
            None => None,
        };
        let completed = match self.completed {
            Some(None) => {
                return Err(TodoError::InvalidUpdate(
                    "completed cannot be null".to_string(),
                ))
            }
            other => other.flatten(),
        };
        let description =
            FieldUpdate::from_present(self.description).try_map(TodoDescription::new)?;

        Ok(UpdateTodoCommand {
            title,
            description,
            completed,
        })
    }
}

pub async fn update_todo(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthenticatedUser>,
    Path(todo_id): Path<String>,
    JsonBody(req): JsonBody<UpdateTodoRequest>,
) -> Result<ApiSuccess<TodoData>, ApiError> {
    let todo_id = parse_todo_id(&todo_id)?;
    let command = req.try_into_command()?;

    state
        .todo_service
        .update_todo(&principal.user_id, &todo_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref todo| ApiSuccess::new(StatusCode::OK, "Todo updated", todo.into()))
}
