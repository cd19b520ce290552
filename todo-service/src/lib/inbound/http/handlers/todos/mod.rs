mod create_todo;
mod delete_todo;
mod get_todo;
mod list_todos;
mod update_todo;

pub use create_todo::create_todo;
pub use delete_todo::delete_todo;
pub use get_todo::get_todo;
pub use list_todos::list_todos;
pub use update_todo::update_todo;

use super::ApiError;
use crate::todo::errors::TodoError;
use crate::todo::models::TodoId;

/// Parse the `:todo_id` path segment, answering 400 when it is not a UUID.
fn parse_todo_id(raw: &str) -> Result<TodoId, ApiError> {
    TodoId::from_string(raw).map_err(|e| ApiError::from(TodoError::from(e)))
}
