use thiserror::Error;

use crate::domain::todo::models::TodoId;
use crate::domain::user::models::UserId;

/// Error type for TodoId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error type for TodoTitle validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoTitleError {
    #[error("Title is empty")]
    Empty,

    #[error("Title too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Error type for TodoDescription validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TodoDescriptionError {
    #[error("Description too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

/// Top-level error type for all todo-related operations
#[derive(Debug, Clone, Error)]
pub enum TodoError {
    #[error("Invalid todo ID: {0}")]
    InvalidTodoId(#[from] TodoIdError),

    #[error("Invalid title: {0}")]
    InvalidTitle(#[from] TodoTitleError),

    #[error("Invalid description: {0}")]
    InvalidDescription(#[from] TodoDescriptionError),

    #[error("Invalid update: {0}")]
    InvalidUpdate(String),

    #[error("Todo not found: {0}")]
    NotFound(TodoId),

    #[error("User {user_id} does not own todo {todo_id}")]
    Forbidden { todo_id: TodoId, user_id: UserId },

    #[error("Owner not found: {0}")]
    OwnerNotFound(UserId),

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for TodoError {
    fn from(err: anyhow::Error) -> Self {
        TodoError::Unknown(err.to_string())
    }
}
