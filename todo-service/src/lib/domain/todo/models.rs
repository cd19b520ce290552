use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::field_update::FieldUpdate;
use crate::domain::todo::errors::TodoDescriptionError;
use crate::domain::todo::errors::TodoIdError;
use crate::domain::todo::errors::TodoTitleError;
use crate::domain::user::models::UserId;

/// Todo unique identifier value object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TodoId(pub Uuid);

impl TodoId {
    /// Generate a new random todo ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a todo ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, TodoIdError> {
        Uuid::parse_str(s)
            .map(TodoId)
            .map_err(|e| TodoIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Todo item owned by exactly one user.
///
/// `owner_id` is fixed at creation. A set `deleted_at` marks the item as
/// soft-deleted; such items are invisible to every read path.
#[derive(Debug, Clone)]
pub struct Todo {
    pub id: TodoId,
    pub owner_id: UserId,
    pub title: TodoTitle,
    pub description: Option<TodoDescription>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Todo {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Todo title value object.
///
/// Ensures title is non-empty after trimming and within 200 character limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoTitle(String);

impl TodoTitle {
    const MAX_LENGTH: usize = 200;

    /// # Errors
    /// * `Empty` - Title is blank
    /// * `TooLong` - Title exceeds 200 characters
    pub fn new(title: String) -> Result<Self, TodoTitleError> {
        let title = title.trim().to_string();
        let length = title.chars().count();
        if length == 0 {
            Err(TodoTitleError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(TodoTitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(title))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Free-form todo description, up to 2000 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDescription(String);

impl TodoDescription {
    const MAX_LENGTH: usize = 2000;

    pub fn new(description: String) -> Result<Self, TodoDescriptionError> {
        let length = description.chars().count();
        if length > Self::MAX_LENGTH {
            Err(TodoDescriptionError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(description))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to create a todo for the calling user.
#[derive(Debug)]
pub struct CreateTodoCommand {
    pub title: TodoTitle,
    pub description: Option<TodoDescription>,
}

/// Partial update of a todo; absent fields stay as they are.
#[derive(Debug, Default)]
pub struct UpdateTodoCommand {
    pub title: Option<TodoTitle>,
    pub description: FieldUpdate<TodoDescription>,
    pub completed: Option<bool>,
}

impl UpdateTodoCommand {
    /// Apply the present fields to `todo` and bump its update time.
    pub fn apply_to(self, todo: &mut Todo, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            todo.title = title;
        }
        todo.description = self.description.apply(todo.description.take());
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        todo.updated_at = now;
    }
}
