use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::todo::errors::TodoError;
use crate::domain::todo::models::CreateTodoCommand;
use crate::domain::todo::models::Todo;
use crate::domain::todo::models::TodoId;
use crate::domain::todo::models::UpdateTodoCommand;
use crate::domain::user::models::UserId;

/// Port for todo operations on behalf of an authenticated principal.
///
/// Every operation takes the caller's id explicitly; reads and writes of a
/// single todo are refused unless the caller owns it.
#[async_trait]
pub trait TodoServicePort: Send + Sync + 'static {
    /// Create a todo owned by `owner_id`.
    ///
    /// # Errors
    /// * `OwnerNotFound` - The principal no longer exists
    /// * `DatabaseError` - Database operation failed
    async fn create_todo(
        &self,
        owner_id: &UserId,
        command: CreateTodoCommand,
    ) -> Result<Todo, TodoError>;

    /// Retrieve a todo owned by the caller.
    ///
    /// # Errors
    /// * `NotFound` - Todo does not exist or is deleted
    /// * `Forbidden` - Todo belongs to someone else
    /// * `DatabaseError` - Database operation failed
    async fn get_todo(&self, principal_id: &UserId, id: &TodoId) -> Result<Todo, TodoError>;

    /// List the caller's todos, newest first.
    async fn list_todos(&self, principal_id: &UserId) -> Result<Vec<Todo>, TodoError>;

    /// Apply a partial update to a todo owned by the caller.
    ///
    /// # Errors
    /// * `NotFound` - Todo does not exist or is deleted
    /// * `Forbidden` - Todo belongs to someone else
    /// * `DatabaseError` - Database operation failed
    async fn update_todo(
        &self,
        principal_id: &UserId,
        id: &TodoId,
        command: UpdateTodoCommand,
    ) -> Result<Todo, TodoError>;

    /// Soft-delete a todo owned by the caller.
    ///
    /// # Errors
    /// * `NotFound` - Todo does not exist or is already deleted
    /// * `Forbidden` - Todo belongs to someone else
    /// * `DatabaseError` - Database operation failed
    async fn delete_todo(&self, principal_id: &UserId, id: &TodoId) -> Result<(), TodoError>;
}

/// Persistence operations for todos.
///
/// Soft-deleted rows stay in storage but are never returned.
#[async_trait]
pub trait TodoRepository: Send + Sync + 'static {
    /// Persist a new todo.
    ///
    /// # Errors
    /// * `OwnerNotFound` - Owner foreign key violated
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, todo: Todo) -> Result<Todo, TodoError>;

    /// Retrieve a live todo by identifier (None if absent or deleted).
    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, TodoError>;

    /// Retrieve all live todos of an owner, newest first.
    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Vec<Todo>, TodoError>;

    /// Persist changes to a live todo.
    ///
    /// # Errors
    /// * `NotFound` - Todo does not exist or is deleted
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, todo: Todo) -> Result<Todo, TodoError>;

    /// Mark a live todo as deleted at `deleted_at`.
    ///
    /// # Errors
    /// * `NotFound` - Todo does not exist or is already deleted
    /// * `DatabaseError` - Database operation failed
    async fn soft_delete(&self, id: &TodoId, deleted_at: DateTime<Utc>) -> Result<(), TodoError>;

    /// Ownership lookup.
    ///
    /// # Returns
    /// `None` when no live todo has this id, otherwise whether `owner_id` owns it
    async fn is_owned_by(&self, id: &TodoId, owner_id: &UserId)
        -> Result<Option<bool>, TodoError>;
}
