use std::sync::Arc;

use crate::domain::todo::errors::TodoError;
use crate::domain::todo::models::TodoId;
use crate::domain::todo::ports::TodoRepository;
use crate::domain::user::models::UserId;

/// Ownership guard run in front of every single-todo read or write.
///
/// The check always goes to the repository; results are never cached.
pub struct AuthorizationService<TR>
where
    TR: TodoRepository,
{
    repository: Arc<TR>,
}

impl<TR> AuthorizationService<TR>
where
    TR: TodoRepository,
{
    pub fn new(repository: Arc<TR>) -> Self {
        Self { repository }
    }

    /// Confirm that `principal_id` owns the todo `todo_id`.
    ///
    /// # Errors
    /// * `NotFound` - No live todo with this id
    /// * `Forbidden` - The todo exists but belongs to someone else
    /// * `DatabaseError` - Lookup failed
    pub async fn assert_ownership(
        &self,
        todo_id: &TodoId,
        principal_id: &UserId,
    ) -> Result<(), TodoError> {
        match self.repository.is_owned_by(todo_id, principal_id).await? {
            Some(true) => Ok(()),
            Some(false) => {
                tracing::warn!(
                    todo_id = %todo_id,
                    principal_id = %principal_id,
                    "Access to todo owned by another user refused"
                );
                Err(TodoError::Forbidden {
                    todo_id: *todo_id,
                    user_id: *principal_id,
                })
            }
            None => Err(TodoError::NotFound(*todo_id)),
        }
    }
}
