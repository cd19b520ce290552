use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::authorization::AuthorizationService;
use super::errors::TodoError;
use super::models::CreateTodoCommand;
use super::models::Todo;
use super::models::TodoId;
use super::models::UpdateTodoCommand;
use super::ports::TodoRepository;
use super::ports::TodoServicePort;
use crate::domain::user::models::UserId;

/// Concrete implementation of TodoServicePort.
///
/// Ownership is asserted through `AuthorizationService` before any business
/// logic touches a todo.
pub struct TodoService<TR>
where
    TR: TodoRepository,
{
    repository: Arc<TR>,
    authorization: AuthorizationService<TR>,
}

impl<TR> TodoService<TR>
where
    TR: TodoRepository,
{
    pub fn new(repository: Arc<TR>) -> Self {
        Self {
            authorization: AuthorizationService::new(Arc::clone(&repository)),
            repository,
        }
    }
}

#[async_trait]
impl<TR> TodoServicePort for TodoService<TR>
where
    TR: TodoRepository,
{
    async fn create_todo(
        &self,
        owner_id: &UserId,
        command: CreateTodoCommand,
    ) -> Result<Todo, TodoError> {
        let now = Utc::now();
        let todo = Todo {
            id: TodoId::new(),
            owner_id: *owner_id,
            title: command.title,
            description: command.description,
            completed: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };

        self.repository.create(todo).await
    }

    async fn get_todo(&self, principal_id: &UserId, id: &TodoId) -> Result<Todo, TodoError> {
        self.authorization.assert_ownership(id, principal_id).await?;

        self.repository
            .find_by_id(id)
            .await?
            .ok_or(TodoError::NotFound(*id))
    }

    async fn list_todos(&self, principal_id: &UserId) -> Result<Vec<Todo>, TodoError> {
        self.repository.find_by_owner(principal_id).await
    }

    async fn update_todo(
        &self,
        principal_id: &UserId,
        id: &TodoId,
        command: UpdateTodoCommand,
    ) -> Result<Todo, TodoError> {
        self.authorization.assert_ownership(id, principal_id).await?;

        let mut todo = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(TodoError::NotFound(*id))?;

        command.apply_to(&mut todo, Utc::now());

        self.repository.update(todo).await
    }

    async fn delete_todo(&self, principal_id: &UserId, id: &TodoId) -> Result<(), TodoError> {
        self.authorization.assert_ownership(id, principal_id).await?;

        self.repository.soft_delete(id, Utc::now()).await?;

        tracing::info!(todo_id = %id, principal_id = %principal_id, "Todo deleted");

        Ok(())
    }
}
