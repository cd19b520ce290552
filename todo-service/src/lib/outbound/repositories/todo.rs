use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::todo::errors::TodoError;
use crate::domain::todo::models::Todo;
use crate::domain::todo::models::TodoDescription;
use crate::domain::todo::models::TodoId;
use crate::domain::todo::models::TodoTitle;
use crate::domain::todo::ports::TodoRepository;
use crate::domain::user::models::UserId;

pub struct PostgresTodoRepository {
    pool: PgPool,
}

impl PostgresTodoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TodoRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    description: Option<String>,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<TodoRow> for Todo {
    type Error = TodoError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        Ok(Todo {
            id: TodoId(row.id),
            owner_id: UserId(row.owner_id),
            title: TodoTitle::new(row.title)?,
            description: row.description.map(TodoDescription::new).transpose()?,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

fn database_error(e: sqlx::Error) -> TodoError {
    TodoError::DatabaseError(e.to_string())
}

#[async_trait]
impl TodoRepository for PostgresTodoRepository {
    async fn create(&self, todo: Todo) -> Result<Todo, TodoError> {
        sqlx::query(
            r#"
            INSERT INTO todos (id, owner_id, title, description, completed, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(todo.id.0)
        .bind(todo.owner_id.0)
        .bind(todo.title.as_str())
        .bind(todo.description.as_ref().map(|d| d.as_str()))
        .bind(todo.completed)
        .bind(todo.created_at)
        .bind(todo.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_foreign_key_violation() {
                    return TodoError::OwnerNotFound(todo.owner_id);
                }
            }
            database_error(e)
        })?;

        Ok(todo)
    }

    async fn find_by_id(&self, id: &TodoId) -> Result<Option<Todo>, TodoError> {
        sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, owner_id, title, description, completed, created_at, updated_at, deleted_at
            FROM todos
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .map(Todo::try_from)
        .transpose()
    }

    async fn find_by_owner(&self, owner_id: &UserId) -> Result<Vec<Todo>, TodoError> {
        let rows = sqlx::query_as::<_, TodoRow>(
            r#"
            SELECT id, owner_id, title, description, completed, created_at, updated_at, deleted_at
            FROM todos
            WHERE owner_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)?;

        rows.into_iter().map(Todo::try_from).collect()
    }

    async fn update(&self, todo: Todo) -> Result<Todo, TodoError> {
        let result = sqlx::query(
            r#"
            UPDATE todos
            SET title = $2, description = $3, completed = $4, updated_at = $5
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(todo.id.0)
        .bind(todo.title.as_str())
        .bind(todo.description.as_ref().map(|d| d.as_str()))
        .bind(todo.completed)
        .bind(todo.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound(todo.id));
        }

        Ok(todo)
    }

    async fn soft_delete(&self, id: &TodoId, deleted_at: DateTime<Utc>) -> Result<(), TodoError> {
        let result = sqlx::query(
            r#"
            UPDATE todos
            SET deleted_at = $2, updated_at = $2
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.0)
        .bind(deleted_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(TodoError::NotFound(*id));
        }

        Ok(())
    }

    async fn is_owned_by(
        &self,
        id: &TodoId,
        owner_id: &UserId,
    ) -> Result<Option<bool>, TodoError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT owner_id = $2
            FROM todos
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.0)
        .bind(owner_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)
    }
}
