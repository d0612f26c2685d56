//! SQLite-backed todo persistence
//!
//! Owns the `todos` table and the create/read/update/delete contract exposed
//! to the tool layer through the `TodoRepository` trait.

use async_trait::async_trait;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;

/// A stored todo. `created_date` carries the RFC3339 text exactly as the
/// caller supplied it; re-rendering through a parsed timestamp would rewrite
/// the offset and sub-second digits.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Todo {
    pub id: i64,
    pub description: Option<String>,
    #[serde(rename = "createdDate")]
    pub created_date: String,
}

#[derive(Debug, Clone)]
pub struct CreateTodoInput {
    pub description: String,
    pub created_date: String,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTodoInput {
    pub description: Option<String>,
    pub created_date: Option<String>,
}

#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn create_todo(&self, input: CreateTodoInput) -> Result<Todo, AppError>;

    /// Reads all todos ordered ascending by id, or at most one row when a
    /// positive id is given. A non-positive id means "no filter".
    async fn read_todos(&self, id: Option<i64>) -> Result<Vec<Todo>, AppError>;

    /// Returns `false` when no row has the id. An existing row reports `true`
    /// even when the partial carries nothing to apply.
    async fn update_todo(&self, id: i64, input: UpdateTodoInput) -> Result<bool, AppError>;

    async fn delete_todo(&self, id: i64) -> Result<bool, AppError>;
}

pub struct SqliteTodoStore {
    pool: SqlitePool,
}

impl SqliteTodoStore {
    pub async fn connect(path: &str) -> Result<Self, AppError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|err| {
                AppError::internal(format!("failed to open database at {path}: {err}"))
            })?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    /// A single long-lived connection: every pooled connection to
    /// `:memory:` sees its own empty database.
    pub async fn in_memory() -> Result<Self, AppError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|err| {
                AppError::internal(format!("failed to open in-memory database: {err}"))
            })?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<(), AppError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS todos (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                description TEXT,
                created_date DATETIME NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|err| AppError::internal(format!("failed to initialize schema: {err}")))?;

        Ok(())
    }
}

#[async_trait]
impl TodoRepository for SqliteTodoStore {
    async fn create_todo(&self, input: CreateTodoInput) -> Result<Todo, AppError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO todos (description, created_date) VALUES (?, ?) RETURNING id",
        )
        .bind(&input.description)
        .bind(&input.created_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| AppError::internal(format!("failed to create todo: {err}")))?;

        Ok(Todo {
            id,
            description: Some(input.description),
            created_date: input.created_date,
        })
    }

    async fn read_todos(&self, id: Option<i64>) -> Result<Vec<Todo>, AppError> {
        let rows = match id.filter(|value| *value > 0) {
            Some(id) => {
                sqlx::query(
                    "SELECT id, description, created_date FROM todos WHERE id = ? ORDER BY id",
                )
                .bind(id)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query("SELECT id, description, created_date FROM todos ORDER BY id")
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .map_err(|err| AppError::internal(format!("failed to query todos: {err}")))?;

        Ok(rows.iter().map(row_to_todo).collect())
    }

    async fn update_todo(&self, id: i64, input: UpdateTodoInput) -> Result<bool, AppError> {
        // A whitespace-only description must not overwrite the stored value.
        let description = input.description.filter(|value| !value.trim().is_empty());
        let created_date = input.created_date;

        let result = match (description, created_date) {
            (None, None) => {
                // Nothing to write; an existing row still counts as updated.
                let row = sqlx::query("SELECT 1 FROM todos WHERE id = ?")
                    .bind(id)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|err| {
                        AppError::internal(format!("failed to check todo existence: {err}"))
                    })?;
                return Ok(row.is_some());
            }
            (Some(description), None) => {
                sqlx::query("UPDATE todos SET description = ? WHERE id = ?")
                    .bind(description)
                    .bind(id)
                    .execute(&self.pool)
                    .await
            }
            (None, Some(created_date)) => {
                sqlx::query("UPDATE todos SET created_date = ? WHERE id = ?")
                    .bind(created_date)
                    .bind(id)
                    .execute(&self.pool)
                    .await
            }
            (Some(description), Some(created_date)) => {
                sqlx::query("UPDATE todos SET description = ?, created_date = ? WHERE id = ?")
                    .bind(description)
                    .bind(created_date)
                    .bind(id)
                    .execute(&self.pool)
                    .await
            }
        }
        .map_err(|err| AppError::internal(format!("failed to update todo: {err}")))?;

        // The affected-row count doubles as the existence answer.
        Ok(result.rows_affected() > 0)
    }

    async fn delete_todo(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|err| AppError::internal(format!("failed to delete todo: {err}")))?;

        Ok(result.rows_affected() > 0)
    }
}

fn row_to_todo(row: &SqliteRow) -> Todo {
    Todo {
        id: row.get("id"),
        description: row.get("description"),
        created_date: row.get("created_date"),
    }
}
