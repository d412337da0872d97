// ==================== STORAGE PORTS ====================
// Handlers acessam o banco apenas por estas traits: MongoDB em produção,
// store em memória nos testes.

use crate::{
    models::{TodoChanges, TodoItem, UserDocument, WriteSummary},
    utils::AppError,
};
use async_trait::async_trait;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Any document whose `username` or `userId` equals `identifier`.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UserDocument>, AppError>;

    /// `false` when a concurrent registration already took the username.
    async fn insert_user(&self, user: &UserDocument) -> Result<bool, AppError>;
}

#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn user_exists(&self, user_id: &str) -> Result<bool, AppError>;

    /// Appends to the user's `todos`; with `upsert` a missing user document is created.
    async fn push_todo(&self, user_id: &str, todo: &TodoItem, upsert: bool) -> Result<WriteSummary, AppError>;

    /// `None` when no document has this `userId`.
    async fn find_todos(&self, user_id: &str) -> Result<Option<Vec<TodoItem>>, AppError>;

    async fn set_completed(&self, user_id: &str, todo_id: i64, completed: bool) -> Result<WriteSummary, AppError>;

    async fn update_todo(&self, user_id: &str, todo_id: i64, changes: &TodoChanges) -> Result<WriteSummary, AppError>;

    async fn pull_todo(&self, user_id: &str, todo_id: i64) -> Result<WriteSummary, AppError>;

    async fn ping(&self) -> Result<(), AppError>;
}
