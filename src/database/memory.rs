//! In-memory stores mirroring the matching rules of the MongoDB queries.

use crate::{
    models::{TodoChanges, TodoItem, UserDocument, WriteSummary},
    services::store::{TodoStore, UserStore},
    utils::AppError,
};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::Mutex;

#[derive(Default)]
pub struct MemoryStore {
    users: Mutex<Vec<UserDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_users(users: Vec<UserDocument>) -> Self {
        let store = Self::new();
        *store.users.lock().await = users;
        store
    }

    pub async fn snapshot(&self) -> Vec<UserDocument> {
        self.users.lock().await.clone()
    }
}

fn owner<'a>(users: &'a mut [UserDocument], user_id: &str) -> Option<&'a mut UserDocument> {
    users.iter_mut().find(|u| u.user_id.as_deref() == Some(user_id))
}

fn owner_of_task<'a>(users: &'a mut [UserDocument], user_id: &str, todo_id: i64) -> Option<&'a mut UserDocument> {
    users
        .iter_mut()
        .find(|u| u.user_id.as_deref() == Some(user_id) && u.todos.iter().any(|t| t.id == todo_id))
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UserDocument>, AppError> {
        let users = self.users.lock().await;
        Ok(users.iter().find(|u| u.claims(identifier)).cloned())
    }

    async fn insert_user(&self, user: &UserDocument) -> Result<bool, AppError> {
        let mut users = self.users.lock().await;
        if users.iter().any(|u| u.username.is_some() && u.username == user.username) {
            return Ok(false);
        }

        let mut stored = user.clone();
        stored.id.get_or_insert_with(ObjectId::new);
        users.push(stored);
        Ok(true)
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn user_exists(&self, user_id: &str) -> Result<bool, AppError> {
        let mut users = self.users.lock().await;
        Ok(owner(&mut users, user_id).is_some())
    }

    async fn push_todo(&self, user_id: &str, todo: &TodoItem, upsert: bool) -> Result<WriteSummary, AppError> {
        let mut users = self.users.lock().await;

        if let Some(user) = owner(&mut users, user_id) {
            user.todos.push(todo.clone());
            return Ok(WriteSummary::matched(1));
        }
        if !upsert {
            return Ok(WriteSummary::matched(0));
        }

        let id = ObjectId::new();
        users.push(UserDocument {
            id: Some(id),
            user_id: Some(user_id.to_string()),
            todos: vec![todo.clone()],
            ..Default::default()
        });
        Ok(WriteSummary::upserted(id.to_hex()))
    }

    async fn find_todos(&self, user_id: &str) -> Result<Option<Vec<TodoItem>>, AppError> {
        let mut users = self.users.lock().await;
        Ok(owner(&mut users, user_id).map(|u| u.todos.clone()))
    }

    async fn set_completed(&self, user_id: &str, todo_id: i64, completed: bool) -> Result<WriteSummary, AppError> {
        let changes = TodoChanges {
            completed: Some(completed),
            ..Default::default()
        };
        self.update_todo(user_id, todo_id, &changes).await
    }

    async fn update_todo(&self, user_id: &str, todo_id: i64, changes: &TodoChanges) -> Result<WriteSummary, AppError> {
        let mut users = self.users.lock().await;
        let Some(user) = owner_of_task(&mut users, user_id, todo_id) else {
            return Ok(WriteSummary::matched(0));
        };

        // O update posicional altera só o primeiro elemento encontrado
        if let Some(item) = user.todos.iter_mut().find(|t| t.id == todo_id) {
            changes.apply(item);
        }
        Ok(WriteSummary::matched(1))
    }

    async fn pull_todo(&self, user_id: &str, todo_id: i64) -> Result<WriteSummary, AppError> {
        let mut users = self.users.lock().await;
        let Some(user) = owner_of_task(&mut users, user_id, todo_id) else {
            return Ok(WriteSummary::matched(0));
        };

        user.todos.retain(|t| t.id != todo_id);
        Ok(WriteSummary::matched(1))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Store whose every call fails, for exercising the 500 paths.
pub struct FailingStore;

fn unavailable<T>() -> Result<T, AppError> {
    Err(AppError::DatabaseError("server selection timeout: mongodb://10.1.2.3:27017".to_string()))
}

#[async_trait]
impl UserStore for FailingStore {
    async fn find_by_identifier(&self, _identifier: &str) -> Result<Option<UserDocument>, AppError> {
        unavailable()
    }

    async fn insert_user(&self, _user: &UserDocument) -> Result<bool, AppError> {
        unavailable()
    }
}

#[async_trait]
impl TodoStore for FailingStore {
    async fn user_exists(&self, _user_id: &str) -> Result<bool, AppError> {
        unavailable()
    }

    async fn push_todo(&self, _user_id: &str, _todo: &TodoItem, _upsert: bool) -> Result<WriteSummary, AppError> {
        unavailable()
    }

    async fn find_todos(&self, _user_id: &str) -> Result<Option<Vec<TodoItem>>, AppError> {
        unavailable()
    }

    async fn set_completed(&self, _user_id: &str, _todo_id: i64, _completed: bool) -> Result<WriteSummary, AppError> {
        unavailable()
    }

    async fn update_todo(&self, _user_id: &str, _todo_id: i64, _changes: &TodoChanges) -> Result<WriteSummary, AppError> {
        unavailable()
    }

    async fn pull_todo(&self, _user_id: &str, _todo_id: i64) -> Result<WriteSummary, AppError> {
        unavailable()
    }

    async fn ping(&self) -> Result<(), AppError> {
        unavailable()
    }
}
