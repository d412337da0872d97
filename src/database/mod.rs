#[cfg(test)]
pub mod memory;

use crate::{
    config::Settings,
    models::{TodoChanges, TodoItem, UserDocument, WriteSummary},
    services::store::{TodoStore, UserStore},
    utils::AppError,
};
use async_trait::async_trait;
use mongodb::bson::{doc, to_bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use std::time::Duration;

pub const USERS_COLLECTION: &str = "users";

const DUPLICATE_KEY_CODE: i32 = 11000;

/// Process-wide database handle; cloning shares the driver's connection pool.
#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(settings: &Settings) -> Result<Self, AppError> {
        let mut client_options = mongodb::options::ClientOptions::parse(&settings.mongodb_uri).await?;

        // Connection pool limitado, compartilhado por todas as requisições
        client_options.max_pool_size = Some(settings.max_pool_size);
        client_options.min_pool_size = Some(settings.min_pool_size);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));
        client_options.app_name = Some("todo-service".to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&settings.database_name);

        let mongodb = Self { db };
        mongodb.ping().await?;
        mongodb.ensure_indexes().await;

        Ok(mongodb)
    }

    /// Creates the lookup indexes used by every handler
    async fn ensure_indexes(&self) {
        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<Document>(USERS_COLLECTION);

        // users(userId) - todas as queries de todos filtram por ele
        let user_id_index = IndexModel::builder()
            .keys(doc! { "userId": 1 })
            .build();

        match users.create_index(user_id_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(userId)"),
            Err(e) => log::debug!("   ℹ️  Index not created for users(userId): {}", e),
        }

        // users(username) - único entre contas registradas; documentos criados por upsert não têm username
        let username_index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .partial_filter_expression(doc! { "username": { "$exists": true } })
                    .build(),
            )
            .build();

        match users.create_index(username_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(username) unique"),
            Err(e) => log::warn!("   ⚠️  Index not created for users(username): {}", e),
        }

        log::info!("✅ Database indexes ready");
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    fn users(&self) -> Collection<UserDocument> {
        self.collection(USERS_COLLECTION)
    }
}

fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY_CODE
    )
}

/// `$set` body addressing the positionally matched task.
fn positional_set(changes: &TodoChanges) -> Result<Document, AppError> {
    let mut set = Document::new();
    if let Some(task) = &changes.task {
        set.insert("todos.$.task", task.as_str());
    }

    // Campos livres vão para o banco com o tipo que o cliente enviou
    let loose = [
        ("todos.$.category", &changes.category),
        ("todos.$.priority", &changes.priority),
        ("todos.$.dueDate", &changes.due_date),
        ("todos.$.notes", &changes.notes),
    ];
    for (path, value) in loose {
        if let Some(value) = value {
            set.insert(path, to_bson(value)?);
        }
    }

    if let Some(completed) = changes.completed {
        set.insert("todos.$.completed", completed);
    }
    Ok(set)
}

#[async_trait]
impl UserStore for MongoDB {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UserDocument>, AppError> {
        let filter = doc! {
            "$or": [
                { "username": identifier },
                { "userId": identifier }
            ]
        };

        Ok(self.users().find_one(filter).await?)
    }

    async fn insert_user(&self, user: &UserDocument) -> Result<bool, AppError> {
        match self.users().insert_one(user).await {
            Ok(_) => Ok(true),
            Err(e) if is_duplicate_key(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl TodoStore for MongoDB {
    async fn user_exists(&self, user_id: &str) -> Result<bool, AppError> {
        let count = self
            .users()
            .count_documents(doc! { "userId": user_id })
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    async fn push_todo(&self, user_id: &str, todo: &TodoItem, upsert: bool) -> Result<WriteSummary, AppError> {
        let result = self
            .users()
            .update_one(
                doc! { "userId": user_id },
                doc! { "$push": { "todos": to_bson(todo)? } },
            )
            .upsert(upsert)
            .await?;

        Ok(result.into())
    }

    async fn find_todos(&self, user_id: &str) -> Result<Option<Vec<TodoItem>>, AppError> {
        let user = self.users().find_one(doc! { "userId": user_id }).await?;
        Ok(user.map(|u| u.todos))
    }

    async fn set_completed(&self, user_id: &str, todo_id: i64, completed: bool) -> Result<WriteSummary, AppError> {
        let result = self
            .users()
            .update_one(
                doc! { "userId": user_id, "todos.id": todo_id },
                doc! { "$set": { "todos.$.completed": completed } },
            )
            .await?;

        Ok(result.into())
    }

    async fn update_todo(&self, user_id: &str, todo_id: i64, changes: &TodoChanges) -> Result<WriteSummary, AppError> {
        let result = self
            .users()
            .update_one(
                doc! { "userId": user_id, "todos.id": todo_id },
                doc! { "$set": positional_set(changes)? },
            )
            .await?;

        Ok(result.into())
    }

    async fn pull_todo(&self, user_id: &str, todo_id: i64) -> Result<WriteSummary, AppError> {
        // Filtrar pelo elemento faz o matched_count indicar se a tarefa existia
        let result = self
            .users()
            .update_one(
                doc! { "userId": user_id, "todos.id": todo_id },
                doc! { "$pull": { "todos": { "id": todo_id } } },
            )
            .await?;

        Ok(result.into())
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.database().run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
