use super::TodoItem;
use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Document in the "users" collection.
///
/// Registration writes `username`, `userId` and `password`; a document created by a
/// todo upsert only carries `userId` and `todos`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UserDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none", default)]
    pub id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub username: Option<String>,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none", default)]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub password: Option<String>,
    #[serde(default)]
    pub todos: Vec<TodoItem>,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none", default)]
    pub created_at: Option<BsonDateTime>,
}

impl UserDocument {
    /// Account created through registration; `password` must already be hashed.
    pub fn registered(username: &str, password_hash: String) -> Self {
        Self {
            id: None,
            username: Some(username.to_string()),
            user_id: Some(username.to_string()),
            password: Some(password_hash),
            todos: Vec::new(),
            created_at: Some(BsonDateTime::now()),
        }
    }

    /// True when this document answers to `identifier` as a username or a userId.
    pub fn claims(&self, identifier: &str) -> bool {
        self.username.as_deref() == Some(identifier) || self.user_id.as_deref() == Some(identifier)
    }
}
