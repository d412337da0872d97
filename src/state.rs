use std::sync::Arc;

use crate::{
    config::{Settings, TodoPolicy},
    database::MongoDB,
    services::store::{TodoStore, UserStore},
};

/// Shared by every worker through `web::Data`.
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub todos: Arc<dyn TodoStore>,
    pub policy: TodoPolicy,
    pub bcrypt_cost: u32,
}

impl AppState {
    pub fn new(db: MongoDB, settings: &Settings) -> Self {
        let db = Arc::new(db);
        Self {
            users: db.clone(),
            todos: db,
            policy: settings.todos,
            bcrypt_cost: settings.bcrypt_cost,
        }
    }

    #[cfg(test)]
    pub fn with_store<S>(store: Arc<S>, policy: TodoPolicy) -> Self
    where
        S: UserStore + TodoStore + 'static,
    {
        Self {
            users: store.clone(),
            todos: store,
            policy,
            bcrypt_cost: 4,
        }
    }
}
