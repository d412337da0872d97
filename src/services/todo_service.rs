// ==================== TODO LISTS ====================
// Tarefas ficam no array `todos` embutido no documento de cada usuário.
// Cada operação valida a entrada e faz exatamente uma leitura ou escrita.

use crate::{
    config::TodoPolicy,
    models::{is_truthy, next_todo_id, NewTodo, TodoChanges, TodoIdInput, TodoItem, WriteSummary},
    services::{present, store::TodoStore},
    utils::AppError,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ==================== REQUEST/RESPONSE MODELS ====================

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddTodoRequest {
    pub user_id: Option<String>,
    pub task: Option<String>,
    /// Gravado como enviado; valores não-string são mantidos
    #[schema(value_type = Option<String>)]
    pub category: Option<Value>,
    #[schema(value_type = Option<bool>)]
    pub completed: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub priority: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub due_date: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub notes: Option<Value>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ListTodosQuery {
    /// Owner of the list
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToggleTodoRequest {
    pub user_id: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub todo_id: Option<TodoIdInput>,
    #[schema(value_type = Option<bool>)]
    pub completed: Option<Value>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTodoRequest {
    pub user_id: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub todo_id: Option<TodoIdInput>,
    pub task: Option<String>,
    #[schema(value_type = Option<String>)]
    pub category: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub priority: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub due_date: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub notes: Option<Value>,
    #[schema(value_type = Option<bool>)]
    pub completed: Option<Value>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteTodoRequest {
    pub user_id: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub todo_id: Option<TodoIdInput>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TodoCreatedResponse {
    pub message: String,
    pub todo: TodoItem,
    pub result: WriteSummary,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

// ==================== HELPERS ====================

fn resolve_target<'a>(
    user_id: &'a Option<String>,
    todo_id: &Option<TodoIdInput>,
) -> Result<(&'a str, i64), AppError> {
    let todo_id = todo_id.as_ref().filter(|id| !id.is_blank());

    let (Some(user_id), Some(todo_id)) = (present(user_id), todo_id) else {
        return Err(AppError::InvalidRequest("User ID and Todo ID are required".to_string()));
    };

    let todo_id = todo_id
        .normalize()
        .ok_or_else(|| AppError::InvalidRequest("Invalid todo ID".to_string()))?;

    Ok((user_id, todo_id))
}

fn check_matched(summary: &WriteSummary, policy: TodoPolicy, user_id: &str, todo_id: i64) -> Result<(), AppError> {
    if !summary.is_miss() {
        return Ok(());
    }

    if policy.report_missing {
        return Err(AppError::NotFound("Todo not found".to_string()));
    }

    log::debug!("No todo {} for user {}; nothing changed", todo_id, user_id);
    Ok(())
}

// ==================== SERVICE FUNCTIONS ====================

/// POST /api/todos
pub async fn add_todo(
    store: &dyn TodoStore,
    policy: TodoPolicy,
    request: AddTodoRequest,
) -> Result<TodoCreatedResponse, AppError> {
    let (Some(user_id), Some(task)) = (present(&request.user_id), present(&request.task)) else {
        return Err(AppError::InvalidRequest("User ID and task are required".to_string()));
    };

    if !policy.auto_create_users && !store.user_exists(user_id).await? {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    let todo = TodoItem::create(
        next_todo_id(),
        NewTodo {
            user_id: user_id.to_string(),
            task: task.to_string(),
            category: request.category,
            completed: request.completed.as_ref().map_or(false, is_truthy),
            priority: request.priority,
            due_date: request.due_date,
            notes: request.notes,
        },
    );

    let result = store.push_todo(user_id, &todo, policy.auto_create_users).await?;

    // O documento do usuário sumiu entre a verificação e o push
    if result.is_miss() {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(TodoCreatedResponse {
        message: "Todo added successfully".to_string(),
        todo,
        result,
    })
}

/// GET /api/todos?userId=...
pub async fn list_todos(store: &dyn TodoStore, query: &ListTodosQuery) -> Result<Vec<TodoItem>, AppError> {
    let user_id = present(&query.user_id)
        .ok_or_else(|| AppError::InvalidRequest("User ID is required".to_string()))?;

    Ok(store.find_todos(user_id).await?.unwrap_or_default())
}

/// PATCH /api/todos - atualiza `completed` de uma tarefa
pub async fn toggle_todo(
    store: &dyn TodoStore,
    policy: TodoPolicy,
    request: &ToggleTodoRequest,
) -> Result<MessageResponse, AppError> {
    let (user_id, todo_id) = resolve_target(&request.user_id, &request.todo_id)?;
    let completed = request.completed.as_ref().map_or(false, is_truthy);

    let summary = store.set_completed(user_id, todo_id, completed).await?;
    check_matched(&summary, policy, user_id, todo_id)?;

    Ok(MessageResponse::new("Todo updated"))
}

/// PUT /api/todos - grava só os campos presentes no body
pub async fn update_todo(
    store: &dyn TodoStore,
    policy: TodoPolicy,
    request: &UpdateTodoRequest,
) -> Result<MessageResponse, AppError> {
    let (user_id, todo_id) = resolve_target(&request.user_id, &request.todo_id)?;

    let changes = TodoChanges {
        task: request.task.clone(),
        category: request.category.clone(),
        priority: request.priority.clone(),
        due_date: request.due_date.clone(),
        notes: request.notes.clone(),
        completed: request.completed.as_ref().map(is_truthy),
    };

    if changes.is_empty() {
        return Err(AppError::InvalidRequest("No fields to update".to_string()));
    }

    let summary = store.update_todo(user_id, todo_id, &changes).await?;
    check_matched(&summary, policy, user_id, todo_id)?;

    Ok(MessageResponse::new("Todo updated"))
}

/// DELETE /api/todos
pub async fn delete_todo(
    store: &dyn TodoStore,
    policy: TodoPolicy,
    request: &DeleteTodoRequest,
) -> Result<MessageResponse, AppError> {
    let (user_id, todo_id) = resolve_target(&request.user_id, &request.todo_id)?;

    let summary = store.pull_todo(user_id, todo_id).await?;
    check_matched(&summary, policy, user_id, todo_id)?;

    Ok(MessageResponse::new("Todo deleted"))
}
