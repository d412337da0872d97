use actix_web::{web, HttpResponse, Responder};
use crate::{
    api::error_response,
    models::TodoItem,
    services::todo_service::{
        self, AddTodoRequest, DeleteTodoRequest, ListTodosQuery, MessageResponse, TodoCreatedResponse,
        ToggleTodoRequest, UpdateTodoRequest,
    },
    state::AppState,
};

/// POST /api/todos - Appends a task to the user's list
#[utoipa::path(
    post,
    path = "/api/todos",
    tag = "Todos",
    request_body = AddTodoRequest,
    responses(
        (status = 201, description = "Todo added", body = TodoCreatedResponse),
        (status = 400, description = "User ID and task are required"),
        (status = 404, description = "Unknown user while automatic user creation is off"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn add_todo(
    state: web::Data<AppState>,
    request: web::Json<AddTodoRequest>,
) -> impl Responder {
    let user_id = request.user_id.clone().unwrap_or_default();
    log::info!("📝 POST /todos - Adding todo for user {}", user_id);

    match todo_service::add_todo(state.todos.as_ref(), state.policy, request.into_inner()).await {
        Ok(response) => {
            log::info!("✅ Todo {} added for user {}", response.todo.id, user_id);
            HttpResponse::Created().json(response)
        }
        Err(e) => error_response("adding todo", e),
    }
}

/// GET /api/todos?userId=... - Lists the user's tasks (empty when the user is unknown)
#[utoipa::path(
    get,
    path = "/api/todos",
    tag = "Todos",
    params(ListTodosQuery),
    responses(
        (status = 200, description = "Tasks of the user", body = Vec<TodoItem>),
        (status = 400, description = "User ID is required"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_todos(
    state: web::Data<AppState>,
    query: web::Query<ListTodosQuery>,
) -> impl Responder {
    log::info!("📋 GET /todos - Listing for user {}", query.user_id.as_deref().unwrap_or("N/A"));

    match todo_service::list_todos(state.todos.as_ref(), &query).await {
        Ok(todos) => {
            log::info!("✅ Listed {} todos", todos.len());
            HttpResponse::Ok().json(todos)
        }
        Err(e) => error_response("fetching todos", e),
    }
}

/// PATCH /api/todos - Sets the completed flag of one task
#[utoipa::path(
    patch,
    path = "/api/todos",
    tag = "Todos",
    request_body = ToggleTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = MessageResponse),
        (status = 400, description = "User ID and Todo ID are required"),
        (status = 404, description = "Todo not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn toggle_todo(
    state: web::Data<AppState>,
    request: web::Json<ToggleTodoRequest>,
) -> impl Responder {
    log::info!("🔧 PATCH /todos - user {}", request.user_id.as_deref().unwrap_or("N/A"));

    match todo_service::toggle_todo(state.todos.as_ref(), state.policy, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => error_response("updating todo", e),
    }
}

/// PUT /api/todos - Overwrites the supplied fields of one task
#[utoipa::path(
    put,
    path = "/api/todos",
    tag = "Todos",
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Todo updated", body = MessageResponse),
        (status = 400, description = "Missing identifiers or no field to update"),
        (status = 404, description = "Todo not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn update_todo(
    state: web::Data<AppState>,
    request: web::Json<UpdateTodoRequest>,
) -> impl Responder {
    log::info!("🔧 PUT /todos - user {}", request.user_id.as_deref().unwrap_or("N/A"));

    match todo_service::update_todo(state.todos.as_ref(), state.policy, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => error_response("updating todo", e),
    }
}

/// DELETE /api/todos - Removes one task
#[utoipa::path(
    delete,
    path = "/api/todos",
    tag = "Todos",
    request_body = DeleteTodoRequest,
    responses(
        (status = 200, description = "Todo deleted", body = MessageResponse),
        (status = 400, description = "User ID and Todo ID are required"),
        (status = 404, description = "Todo not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn delete_todo(
    state: web::Data<AppState>,
    request: web::Json<DeleteTodoRequest>,
) -> impl Responder {
    log::info!("🗑️  DELETE /todos - user {}", request.user_id.as_deref().unwrap_or("N/A"));

    match todo_service::delete_todo(state.todos.as_ref(), state.policy, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => error_response("deleting todo", e),
    }
}
