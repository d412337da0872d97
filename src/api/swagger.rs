use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo Service API",
        version = "1.0.0",
        description = "Per-user todo lists stored in MongoDB.\n\n**Features:**\n- Account registration (bcrypt-hashed passwords)\n- Create, list, toggle, update and delete tasks embedded in the user document\n- Health monitoring and metrics"
    ),
    paths(
        // Auth endpoints
        crate::api::auth::register,

        // Todos
        crate::api::todos::add_todo,
        crate::api::todos::list_todos,
        crate::api::todos::toggle_todo,
        crate::api::todos::update_todo,
        crate::api::todos::delete_todo,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::RegisterResponse,
            crate::services::auth_service::RegisteredUser,

            // Todos
            crate::models::TodoItem,
            crate::models::WriteSummary,
            crate::services::todo_service::AddTodoRequest,
            crate::services::todo_service::ToggleTodoRequest,
            crate::services::todo_service::UpdateTodoRequest,
            crate::services::todo_service::DeleteTodoRequest,
            crate::services::todo_service::TodoCreatedResponse,
            crate::services::todo_service::MessageResponse,

            // Health & Metrics
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Account registration."),
        (name = "Todos", description = "Task list of one user. Tasks are addressed by `userId` plus the numeric `todoId` assigned at creation."),
        (name = "Health", description = "Health check and system metrics endpoints for monitoring service status."),
    )
)]
pub struct ApiDoc;
