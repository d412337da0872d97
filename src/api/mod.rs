pub mod auth;
pub mod health;
pub mod metrics;
pub mod swagger;
pub mod todos;

use crate::utils::AppError;
use actix_web::{error::InternalError, web, HttpResponse, ResponseError};

/// Registers every application route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        // Health check
        .route("/health", web::get().to(health::health_check))
        // Metrics
        .route("/metrics", web::get().to(metrics::get_metrics))
        // Auth endpoints
        .service(
            web::scope("/api/auth")
                .route("/register", web::post().to(auth::register))
        )
        // Listas de tarefas
        .service(
            web::resource("/api/todos")
                .route(web::post().to(todos::add_todo))
                .route(web::get().to(todos::list_todos))
                .route(web::patch().to(todos::toggle_todo))
                .route(web::put().to(todos::update_todo))
                .route(web::delete().to(todos::delete_todo))
        );
}

/// Logs the failure at a level matching its class and renders the JSON error body.
pub fn error_response(action: &str, error: AppError) -> HttpResponse {
    let response = error.error_response();

    if response.status().is_server_error() {
        log::error!("❌ Error {}: {}", action, error);
    } else {
        log::warn!("⚠️  Rejected {}: {}", action, error);
    }

    response
}

fn bad_request(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": message }))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = bad_request(format!("Invalid JSON body: {}", err));
        InternalError::from_response(err, response).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = bad_request(format!("Invalid query string: {}", err));
        InternalError::from_response(err, response).into()
    })
}
