use actix_web::{web, HttpResponse};
use crate::api::error_response;
use crate::services::auth_service::{self, RegisterRequest, RegisterResponse};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = RegisterResponse),
        (status = 400, description = "Missing fields or user already exists"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn register(
    state: web::Data<AppState>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse {
    let username = request.username.as_deref().unwrap_or("N/A");
    log::info!("📝 POST /auth/register - username: {}", username);

    match auth_service::register(state.users.as_ref(), &request, state.bcrypt_cost).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(e) => error_response("registering user", e),
    }
}
