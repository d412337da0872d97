use crate::{
    models::UserDocument,
    services::{present, store::UserStore},
    utils::AppError,
};
use bcrypt::hash;
use serde::{Deserialize, Serialize};

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user: RegisteredUser,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RegisteredUser {
    pub username: String,
}

// Hash é CPU bound; roda fora dos workers async
async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(AppError::from)
}

// User registration
pub async fn register(
    users: &dyn UserStore,
    request: &RegisterRequest,
    bcrypt_cost: u32,
) -> Result<RegisterResponse, AppError> {
    let (Some(username), Some(password)) = (present(&request.username), present(&request.password)) else {
        return Err(AppError::InvalidRequest("Username and password are required".to_string()));
    };

    // Identificador usado por documento só com todos também conta como ocupado
    if users.find_by_identifier(username).await?.is_some() {
        return Err(AppError::InvalidRequest("User already exists".to_string()));
    }

    let password_hash = hash_password(password, bcrypt_cost).await?;

    if !users.insert_user(&UserDocument::registered(username, password_hash)).await? {
        return Err(AppError::InvalidRequest("User already exists".to_string()));
    }

    log::info!("✅ User registered successfully: {}", username);

    Ok(RegisterResponse {
        message: "User registered successfully".to_string(),
        user: RegisteredUser {
            username: username.to_string(),
        },
    })
}
