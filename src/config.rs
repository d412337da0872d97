use crate::utils::AppError;
use std::env;
use std::fmt::Display;
use std::str::FromStr;

pub const DEFAULT_DATABASE: &str = "todo-nextjs-app";

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub allowed_origins: Vec<String>,
    pub bcrypt_cost: u32,
    pub todos: TodoPolicy,
}

/// Switches for the behaviours older clients depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TodoPolicy {
    /// Adding a todo for an unseen `userId` creates the user document.
    pub auto_create_users: bool,
    /// Update/delete of a task that does not exist answers 404 instead of 200.
    pub report_missing: bool,
}

impl Default for TodoPolicy {
    fn default() -> Self {
        Self {
            auto_create_users: true,
            report_missing: true,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mongodb_uri = var("MONGODB_URI")
            .or_else(|| var("DATABASE_URL"))
            .ok_or_else(|| AppError::Configuration("MONGODB_URI must be set".to_string()))?;

        let bcrypt_cost = parse_or(var("BCRYPT_COST"), "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(AppError::Configuration(format!(
                "BCRYPT_COST must be between 4 and 31, got {}",
                bcrypt_cost
            )));
        }

        let max_pool_size = parse_or(var("MONGODB_MAX_POOL_SIZE"), "MONGODB_MAX_POOL_SIZE", 20)?;
        let min_pool_size = parse_or(var("MONGODB_MIN_POOL_SIZE"), "MONGODB_MIN_POOL_SIZE", 5)?;
        if min_pool_size > max_pool_size {
            return Err(AppError::Configuration(
                "MONGODB_MIN_POOL_SIZE cannot exceed MONGODB_MAX_POOL_SIZE".to_string(),
            ));
        }

        let allowed_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(var("PORT"), "PORT", 3000)?,
            mongodb_uri,
            database_name: var("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            max_pool_size,
            min_pool_size,
            allowed_origins,
            bcrypt_cost,
            todos: TodoPolicy {
                auto_create_users: parse_flag(var("TODOS_AUTO_CREATE_USERS"), "TODOS_AUTO_CREATE_USERS", true)?,
                report_missing: parse_flag(var("TODOS_REPORT_MISSING"), "TODOS_REPORT_MISSING", true)?,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Configuration(format!("Invalid {} value '{}': {}", key, raw, e))),
        None => Ok(default),
    }
}

fn parse_flag(value: Option<String>, key: &str, default: bool) -> Result<bool, AppError> {
    let Some(raw) = value else {
        return Ok(default);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AppError::Configuration(format!(
            "Invalid {} value '{}': expected true or false",
            key, raw
        ))),
    }
}
