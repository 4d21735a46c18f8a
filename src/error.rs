use actix_web::{HttpResponse, ResponseError};
use chrono::{DateTime, Utc};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Auth error: {0}")]
    AuthError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Insufficient tickets")]
    InsufficientFunds,

    #[error("Insufficient owned quantity")]
    InsufficientItems,

    #[error("Login bonus already claimed")]
    AlreadyClaimed { next_reset_at: DateTime<Utc> },

    #[error("Already processed")]
    AlreadyProcessed,

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status_code, error_code, message) = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                (
                    actix_web::http::StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::AuthError(msg) => {
                log::warn!("Authentication error: {msg}");
                (
                    actix_web::http::StatusCode::UNAUTHORIZED,
                    "AUTH_ERROR",
                    msg.clone(),
                )
            }
            AppError::NotFound(msg) => (
                actix_web::http::StatusCode::NOT_FOUND,
                "NOT_FOUND",
                msg.clone(),
            ),
            AppError::Forbidden => {
                log::warn!("Forbidden access");
                (
                    actix_web::http::StatusCode::FORBIDDEN,
                    "FORBIDDEN",
                    "Forbidden".to_string(),
                )
            }
            AppError::InsufficientFunds => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INSUFFICIENT_FUNDS",
                "チケットが不足しています".to_string(),
            ),
            AppError::InsufficientItems => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "INSUFFICIENT_ITEMS",
                "所持枚数が不足しています".to_string(),
            ),
            AppError::AlreadyClaimed { next_reset_at } => {
                // 领取窗口错误需要附带下次重置时间, 单独构造响应
                return HttpResponse::BadRequest().json(json!({
                    "success": false,
                    "error": {
                        "code": "ALREADY_CLAIMED",
                        "message": "本日のログインボーナスは受け取り済みです",
                        "next_reset_at": next_reset_at,
                    }
                }));
            }
            AppError::AlreadyProcessed => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "ALREADY_PROCESSED",
                "処理済みです".to_string(),
            ),
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "Database error".to_string(),
                )
            }
            _ => {
                log::error!("Internal error: {self}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        HttpResponse::build(status_code).json(json!({
            "success": false,
            "error": {
                "code": error_code,
                "message": message
            }
        }))
    }
}
