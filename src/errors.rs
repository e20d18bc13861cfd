use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::api::error_page;

/// 认证失败时返回的固定错误码
pub const AUTH_FAILED_CODE: &str = "DM-APP-000001";
/// 认证失败时返回的固定提示
pub const AUTH_FAILED_MSG: &str = "身份认证失败!";

#[derive(Debug, Error)]
pub enum AppError {
    // 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    // Redis 错误
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    // 认证错误
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Unauthorized")]
    Unauthorized,

    // 控制器错误（以 {"message"} 形式返回）
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Persistence(String),

    // 通用错误（渲染错误页）
    #[error("Not Found")]
    RouteNotFound,

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "E001",
            AppError::Redis(_) => "E002",
            AppError::InvalidCredentials
            | AppError::TokenExpired
            | AppError::InvalidToken
            | AppError::TokenRevoked
            | AppError::Unauthorized => AUTH_FAILED_CODE,
            AppError::BadRequest(_) => "E013",
            AppError::NotFound(_) | AppError::RouteNotFound => "E012",
            AppError::Persistence(_) | AppError::Internal(_) => "E014",
            AppError::Config(_) => "E015",
        }
    }

    /// 是否属于认证失败
    pub fn is_auth_failure(&self) -> bool {
        self.status_code() == StatusCode::UNAUTHORIZED
    }

    /// 是否渲染为通用错误页（认证失败与控制器错误除外）
    pub fn renders_page(&self) -> bool {
        !self.is_auth_failure()
            && !matches!(
                self,
                AppError::BadRequest(_) | AppError::NotFound(_) | AppError::Persistence(_)
            )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("[{}] {}", self.code(), self)
    }
}

#[derive(Serialize)]
struct AuthErrorResponse {
    code: &'static str,
    msg: &'static str,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials
            | AppError::TokenExpired
            | AppError::InvalidToken
            | AppError::TokenRevoked
            | AppError::Unauthorized => StatusCode::UNAUTHORIZED,

            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,

            AppError::NotFound(_) | AppError::RouteNotFound => StatusCode::NOT_FOUND,

            AppError::Database(_)
            | AppError::Redis(_)
            | AppError::Persistence(_)
            | AppError::Internal(_)
            | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match self {
            _ if self.is_auth_failure() => HttpResponse::build(status).json(AuthErrorResponse {
                code: AUTH_FAILED_CODE,
                msg: AUTH_FAILED_MSG,
            }),
            AppError::BadRequest(message)
            | AppError::NotFound(message)
            | AppError::Persistence(message) => {
                HttpResponse::build(status).json(MessageResponse {
                    message: message.clone(),
                })
            }
            _ => {
                if status.is_server_error() {
                    tracing::error!("{}", self.format_simple());
                }
                error_page::render(status, &self.to_string(), None)
            }
        }
    }
}
