use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::payload::{Payload, into_inner};
use crate::api::middleware::{extract_bearer_token, extract_claims};
use crate::cache::TokenBlacklist;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::security::{JwtManager, PasswordManager};
use crate::storage::{SeaOrmBackend, UserRepository};

#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub uname: Option<String>,
    pub password: Option<String>,
}

impl CredentialsRequest {
    /// 用户名与密码均不能为空
    fn require(self) -> Result<(String, String), AppError> {
        match (self.uname, self.password) {
            (Some(uname), Some(password)) if !uname.is_empty() && !password.is_empty() => {
                Ok((uname, password))
            }
            _ => Err(AppError::BadRequest("用户名或密码不能为空".into())),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub id: i32,
    pub uname: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub uname: String,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// POST /api/session/public/signup
pub async fn signup(
    body: Payload<CredentialsRequest>,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let (uname, password) = into_inner(body).require()?;

    if storage.find_by_username(&uname).await?.is_some() {
        return Err(AppError::BadRequest("用户名已存在".into()));
    }

    let password_hash = PasswordManager::hash_password(&password)?;
    let user = storage.create_user(&uname, &password_hash).await?;

    tracing::info!("User registered: {} (id: {})", user.username, user.id);

    Ok(HttpResponse::Created().json(SignupResponse {
        id: user.id,
        uname: user.username,
    }))
}

/// POST /api/session/public/login
pub async fn login(
    body: Payload<CredentialsRequest>,
    storage: web::Data<Arc<SeaOrmBackend>>,
    jwt_manager: web::Data<Arc<JwtManager>>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let (uname, password) = into_inner(body).require()?;

    // 1. 查找用户并校验密码
    let user = storage
        .find_by_username(&uname)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

    if !PasswordManager::verify_password(&password, &user.password_hash) {
        return Err(AppError::InvalidCredentials);
    }

    // 2. 签发 Token（每次签发的 jti 不同，不会命中旧的黑名单记录）
    let expires_in = config.auth.access_token_expire;
    let token = jwt_manager.generate_token(&user.username, expires_in)?;

    tracing::info!("User logged in: {}", user.username);

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in,
        uname: user.username,
    }))
}

/// POST /api/session/logout
/// 将当前 Token 写入黑名单
pub async fn logout(
    req: HttpRequest,
    blacklist: web::Data<TokenBlacklist>,
) -> Result<HttpResponse, AppError> {
    // Claims 由 JwtAuth 中间件注入
    let claims = extract_claims(&req)?;
    let token = extract_bearer_token(req.headers())?;

    blacklist.revoke(&claims.sub, token).await?;

    tracing::info!("User logged out: {}", claims.sub);

    Ok(HttpResponse::Ok().json(LogoutResponse {
        message: "退出登录成功".to_string(),
    }))
}
