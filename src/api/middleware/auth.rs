use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{AUTHORIZATION, HeaderMap},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::rc::Rc;
use std::sync::Arc;

use crate::errors::AppError;
use crate::security::{Claims, JwtManager, PublicPaths};

/// JWT 认证中间件
///
/// 免认证路径直接放行；其余请求必须携带有效的 HS256 Bearer Token，
/// 验证通过后 Claims 写入请求扩展。认证失败直接生成 401 响应，
/// 外层的 CORS、日志与安全响应头中间件照常处理。
pub struct JwtAuth {
    jwt_manager: Arc<JwtManager>,
    public_paths: PublicPaths,
}

impl JwtAuth {
    pub fn new(jwt_manager: Arc<JwtManager>, public_paths: PublicPaths) -> Self {
        Self {
            jwt_manager,
            public_paths,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            jwt_manager: self.jwt_manager.clone(),
            public_paths: self.public_paths.clone(),
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    jwt_manager: Arc<JwtManager>,
    public_paths: PublicPaths,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if self.public_paths.is_public(req.path()) {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        // 验证 JWT
        let verified = extract_bearer_token(req.headers())
            .and_then(|token| self.jwt_manager.verify_token(token));

        let claims = match verified {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("JWT rejected for {}: {}", req.path(), e);
                let resp = req.error_response(e).map_into_right_body();
                return Box::pin(async move { Ok(resp) });
            }
        };

        // 将 Claims 注入到请求扩展中
        req.extensions_mut().insert(claims);

        let service = self.service.clone();
        Box::pin(async move {
            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

/// 从请求头中提取 Bearer Token
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .ok_or(AppError::Unauthorized)
}

/// 从请求扩展中提取 Claims
pub fn extract_claims(req: &impl HttpMessage) -> Result<Claims, AppError> {
    req.extensions()
        .get::<Claims>()
        .cloned()
        .ok_or(AppError::Unauthorized)
}
