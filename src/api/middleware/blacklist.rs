use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::rc::Rc;

use super::auth::extract_bearer_token;
use crate::cache::TokenBlacklist;
use crate::errors::AppError;
use crate::security::{Claims, PublicPaths};

/// 携带用户名的请求头
pub const UNAME_HEADER: &str = "uname";

/// 黑名单校验中间件（退出登录后的 Token 一律拒绝）
///
/// 必须位于 [`super::JwtAuth`] 之内，依赖其写入的 Claims。
/// 查询 `uname` 请求头对应的记录，并始终查询 Token subject 对应的记录。
pub struct BlacklistGuard {
    blacklist: TokenBlacklist,
    public_paths: PublicPaths,
}

impl BlacklistGuard {
    pub fn new(blacklist: TokenBlacklist, public_paths: PublicPaths) -> Self {
        Self {
            blacklist,
            public_paths,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BlacklistGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BlacklistGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BlacklistGuardMiddleware {
            service: Rc::new(service),
            blacklist: self.blacklist.clone(),
            public_paths: self.public_paths.clone(),
        }))
    }
}

pub struct BlacklistGuardMiddleware<S> {
    service: Rc<S>,
    blacklist: TokenBlacklist,
    public_paths: PublicPaths,
}

impl<S, B> Service<ServiceRequest> for BlacklistGuardMiddleware<S>
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

        let lookup = extract_bearer_token(req.headers())
            .map(str::to_string)
            .and_then(|token| lookup_unames(&req).map(|unames| (unames, token)));

        let (unames, token) = match lookup {
            Ok(pair) => pair,
            Err(e) => {
                let resp = req.error_response(e).map_into_right_body();
                return Box::pin(async move { Ok(resp) });
            }
        };

        let blacklist = self.blacklist.clone();
        let service = self.service.clone();

        Box::pin(async move {
            match is_revoked(&blacklist, &unames, &token).await {
                Ok(false) => service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body),
                Ok(true) => {
                    tracing::info!("Rejected blacklisted token for user {}", unames.join(","));
                    Ok(req
                        .error_response(AppError::TokenRevoked)
                        .map_into_right_body())
                }
                Err(e) => {
                    tracing::error!("Blacklist lookup failed: {}", e.format_simple());
                    Ok(req.error_response(e).map_into_right_body())
                }
            }
        })
    }
}

/// 任一记录与当前 Token 相同即视为已吊销
async fn is_revoked(
    blacklist: &TokenBlacklist,
    unames: &[String],
    token: &str,
) -> Result<bool, AppError> {
    for uname in unames {
        if blacklist.is_revoked(uname, token).await? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// 黑名单查询使用的用户名：`uname` 请求头（若有），其后是 Token 的 subject
fn lookup_unames(req: &ServiceRequest) -> Result<Vec<String>, AppError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .cloned()
        .ok_or(AppError::Unauthorized)?;

    let header = req
        .headers()
        .get(UNAME_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|uname| !uname.is_empty() && *uname != claims.sub)
        .map(str::to_string);

    Ok(header.into_iter().chain([claims.sub]).collect())
}
