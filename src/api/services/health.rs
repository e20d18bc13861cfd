use actix_web::{HttpResponse, http::StatusCode, web};
use std::sync::Arc;

use crate::cache::TokenBlacklist;
use crate::storage::SeaOrmBackend;

/// GET /public/health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /public/health/ready
pub async fn readiness(
    storage: web::Data<Arc<SeaOrmBackend>>,
    blacklist: web::Data<TokenBlacklist>,
) -> HttpResponse {
    let db_ready = storage.ping().await.is_ok();

    // 缓存不可用时服务仍可降级运行
    let cache = blacklist.cache();
    let cache_status = match cache.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!("Cache ping failed: {}", e);
            "degraded"
        }
    };

    let status_code = if db_ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    HttpResponse::build(status_code).json(serde_json::json!({
        "status": if db_ready { "ready" } else { "not_ready" },
        "database": if db_ready { "connected" } else { "disconnected" },
        "cache": cache_status,
        "cache_backend": cache.backend_name(),
    }))
}

/// GET /public/health/live
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "alive",
    }))
}
