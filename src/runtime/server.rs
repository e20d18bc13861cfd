use actix_cors::Cors;
use actix_files::Files;
use actix_web::{
    App, HttpResponse, HttpServer,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware, web,
};

use crate::api::{error_page, middleware as app_middleware, services};
use crate::errors::AppError;
use crate::runtime::startup::{AppState, StartupContext};

/// 组装应用
///
/// 中间件由外到内：安全响应头（仅 production）→ CORS → 访问日志 →
/// 错误页处理 → JwtAuth → BlacklistGuard → 路由。未匹配的请求渲染 404 错误页。
pub fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let is_production = state.config.server.is_production();
    let static_dir = state.config.server.static_dir.clone();

    App::new()
        // 共享状态
        .app_data(web::Data::new(state.storage.clone()))
        .app_data(web::Data::new(state.jwt_manager.clone()))
        .app_data(web::Data::new(state.blacklist.clone()))
        .app_data(web::Data::new(state.config.clone()))
        // 请求体解析失败统一返回 400
        .app_data(
            web::JsonConfig::default()
                .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
        )
        .app_data(
            web::FormConfig::default()
                .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
        )
        // 中间件（后注册的在外层）
        .wrap(app_middleware::BlacklistGuard::new(
            state.blacklist.clone(),
            state.public_paths.clone(),
        ))
        .wrap(app_middleware::JwtAuth::new(
            state.jwt_manager.clone(),
            state.public_paths.clone(),
        ))
        .wrap(middleware::ErrorHandlers::new().default_handler(error_page::attach_detail))
        .wrap(middleware::Logger::default())
        .wrap(build_cors())
        .wrap(middleware::Condition::new(is_production, security_headers()))
        // 静态资源
        .service(Files::new("/api/public", static_dir))
        // 健康检查端点
        .service(
            web::scope("/public/health")
                .route("", web::get().to(services::health_check))
                .route("/ready", web::get().to(services::readiness))
                .route("/live", web::get().to(services::liveness)),
        )
        // 会话 API
        .service(
            web::scope("/api/session")
                .route("/public/signup", web::post().to(services::session_signup))
                .route("/public/login", web::post().to(services::session_login))
                .route("/logout", web::post().to(services::session_logout)),
        )
        // 清单 API（/public 下的路由免认证）
        .service(
            web::scope("/api/user")
                .route("/public/register", web::post().to(services::todo_create))
                .route("/public/update/{id}", web::put().to(services::todo_update))
                .route("/public/delete/{id}", web::delete().to(services::todo_delete))
                .route("", web::get().to(services::todo_find_all))
                .route("", web::delete().to(services::todo_delete_all))
                // 需先于 /{id} 注册
                .route("/status", web::get().to(services::todo_find_all_status))
                .route("/{id}", web::get().to(services::todo_find_one)),
        )
        // 管理端清单 API（全部需要认证）
        .service(
            web::scope("/api/admin/user")
                .route("", web::get().to(services::todo_find_all))
                .route("", web::post().to(services::todo_create))
                .route("", web::delete().to(services::todo_delete_all))
                .route("/status", web::get().to(services::todo_find_all_status))
                .route("/{id}", web::get().to(services::todo_find_one))
                .route("/{id}", web::put().to(services::todo_update))
                .route("/{id}", web::delete().to(services::todo_delete)),
        )
        .default_service(web::to(not_found))
}

async fn not_found() -> Result<HttpResponse, AppError> {
    Err(AppError::RouteNotFound)
}

/// CORS：回显请求来源并允许携带凭据
fn build_cors() -> Cors {
    Cors::default()
        .allowed_origin_fn(|_origin, _req_head| true)
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}

fn security_headers() -> middleware::DefaultHeaders {
    middleware::DefaultHeaders::new()
        .add(("X-Version", env!("CARGO_PKG_VERSION")))
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "SAMEORIGIN"))
        .add(("X-DNS-Prefetch-Control", "off"))
        .add(("Referrer-Policy", "no-referrer"))
        .add((
            "Strict-Transport-Security",
            "max-age=15552000; includeSubDomains",
        ))
}

pub async fn run_server(ctx: StartupContext) -> std::io::Result<()> {
    let server = &ctx.state.config.server;
    let bind_addr = format!("{}:{}", server.host, server.port);

    tracing::info!("Starting HTTP server on {}", bind_addr);

    let state = ctx.state.clone();

    HttpServer::new(move || build_app(state.clone()))
        .bind(&bind_addr)?
        .run()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{Cache, MemoryCache};
    use crate::config::AppConfig;
    use crate::errors::{AUTH_FAILED_CODE, AUTH_FAILED_MSG};
    use crate::storage::setup_test_db;
    use actix_web::{
        dev::Service,
        http::{StatusCode, header},
        test,
    };
    use async_trait::async_trait;
    use sea_orm::{Database, DatabaseConnection};
    use serde_json::{Value, json};
    use std::sync::Arc;

    const ORIGIN: &str = "http://shop.example.com";

    /// 读操作总是失败的缓存
    struct UnavailableCache;

    #[async_trait]
    impl Cache for UnavailableCache {
        async fn hash_get(&self, _key: &str, _field: &str) -> Result<Option<String>, AppError> {
            Err(AppError::Internal("cache unavailable".into()))
        }

        async fn hash_set(&self, _key: &str, _field: &str, _value: &str) -> Result<(), AppError> {
            Ok(())
        }

        async fn ping(&self) -> Result<(), AppError> {
            Err(AppError::Internal("cache unavailable".into()))
        }

        fn backend_name(&self) -> &'static str {
            "unavailable"
        }
    }

    fn memory_cache() -> Arc<dyn Cache> {
        Arc::new(MemoryCache::new(100))
    }

    fn production_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.environment = "production".to_string();
        config
    }

    async fn test_state() -> AppState {
        AppState::new(AppConfig::default(), setup_test_db().await, memory_cache())
            .expect("default config should build state")
    }

    /// 未执行迁移的数据库
    async fn empty_db() -> Arc<DatabaseConnection> {
        Arc::new(
            Database::connect("sqlite::memory:")
                .await
                .expect("Failed to create test database"),
        )
    }

    async fn send<S, R, B>(app: &S, req: R) -> (StatusCode, Vec<u8>)
    where
        S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let resp = test::call_service(app, req).await;
        let status = resp.status();
        (status, test::read_body(resp).await.to_vec())
    }

    fn json_body(body: &[u8]) -> Value {
        serde_json::from_slice(body).expect("response should be json")
    }

    fn bearer(token: &str) -> (header::HeaderName, String) {
        (header::AUTHORIZATION, format!("Bearer {}", token))
    }

    fn login_request(uname: &str, password: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/session/public/login")
            .set_json(json!({ "uname": uname, "password": password }))
    }

    async fn login<S, R, B>(app: &S, req: R) -> String
    where
        S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
        B: MessageBody,
    {
        let (status, body) = send(app, req).await;
        assert_eq!(status, StatusCode::OK);
        json_body(&body)["token"]
            .as_str()
            .expect("token present")
            .to_string()
    }

    #[actix_web::test]
    async fn test_protected_route_requires_token() {
        let app = test::init_service(build_app(test_state().await)).await;

        let req = test::TestRequest::get().uri("/api/user").to_request();
        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let body = json_body(&body);
        assert_eq!(body["code"], AUTH_FAILED_CODE);
        assert_eq!(body["msg"], AUTH_FAILED_MSG);
    }

    #[actix_web::test]
    async fn test_invalid_token_rejected() {
        let app = test::init_service(build_app(test_state().await)).await;

        let req = test::TestRequest::get()
            .uri("/api/admin/user/status")
            .insert_header(bearer("not.a.jwt"))
            .to_request();
        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(&body)["code"], AUTH_FAILED_CODE);
    }

    #[actix_web::test]
    async fn test_public_register_and_fetch() {
        let state = test_state().await;
        let token = state.jwt_manager.generate_token("alice", 3600).unwrap();
        let app = test::init_service(build_app(state)).await;

        // 无需 Token
        let req = test::TestRequest::post()
            .uri("/api/user/public/register")
            .set_json(json!({ "title": "buy milk", "description": "2L" }))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);

        let created = json_body(&body);
        assert_eq!(created["title"], "buy milk");
        assert_eq!(created["status"], false);
        let id = created["id"].as_i64().unwrap();

        // 查询单条需要 Token
        let req = test::TestRequest::get()
            .uri(&format!("/api/user/{}", id))
            .insert_header(bearer(&token))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["description"], "2L");
    }

    #[actix_web::test]
    async fn test_register_accepts_form_body() {
        let app = test::init_service(build_app(test_state().await)).await;

        let req = test::TestRequest::post()
            .uri("/api/user/public/register")
            .set_form([("title", "from form")])
            .to_request();
        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["title"], "from form");
    }

    #[actix_web::test]
    async fn test_register_without_title() {
        let app = test::init_service(build_app(test_state().await)).await;

        let req = test::TestRequest::post()
            .uri("/api/user/public/register")
            .set_json(json!({ "description": "no title" }))
            .to_request();
        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(&body)["message"], "内容不能为空");
    }

    #[actix_web::test]
    async fn test_find_one_missing() {
        let state = test_state().await;
        let token = state.jwt_manager.generate_token("alice", 3600).unwrap();
        let app = test::init_service(build_app(state)).await;

        let req = test::TestRequest::get()
            .uri("/api/user/42")
            .insert_header(bearer(&token))
            .to_request();
        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json_body(&body)["message"], "没有找到 42 的清单");
    }

    #[actix_web::test]
    async fn test_update_reports_affected_rows() {
        let app = test::init_service(build_app(test_state().await)).await;

        let req = test::TestRequest::post()
            .uri("/api/user/public/register")
            .set_json(json!({ "title": "draft" }))
            .to_request();
        let (_, body) = send(&app, req).await;
        let id = json_body(&body)["id"].as_i64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/user/public/update/{}", id))
            .set_json(json!({ "status": true }))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["message"], "更新成功");

        let req = test::TestRequest::put()
            .uri("/api/user/public/update/9999")
            .set_json(json!({ "status": true }))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["message"], "第 9999 条更新失败。");
    }

    #[actix_web::test]
    async fn test_delete_missing_reports_failure() {
        let app = test::init_service(build_app(test_state().await)).await;

        let req = test::TestRequest::delete()
            .uri("/api/user/public/delete/7")
            .to_request();
        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["message"], "删除第7条清单失败。");
    }

    #[actix_web::test]
    async fn test_status_filter_and_delete_all() {
        let state = test_state().await;
        let token = state.jwt_manager.generate_token("alice", 3600).unwrap();
        let app = test::init_service(build_app(state)).await;

        for (title, status) in [("a", true), ("b", false), ("c", true)] {
            let req = test::TestRequest::post()
                .uri("/api/user/public/register")
                .set_json(json!({ "title": title, "status": status }))
                .to_request();
            let (code, _) = send(&app, req).await;
            assert_eq!(code, StatusCode::OK);
        }

        let req = test::TestRequest::get()
            .uri("/api/user/status")
            .insert_header(bearer(&token))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body).as_array().unwrap().len(), 2);

        let req = test::TestRequest::delete()
            .uri("/api/user")
            .insert_header(bearer(&token))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["message"], "删除3条清单 ");
    }

    #[actix_web::test]
    async fn test_session_lifecycle() {
        let app = test::init_service(build_app(test_state().await)).await;

        let req = test::TestRequest::post()
            .uri("/api/session/public/signup")
            .set_json(json!({ "uname": "bob", "password": "s3cret-pass" }))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json_body(&body)["uname"], "bob");

        // 重复注册
        let req = test::TestRequest::post()
            .uri("/api/session/public/signup")
            .set_json(json!({ "uname": "bob", "password": "other" }))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let token = login(&app, login_request("bob", "s3cret-pass").to_request()).await;

        let req = test::TestRequest::get()
            .uri("/api/user")
            .insert_header(bearer(&token))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);

        // 退出登录
        let req = test::TestRequest::post()
            .uri("/api/session/logout")
            .insert_header(bearer(&token))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["message"], "退出登录成功");

        // 已吊销的 Token
        let req = test::TestRequest::get()
            .uri("/api/user")
            .insert_header(bearer(&token))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(&body)["msg"], AUTH_FAILED_MSG);

        // 重新登录：新 Token 可用，旧 Token 仍然无效
        let renewed = login(&app, login_request("bob", "s3cret-pass").to_request()).await;
        assert_ne!(renewed, token);

        let req = test::TestRequest::get()
            .uri("/api/user")
            .insert_header(bearer(&renewed))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/user")
            .insert_header(bearer(&token))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_login_wrong_password() {
        let app = test::init_service(build_app(test_state().await)).await;

        let req = test::TestRequest::post()
            .uri("/api/session/public/signup")
            .set_json(json!({ "uname": "carol", "password": "right-pass" }))
            .to_request();
        send(&app, req).await;

        let req = login_request("carol", "wrong-pass").to_request();
        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(&body)["code"], AUTH_FAILED_CODE);
    }

    #[actix_web::test]
    async fn test_uname_header_and_subject_both_checked() {
        let state = test_state().await;
        let blacklist = state.blacklist.clone();
        let token = state.jwt_manager.generate_token("alice", 3600).unwrap();
        let app = test::init_service(build_app(state)).await;

        let request = |uname: &str| {
            test::TestRequest::get()
                .uri("/api/user")
                .insert_header(bearer(&token))
                .insert_header((app_middleware::UNAME_HEADER, uname.to_string()))
                .to_request()
        };

        // 与 subject 不同的请求头不影响未吊销的 Token
        let (status, _) = send(&app, request("alice-old")).await;
        assert_eq!(status, StatusCode::OK);

        // 请求头对应的记录命中
        blacklist.revoke("alice-old", &token).await.unwrap();
        let (status, _) = send(&app, request("alice-old")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        // subject 对应的记录命中，即使请求头指向其他用户
        blacklist.revoke("alice", &token).await.unwrap();
        let (status, _) = send(&app, request("nobody")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_health_is_public() {
        let app = test::init_service(build_app(test_state().await)).await;

        let req = test::TestRequest::get().uri("/public/health").to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["status"], "ok");

        let req = test::TestRequest::get()
            .uri("/public/health/ready")
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json_body(&body)["cache_backend"], "memory");
    }

    #[actix_web::test]
    async fn test_unknown_route_renders_error_page() {
        let app = test::init_service(build_app(test_state().await)).await;

        let req = test::TestRequest::get()
            .uri("/api/user/public/nothing/here")
            .to_request();
        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("<h2>404</h2>"));
    }

    #[actix_web::test]
    async fn test_auth_failure_keeps_cors_headers() {
        let app = test::init_service(build_app(test_state().await)).await;

        let req = test::TestRequest::get()
            .uri("/api/user")
            .insert_header((header::ORIGIN, ORIGIN))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            ORIGIN
        );
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
                .unwrap(),
            "true"
        );

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], AUTH_FAILED_CODE);
    }

    #[actix_web::test]
    async fn test_revoked_token_keeps_cors_headers() {
        let state = test_state().await;
        let token = state.jwt_manager.generate_token("alice", 3600).unwrap();
        state.blacklist.revoke("alice", &token).await.unwrap();
        let app = test::init_service(build_app(state)).await;

        let req = test::TestRequest::get()
            .uri("/api/user")
            .insert_header((header::ORIGIN, ORIGIN))
            .insert_header(bearer(&token))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    }

    #[actix_web::test]
    async fn test_production_headers_on_auth_failure() {
        let state = AppState::new(production_config(), setup_test_db().await, memory_cache())
            .unwrap();
        let app = test::init_service(build_app(state)).await;

        let req = test::TestRequest::get().uri("/api/user").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers().get("x-content-type-options").unwrap(),
            "nosniff"
        );
        assert_eq!(resp.headers().get("x-frame-options").unwrap(), "SAMEORIGIN");
    }

    #[actix_web::test]
    async fn test_database_failure_returns_message() {
        let state = AppState::new(AppConfig::default(), empty_db().await, memory_cache()).unwrap();
        let token = state.jwt_manager.generate_token("alice", 3600).unwrap();
        let app = test::init_service(build_app(state)).await;

        // 底层错误信息
        let req = test::TestRequest::get()
            .uri("/api/user")
            .insert_header(bearer(&token))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let message = json_body(&body)["message"].as_str().unwrap().to_string();
        assert!(message.contains("todos"), "unexpected message: {}", message);

        let req = test::TestRequest::post()
            .uri("/api/user/public/register")
            .set_json(json!({ "title": "lost" }))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!json_body(&body)["message"].as_str().unwrap().is_empty());

        // 固定提示
        let req = test::TestRequest::get()
            .uri("/api/user/1")
            .insert_header(bearer(&token))
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(&body)["message"], "查询第 1 条清单时出错");

        let req = test::TestRequest::delete()
            .uri("/api/user/public/delete/1")
            .to_request();
        let (status, body) = send(&app, req).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(&body)["message"], "不能删除清单：1");
    }

    #[actix_web::test]
    async fn test_blacklist_read_failure_rejects_request() {
        let cache: Arc<dyn Cache> = Arc::new(UnavailableCache);
        let state = AppState::new(AppConfig::default(), setup_test_db().await, cache).unwrap();
        let token = state.jwt_manager.generate_token("alice", 3600).unwrap();
        let app = test::init_service(build_app(state)).await;

        let req = test::TestRequest::get()
            .uri("/api/user")
            .insert_header(bearer(&token))
            .to_request();
        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("<h2>500</h2>"));

        // 免认证路径不查询黑名单
        let req = test::TestRequest::post()
            .uri("/api/user/public/register")
            .set_json(json!({ "title": "still works" }))
            .to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_readiness_reports_degraded_cache() {
        let cache: Arc<dyn Cache> = Arc::new(UnavailableCache);
        let state = AppState::new(AppConfig::default(), setup_test_db().await, cache).unwrap();
        let app = test::init_service(build_app(state)).await;

        let req = test::TestRequest::get()
            .uri("/public/health/ready")
            .to_request();
        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::OK);
        let body = json_body(&body);
        assert_eq!(body["status"], "ready");
        assert_eq!(body["cache"], "degraded");
    }

    #[actix_web::test]
    async fn test_readiness_reports_database_down() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        let handle = db.clone();
        db.close().await.unwrap();

        let state = AppState::new(AppConfig::default(), Arc::new(handle), memory_cache()).unwrap();
        let app = test::init_service(build_app(state)).await;

        let req = test::TestRequest::get()
            .uri("/public/health/ready")
            .to_request();
        let (status, body) = send(&app, req).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(&body);
        assert_eq!(body["status"], "not_ready");
        assert_eq!(body["database"], "disconnected");
    }

    #[actix_web::test]
    async fn test_error_page_detail_follows_environment() {
        let request = || {
            test::TestRequest::get()
                .uri("/api/user/public/nothing/here")
                .to_request()
        };

        // development：附带详情
        let app = test::init_service(build_app(test_state().await)).await;
        let (status, body) = send(&app, request()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("<pre>RouteNotFound</pre>"));

        // production：仅状态与提示
        let state = AppState::new(production_config(), setup_test_db().await, memory_cache())
            .unwrap();
        let app = test::init_service(build_app(state)).await;
        let (status, body) = send(&app, request()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("<h1>Not Found</h1>"));
        assert!(!html.contains("<pre>"));
    }
}
