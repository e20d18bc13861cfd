use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tracing_appender::non_blocking::WorkerGuard;

use crate::cache::{Cache, MemoryCache, RedisCache, TokenBlacklist};
use crate::config::{AppConfig, CacheConfig, RedisConfig};
use crate::errors::AppError;
use crate::security::{JwtManager, PublicPaths};
use crate::storage::{SeaOrmBackend, connect, run_migrations};

/// 请求处理共享的进程级状态
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<SeaOrmBackend>,
    pub jwt_manager: Arc<JwtManager>,
    pub blacklist: TokenBlacklist,
    pub public_paths: PublicPaths,
    pub config: AppConfig,
}

impl AppState {
    /// 由已建立的连接组装状态
    pub fn new(
        config: AppConfig,
        db: Arc<DatabaseConnection>,
        cache: Arc<dyn Cache>,
    ) -> Result<Self, AppError> {
        let public_paths = PublicPaths::new(&config.auth.public_path)?;
        let jwt_manager = Arc::new(JwtManager::new(&config.auth.jwt_secret));
        let blacklist = TokenBlacklist::new(cache, config.redis.blacklist_key.clone());

        Ok(Self {
            storage: Arc::new(SeaOrmBackend::new(db)),
            jwt_manager,
            blacklist,
            public_paths,
            config,
        })
    }
}

/// 服务器启动上下文
pub struct StartupContext {
    pub state: AppState,
    _log_guard: Option<WorkerGuard>,
}

/// 初始化服务器
pub async fn prepare_server(config: AppConfig) -> Result<StartupContext, AppError> {
    // 1. 初始化 Rust-TLS（Redis TLS 连接使用）
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .map_err(|_| AppError::Internal("Failed to install crypto provider".into()))?;

    // 2. 初始化日志
    let log_guard = crate::system::init_logging(&config.log);
    tracing::info!(
        "DMall-Lite v{} starting ({})",
        env!("CARGO_PKG_VERSION"),
        config.server.environment
    );

    // 3. 验证配置
    config.validate()?;

    // 4. 初始化数据库并迁移
    let db = connect(&config.database).await?;
    tracing::info!("Database connected");
    run_migrations(&db).await?;

    // 5. 初始化缓存
    let cache = init_cache(&config.cache, &config.redis).await;
    tracing::info!("Cache initialized ({})", cache.backend_name());

    let state = AppState::new(config, Arc::new(db), cache)?;
    tracing::info!("Server initialization complete");

    Ok(StartupContext {
        state,
        _log_guard: log_guard,
    })
}

/// 初始化缓存：优先 Redis，不可用时降级为进程内缓存
async fn init_cache(cache_config: &CacheConfig, redis_config: &RedisConfig) -> Arc<dyn Cache> {
    let memory_cache = || Arc::new(MemoryCache::new(cache_config.memory_cache_size)) as Arc<dyn Cache>;

    if !cache_config.enable_redis_cache {
        tracing::info!("Redis cache disabled, using memory cache");
        return memory_cache();
    }

    match RedisCache::new(redis_config).await {
        Ok(cache) => {
            tracing::info!("Redis cache connected");
            Arc::new(cache)
        }
        Err(e) => {
            tracing::warn!("Redis connection failed: {}", e);
            tracing::warn!("Falling back to memory-only cache; blacklist is not shared across processes");
            memory_cache()
        }
    }
}
