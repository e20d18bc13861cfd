use migration::{Migrator, MigratorTrait};
use sea_orm::sqlx::SqlitePool;
use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, SqlxSqliteConnector};
use std::str::FromStr;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::errors::AppError;

/// 连接 SQLite 数据库（自动创建文件，启用 WAL）
async fn connect_sqlite(config: &DatabaseConfig) -> Result<DatabaseConnection, AppError> {
    let opt = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| AppError::Config(format!("Invalid SQLite URL: {}", e)))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_secs(5))
        .foreign_keys(true);

    let pool = SqlitePool::connect_with(opt)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to connect to SQLite: {}", e)))?;

    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// 连接 MySQL / PostgreSQL
async fn connect_pooled(config: &DatabaseConfig) -> Result<DatabaseConnection, AppError> {
    let mut opt = ConnectOptions::new(config.url.clone());
    opt.max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(3600))
        .sqlx_logging(false);

    Ok(Database::connect(opt).await?)
}

/// 按 URL 前缀选择数据库驱动
pub async fn connect(config: &DatabaseConfig) -> Result<DatabaseConnection, AppError> {
    let url = config.url.as_str();

    if url.starts_with("sqlite:") {
        tracing::info!("Using SQLite database (WAL enabled)");
        connect_sqlite(config).await
    } else if url.starts_with("postgres://") || url.starts_with("postgresql://") {
        tracing::info!("Using PostgreSQL database");
        connect_pooled(config).await
    } else if url.starts_with("mysql://") {
        tracing::info!("Using MySQL database");
        connect_pooled(config).await
    } else {
        Err(AppError::Config(format!("Unsupported database URL: {}", url)))
    }
}

/// 运行数据库迁移
pub async fn run_migrations(db: &DatabaseConnection) -> Result<(), AppError> {
    Migrator::up(db, None).await?;

    tracing::info!("Database migrations completed");
    Ok(())
}
