use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::cache::traits::Cache;
use crate::config::RedisConfig;
use crate::errors::AppError;

/// Redis 缓存实现
pub struct RedisCache {
    conn: Arc<Mutex<MultiplexedConnection>>,
}

impl RedisCache {
    pub async fn new(config: &RedisConfig) -> Result<Self, AppError> {
        let client = Client::open(config.url.as_str())?;
        let conn = client.get_multiplexed_async_connection().await?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.conn.lock().await;
        let value: Option<String> = conn.hget(key, field).await?;
        Ok(value)
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), AppError> {
        let mut conn = self.conn.lock().await;
        let _: () = conn.hset(key, field, value).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        let mut conn = self.conn.lock().await;
        let _: String = redis::cmd("PING").query_async(&mut *conn).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}
