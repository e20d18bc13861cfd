use async_trait::async_trait;
use moka::future::Cache as MokaCache;

use crate::cache::traits::Cache;
use crate::errors::AppError;

/// 内存缓存实现（基于 Moka）
///
/// Redis 不可用时作为降级方案，数据仅在当前进程内有效。
pub struct MemoryCache {
    cache: MokaCache<(String, String), String>,
}

impl MemoryCache {
    pub fn new(max_capacity: u64) -> Self {
        Self {
            cache: MokaCache::builder().max_capacity(max_capacity).build(),
        }
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>, AppError> {
        Ok(self.cache.get(&(key.to_string(), field.to_string())).await)
    }

    async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), AppError> {
        self.cache
            .insert((key.to_string(), field.to_string()), value.to_string())
            .await;
        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
