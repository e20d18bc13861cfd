use std::sync::Arc;

use crate::cache::traits::Cache;
use crate::errors::AppError;

/// JWT 黑名单
///
/// 每个用户至多一条记录：退出登录时写入当前 token，
/// 之后携带该 token 的请求一律视为已吊销。
#[derive(Clone)]
pub struct TokenBlacklist {
    cache: Arc<dyn Cache>,
    key: String,
}

impl TokenBlacklist {
    pub fn new(cache: Arc<dyn Cache>, key: impl Into<String>) -> Self {
        Self {
            cache,
            key: key.into(),
        }
    }

    /// 查询 token 是否已被吊销
    pub async fn is_revoked(&self, uname: &str, token: &str) -> Result<bool, AppError> {
        let stored = self.cache.hash_get(&self.key, uname).await?;
        Ok(stored.as_deref() == Some(token))
    }

    /// 吊销 token（退出登录）
    pub async fn revoke(&self, uname: &str, token: &str) -> Result<(), AppError> {
        self.cache.hash_set(&self.key, uname, token).await?;
        tracing::debug!("Token blacklisted for user {}", uname);
        Ok(())
    }

    pub fn cache(&self) -> &Arc<dyn Cache> {
        &self.cache
    }
}
