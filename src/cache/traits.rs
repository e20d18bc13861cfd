use async_trait::async_trait;

use crate::errors::AppError;

/// 缓存特征
///
/// 黑名单以单个 hash 存储：key 为黑名单名，field 为用户名，value 为 token。
#[async_trait]
pub trait Cache: Send + Sync {
    /// 读取 hash 字段
    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>, AppError>;

    /// 写入 hash 字段
    async fn hash_set(&self, key: &str, field: &str, value: &str) -> Result<(), AppError>;

    /// 连通性检查
    async fn ping(&self) -> Result<(), AppError>;

    /// 后端名称（用于日志与健康检查）
    fn backend_name(&self) -> &'static str;
}
