use async_trait::async_trait;
use serde::Deserialize;

use super::entities::{todos, users};
use crate::errors::AppError;

/// 新建清单条目
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub status: bool,
}

/// 清单条目的部分更新，`None` 字段保持原值
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<bool>,
}

/// 清单仓储
#[async_trait]
pub trait TodoRepository: Send + Sync {
    async fn create_todo(&self, todo: NewTodo) -> Result<todos::Model, AppError>;
    /// `title_like` 为子串匹配
    async fn find_todos(&self, title_like: Option<&str>) -> Result<Vec<todos::Model>, AppError>;
    async fn find_todos_by_status(&self, status: bool) -> Result<Vec<todos::Model>, AppError>;
    async fn find_todo(&self, id: i32) -> Result<Option<todos::Model>, AppError>;
    /// 返回受影响行数
    async fn update_todo(&self, id: i32, changes: TodoChanges) -> Result<u64, AppError>;
    /// 返回受影响行数
    async fn delete_todo(&self, id: i32) -> Result<u64, AppError>;
    /// 返回删除的行数
    async fn delete_all_todos(&self) -> Result<u64, AppError>;
}

/// 用户仓储
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<users::Model, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<users::Model>, AppError>;
}
