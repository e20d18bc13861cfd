use sea_orm::{DatabaseConnection, DbErr};
use std::sync::Arc;

/// SeaORM 存储后端
pub struct SeaOrmBackend {
    pub(super) db: Arc<DatabaseConnection>,
}

impl SeaOrmBackend {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 数据库连通性检查
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.db.ping().await
    }
}
