use async_trait::async_trait;
use chrono::Utc;
use sea_orm::*;

use crate::errors::AppError;
use crate::storage::entities::{prelude::*, *};
use crate::storage::repository::*;

use super::super::backend::SeaOrmBackend;

#[async_trait]
impl TodoRepository for SeaOrmBackend {
    async fn create_todo(&self, todo: NewTodo) -> Result<todos::Model, AppError> {
        let now = Utc::now();
        let active = todos::ActiveModel {
            title: Set(todo.title),
            description: Set(todo.description),
            status: Set(todo.status),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        };

        let result = active.insert(self.db.as_ref()).await?;
        Ok(result)
    }

    async fn find_todos(&self, title_like: Option<&str>) -> Result<Vec<todos::Model>, AppError> {
        let mut query = Todos::find();

        if let Some(title) = title_like.filter(|t| !t.is_empty()) {
            query = query.filter(todos::Column::Title.like(format!("%{}%", title)));
        }

        let list = query
            .order_by_asc(todos::Column::Id)
            .all(self.db.as_ref())
            .await?;
        Ok(list)
    }

    async fn find_todos_by_status(&self, status: bool) -> Result<Vec<todos::Model>, AppError> {
        let list = Todos::find()
            .filter(todos::Column::Status.eq(status))
            .order_by_asc(todos::Column::Id)
            .all(self.db.as_ref())
            .await?;
        Ok(list)
    }

    async fn find_todo(&self, id: i32) -> Result<Option<todos::Model>, AppError> {
        let todo = Todos::find_by_id(id).one(self.db.as_ref()).await?;
        Ok(todo)
    }

    async fn update_todo(&self, id: i32, changes: TodoChanges) -> Result<u64, AppError> {
        // 未设置的字段保持 NotSet，不会写入 SQL
        let mut active = todos::ActiveModel {
            updated_at: Set(Utc::now().into()),
            ..Default::default()
        };

        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(description) = changes.description {
            active.description = Set(Some(description));
        }
        if let Some(status) = changes.status {
            active.status = Set(status);
        }

        let result = Todos::update_many()
            .set(active)
            .filter(todos::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete_todo(&self, id: i32) -> Result<u64, AppError> {
        let result = Todos::delete_many()
            .filter(todos::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;
        Ok(result.rows_affected)
    }

    async fn delete_all_todos(&self) -> Result<u64, AppError> {
        let result = Todos::delete_many().exec(self.db.as_ref()).await?;
        Ok(result.rows_affected)
    }
}
