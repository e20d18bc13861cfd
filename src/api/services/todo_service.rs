//! 清单条目控制器
//!
//! 每个处理函数只做一次 ORM 调用；持久化失败统一以 500 `{"message"}` 返回，
//! 优先使用底层错误信息，否则使用固定提示。

use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::payload::{Payload, into_inner};
use crate::errors::AppError;
use crate::storage::{NewTodo, SeaOrmBackend, TodoChanges, TodoRepository};

#[derive(Debug, Deserialize)]
pub struct CreateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// 持久化错误：优先返回底层错误信息
fn persistence_error(err: AppError, fallback: &str) -> AppError {
    tracing::error!("{}", err.format_simple());

    let message = match &err {
        AppError::Database(db_err) => db_err.to_string(),
        _ => String::new(),
    };

    if message.is_empty() {
        AppError::Persistence(fallback.to_string())
    } else {
        AppError::Persistence(message)
    }
}

/// 持久化错误：固定提示
fn fixed_error(err: AppError, message: String) -> AppError {
    tracing::error!("{}", err.format_simple());
    AppError::Persistence(message)
}

/// POST /api/user/public/register
/// 创建一条清单
pub async fn create(
    body: Payload<CreateTodoRequest>,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let body = into_inner(body);

    let title = match body.title {
        Some(title) if !title.is_empty() => title,
        _ => return Err(AppError::BadRequest("内容不能为空".into())),
    };

    let todo = NewTodo {
        title,
        description: body.description,
        status: body.status.unwrap_or(false),
    };

    let created = storage
        .create_todo(todo)
        .await
        .map_err(|e| persistence_error(e, "创建清单是发生错误。"))?;

    tracing::info!("Todo created: {}", created.id);

    Ok(HttpResponse::Ok().json(created))
}

/// GET /api/user
/// 搜索清单（可按标题模糊匹配）
pub async fn find_all(
    query: web::Query<TitleQuery>,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let list = storage
        .find_todos(query.title.as_deref())
        .await
        .map_err(|e| persistence_error(e, "搜索时，发生错误。"))?;

    Ok(HttpResponse::Ok().json(list))
}

/// GET /api/user/status
/// 所有已完成（status = true）的清单
pub async fn find_all_status(
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let list = storage
        .find_todos_by_status(true)
        .await
        .map_err(|e| persistence_error(e, "搜索清单时出错"))?;

    Ok(HttpResponse::Ok().json(list))
}

/// GET /api/user/{id}
pub async fn find_one(
    id: web::Path<i32>,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();

    let todo = storage
        .find_todo(id)
        .await
        .map_err(|e| fixed_error(e, format!("查询第 {} 条清单时出错", id)))?
        .ok_or_else(|| AppError::NotFound(format!("没有找到 {} 的清单", id)))?;

    Ok(HttpResponse::Ok().json(todo))
}

/// PUT /api/user/public/update/{id}
/// 恰好更新一行时报告成功，否则报告失败
pub async fn update(
    id: web::Path<i32>,
    body: Payload<TodoChanges>,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();

    let affected = storage
        .update_todo(id, into_inner(body))
        .await
        .map_err(|e| fixed_error(e, format!("更新第 {} 条清单时出错", id)))?;

    let message = if affected == 1 {
        "更新成功".to_string()
    } else {
        format!("第 {} 条更新失败。", id)
    };

    Ok(HttpResponse::Ok().json(MessageResponse::new(message)))
}

/// DELETE /api/user/public/delete/{id}
pub async fn delete(
    id: web::Path<i32>,
    storage: web::Data<Arc<SeaOrmBackend>>,
) -> Result<HttpResponse, AppError> {
    let id = id.into_inner();

    let affected = storage
        .delete_todo(id)
        .await
        .map_err(|e| fixed_error(e, format!("不能删除清单：{}", id)))?;

    let message = if affected == 1 {
        tracing::info!("Todo deleted: {}", id);
        "删除成功".to_string()
    } else {
        format!("删除第{}条清单失败。", id)
    };

    Ok(HttpResponse::Ok().json(MessageResponse::new(message)))
}

/// DELETE /api/user
/// 删除全部清单
pub async fn delete_all(storage: web::Data<Arc<SeaOrmBackend>>) -> Result<HttpResponse, AppError> {
    let removed = storage
        .delete_all_todos()
        .await
        .map_err(|e| persistence_error(e, "删除所有清单时出错"))?;

    tracing::info!("All todos deleted ({} rows)", removed);

    Ok(HttpResponse::Ok().json(MessageResponse::new(format!("删除{}条清单 ", removed))))
}
