pub mod health;
mod payload;
pub mod session_service;
pub mod todo_service;

// 健康检查
pub use health::{health_check, liveness, readiness};

// 会话服务
pub use session_service::{login as session_login, logout as session_logout, signup as session_signup};

// 清单服务
pub use todo_service::{
    create as todo_create, delete as todo_delete, delete_all as todo_delete_all,
    find_all as todo_find_all, find_all_status as todo_find_all_status,
    find_one as todo_find_one, update as todo_update,
};
