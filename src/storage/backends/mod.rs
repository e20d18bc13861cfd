// 各仓储的 SeaORM 实现
mod todo;
mod user;
