pub mod backend;
mod backends;
pub mod connection;
pub mod entities;
pub mod repository;

pub use backend::SeaOrmBackend;
pub use connection::{connect, run_migrations};
pub use repository::{NewTodo, TodoChanges, TodoRepository, UserRepository};

#[cfg(test)]
pub(crate) use backends::tests::setup_test_db;
