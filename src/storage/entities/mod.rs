pub mod prelude;

pub mod todos;
pub mod users;
