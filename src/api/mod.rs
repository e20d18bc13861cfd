pub mod error_page;
pub mod middleware;
pub mod services;
