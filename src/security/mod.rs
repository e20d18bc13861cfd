pub mod jwt;
pub mod password;
pub mod public_path;

pub use jwt::{Claims, JwtManager};
pub use password::PasswordManager;
pub use public_path::PublicPaths;
