pub mod auth;
pub mod blacklist;

pub use auth::{JwtAuth, extract_bearer_token, extract_claims};
pub use blacklist::{BlacklistGuard, UNAME_HEADER};
