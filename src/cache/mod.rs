pub mod blacklist;
pub mod memory_cache;
pub mod redis_cache;
pub mod traits;

pub use blacklist::TokenBlacklist;
pub use memory_cache::MemoryCache;
pub use redis_cache::RedisCache;
pub use traits::Cache;
