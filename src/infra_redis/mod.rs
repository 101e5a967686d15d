mod session_store_redis;
pub use session_store_redis::*;
