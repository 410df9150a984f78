mod cache;
mod run_log;

pub use cache::{MatchCache, MemoryMatchCache, RedisMatchCache};
pub use cache::{DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT, KEY_PREFIX, record_fields, record_from_fields};
pub use run_log::RunLog;
