pub mod cache;
pub mod memory;
pub mod redis_store;
pub mod store;

mod macros;

pub use cache::{Cache, CacheKey, CacheWriterHandle};
pub use memory::InMemoryStore;
pub use redis_store::{create_redis_client, RedisStore};
pub use store::KeyValueStore;
