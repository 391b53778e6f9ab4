//! Redis storage implementation.

mod store;

pub use store::RedisStore;
