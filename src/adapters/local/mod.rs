//! Local adapters: filesystem documents, HTTP engine, Redis mirror.

pub mod engine;
pub mod fs;
pub mod routing;

#[cfg(feature = "redis")]
pub mod redis;

pub use engine::HttpEncodingEngine;
pub use fs::FsContentStore;
pub use routing::RoutingContentStore;

#[cfg(feature = "redis")]
pub use redis::RedisPool;
