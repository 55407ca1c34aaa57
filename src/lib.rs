//! AutoABR - Encoding job dispatch and VMAF result service
//!
//! Hexagonal Architecture:
//! - domain/: Pure business logic (jobs, default profiles, result reports)
//! - ports/: Trait definitions for the content store, encoding engine, score source and state mirror
//! - adapters/: Concrete implementations
//! - application/: Worker pool, configuration cache and dispatcher
//! - http: Axum routes
//! - config: Environment configuration
//!
//! # Features
//! - `aws`: S3 content store and S3 score source
//! - `redis`: Redis write-behind mirror of worker state

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod http;
pub mod ports;

// Re-exports for convenience
pub use application::AutoabrService;
pub use config::AppConfig;
pub use error::{AutoabrError, AutoabrResult};
pub use http::{create_router, AppState};
