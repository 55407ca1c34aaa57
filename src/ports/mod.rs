//! Ports - Trait definitions for external collaborators.

pub mod engine;
pub mod repository;
pub mod scores;
pub mod storage;

/// Error type returned by every port.
pub type PortError = Box<dyn std::error::Error + Send + Sync>;
