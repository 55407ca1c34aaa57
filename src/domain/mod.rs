//! Domain layer - Pure business logic.

// Job, worker and result types (always available)
pub mod jobs;

// Built-in pipeline and encoding profile documents
pub mod profiles;

// Tabular result reports
pub mod report;
