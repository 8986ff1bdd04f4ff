// src/lib.rs
// Public library surface for both service binaries and the integration tests.

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod report;
pub mod scoring;
pub mod server;

// ---- Re-exports for stable public API ----
pub use crate::api::{report_router, score_router, ReportState};
pub use crate::config::ServicesConfig;
pub use crate::error::{ReportError, ScoreError};
pub use crate::report::{generate, ReportRequest, ReportResult};
pub use crate::scoring::{calculate, ScoreRequest, ScoreResponse};
