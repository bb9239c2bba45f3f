//! ExamForge Common Library
//!
//! Shared code for the ExamForge question-paper engine including:
//! - Domain models (questions, patterns, papers, enrichment snapshots)
//! - Database entities and repository pattern
//! - Storage trait seams with an in-memory implementation
//! - Text provider abstraction (Groq + deterministic fallback)
//! - Error types and handling
//! - Configuration management
//! - Metrics and observability

pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod models;
pub mod provider;
pub mod store;
pub mod telemetry;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::Repository;
pub use errors::{AppError, Result};
pub use provider::{TextProvider, TextRequest};
pub use store::{MemoryStore, PaperStore, PatternStore, QuestionStore};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
