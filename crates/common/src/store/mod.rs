//! Storage boundary for the generation engine
//!
//! The engine reads questions and patterns through these traits and
//! writes generated papers through them; everything else about storage
//! is a collaborator concern. `db::Repository` implements them against
//! Postgres, `MemoryStore` implements them in memory for tests and
//! credential-less setups.

mod memory;

pub use memory::MemoryStore;

use crate::errors::Result;
use crate::models::{
    DistributionSpec, GeneratedPaper, GradeLevel, QuestionFilter, QuestionRecord, Subject,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Read access to the question bank plus usage accounting
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// All active records matching the filter. Uniform sampling over the
    /// result set is the engine's job, not the store's.
    async fn find_candidates(&self, filter: &QuestionFilter) -> Result<Vec<QuestionRecord>>;

    /// Atomically increment `usage_count` and stamp `last_used_at` for
    /// the given records.
    async fn record_usage(&self, ids: &[Uuid], at: DateTime<Utc>) -> Result<()>;
}

/// Read access to distribution patterns
#[async_trait]
pub trait PatternStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<DistributionSpec>>;

    /// Most recently created active pattern for a (subject, level) pair
    async fn find_latest_active(
        &self,
        subject: Subject,
        grade_level: GradeLevel,
    ) -> Result<Option<DistributionSpec>>;
}

/// Write access for generated papers (the engine's sole write)
#[async_trait]
pub trait PaperStore: Send + Sync {
    async fn insert_paper(&self, paper: &GeneratedPaper) -> Result<()>;
}
