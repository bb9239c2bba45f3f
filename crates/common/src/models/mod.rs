//! Domain models shared across the workspace

pub mod enriched;
pub mod paper;
pub mod pattern;
pub mod question;

pub use enriched::{
    EnrichedQuestion, EnrichmentReport, ProcessingEvent, StageCounts, StageKind, StageStatus,
};
pub use paper::{
    GeneratedPaper, GenerationRequest, GenerationResult, PaperFilters, PaperQuestionRef,
    PaperSettings, PaperStatistics, SectionBreakdown,
};
pub use pattern::{CompetencyQuota, DistributionSpec, SectionQuota, SectionSpec, TopicQuota};
pub use question::{
    CompetencyLevel, Difficulty, GradeLevel, QuestionFilter, QuestionKind, QuestionRecord,
    Subject, TopicCategory,
};
