//! Per-run enrichment snapshots and processing history

use crate::models::question::QuestionRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Enrichment stage tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Rewrite,
    Translate,
    Explain,
    CulturalAdaptation,
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Rewrite => "rewrite",
            StageKind::Translate => "translate",
            StageKind::Explain => "explain",
            StageKind::CulturalAdaptation => "cultural_adaptation",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one attempted stage on one question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Success,
    NoChange,
    Error,
}

/// Append-only log entry, one per attempted stage per question
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessingEvent {
    pub stage: StageKind,
    pub at: DateTime<Utc>,
    pub status: StageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ProcessingEvent {
    pub fn new(stage: StageKind, status: StageStatus, message: Option<String>) -> Self {
        Self {
            stage,
            at: Utc::now(),
            status,
            message,
        }
    }
}

/// A question snapshot owned by a single generation run, accumulating
/// derived text fields as enrichment stages run over it.
///
/// `record.question_text` is the working text: a successful rewrite
/// replaces it so later stages operate on the rewritten version. The
/// canonical original is always recoverable from `original_text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedQuestion {
    pub record: QuestionRecord,
    pub original_text: String,
    pub original_options: Option<Vec<String>>,
    pub rewritten_text: Option<String>,
    pub translated_text: Option<String>,
    pub translated_options: Option<Vec<String>>,
    pub generated_explanation: Option<String>,
    pub culturally_adapted_text: Option<String>,
    pub history: Vec<ProcessingEvent>,
}

impl EnrichedQuestion {
    /// Snapshot a bank record at sampling time
    pub fn new(record: QuestionRecord) -> Self {
        let original_text = record.question_text.clone();
        let original_options = record.options.clone();
        Self {
            record,
            original_text,
            original_options,
            rewritten_text: None,
            translated_text: None,
            translated_options: None,
            generated_explanation: None,
            culturally_adapted_text: None,
            history: Vec::new(),
        }
    }

    /// The current working text (rewritten if a rewrite succeeded)
    pub fn current_text(&self) -> &str {
        &self.record.question_text
    }

    pub fn push_event(&mut self, stage: StageKind, status: StageStatus, message: Option<String>) {
        self.history.push(ProcessingEvent::new(stage, status, message));
    }
}

/// Per-stage success/no-change/error tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageCounts {
    pub success: u32,
    pub no_change: u32,
    pub errors: u32,
}

impl StageCounts {
    pub fn absorb(&mut self, status: StageStatus) {
        match status {
            StageStatus::Success => self.success += 1,
            StageStatus::NoChange => self.no_change += 1,
            StageStatus::Error => self.errors += 1,
        }
    }

    /// Failed or unchanged items, matching the user-facing failure tally
    pub fn failed(&self) -> u32 {
        self.no_change + self.errors
    }
}

/// Aggregated enrichment counters returned to the caller
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EnrichmentReport {
    pub rewrite: StageCounts,
    pub translate: StageCounts,
    pub explain: StageCounts,
    pub adapt: StageCounts,
}

impl EnrichmentReport {
    pub fn failed_total(&self) -> u32 {
        self.rewrite.failed()
            + self.translate.failed()
            + self.explain.failed()
            + self.adapt.failed()
    }

    pub fn stage_mut(&mut self, stage: StageKind) -> &mut StageCounts {
        match stage {
            StageKind::Rewrite => &mut self.rewrite,
            StageKind::Translate => &mut self.translate,
            StageKind::Explain => &mut self.explain,
            StageKind::CulturalAdaptation => &mut self.adapt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::*;
    use uuid::Uuid;

    fn record(text: &str) -> QuestionRecord {
        QuestionRecord {
            id: Uuid::new_v4(),
            question_text: text.to_string(),
            kind: QuestionKind::ShortAnswer,
            subject: Subject::Chemistry,
            grade_level: GradeLevel::Twelve,
            chapter: "Electrochemistry".to_string(),
            topic_category: None,
            competency_level: CompetencyLevel::Understanding,
            difficulty: Difficulty::Medium,
            year: 2022,
            marks: 5,
            options: None,
            correct_answer: "See marking scheme".to_string(),
            explanation: None,
            marking_scheme: None,
            answer_tips: None,
            is_active: true,
            usage_count: 0,
            last_used_at: None,
        }
    }

    #[test]
    fn test_snapshot_preserves_original() {
        let mut q = EnrichedQuestion::new(record("Define electrolysis."));
        q.record.question_text = "Rewritten variant".to_string();
        q.rewritten_text = Some("Rewritten variant".to_string());

        assert_eq!(q.original_text, "Define electrolysis.");
        assert_eq!(q.current_text(), "Rewritten variant");
    }

    #[test]
    fn test_history_is_append_only_per_stage() {
        let mut q = EnrichedQuestion::new(record("Define electrolysis."));
        q.push_event(StageKind::Rewrite, StageStatus::Success, None);
        q.push_event(
            StageKind::Translate,
            StageStatus::Error,
            Some("timeout".to_string()),
        );

        assert_eq!(q.history.len(), 2);
        assert_eq!(q.history[0].stage, StageKind::Rewrite);
        assert_eq!(q.history[1].status, StageStatus::Error);
    }

    #[test]
    fn test_stage_counts_failed_includes_no_change() {
        let mut counts = StageCounts::default();
        counts.absorb(StageStatus::Success);
        counts.absorb(StageStatus::NoChange);
        counts.absorb(StageStatus::Error);
        assert_eq!(counts.success, 1);
        assert_eq!(counts.failed(), 2);
    }
}
