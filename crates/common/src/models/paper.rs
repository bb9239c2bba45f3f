//! Generated papers, generation requests, and result statistics

use crate::models::enriched::{EnrichmentReport, ProcessingEvent};
use crate::models::question::{
    CompetencyLevel, Difficulty, GradeLevel, QuestionKind, Subject, TopicCategory,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request settings with explicit defaults. Unknown fields are rejected
/// upstream; missing fields take the documented defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaperSettings {
    pub randomize_questions: bool,
    pub include_marking_scheme: bool,
    pub include_answer_tips: bool,
    pub translate_questions: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Rewrite questions to prevent memorization
    #[serde(alias = "preventMemorization")]
    pub rewrite_questions: bool,
    pub exclude_used_questions: bool,
    pub generate_explanations: bool,
    pub cultural_adaptation: bool,
    pub batch_processing: bool,
    pub cognitive_level_analysis: bool,
}

impl Default for PaperSettings {
    fn default() -> Self {
        Self {
            randomize_questions: true,
            include_marking_scheme: true,
            include_answer_tips: true,
            translate_questions: false,
            language: None,
            rewrite_questions: false,
            exclude_used_questions: false,
            generate_explanations: false,
            cultural_adaptation: false,
            batch_processing: true,
            cognitive_level_analysis: false,
        }
    }
}

impl PaperSettings {
    /// Target language for translation, defaulting to Nepali
    pub fn target_language(&self) -> &str {
        self.language.as_deref().unwrap_or("nepali")
    }

    /// Whether any enrichment stage is enabled
    pub fn any_enrichment(&self) -> bool {
        self.rewrite_questions
            || self.translate_questions
            || self.generate_explanations
            || self.cultural_adaptation
    }
}

/// Filters applied to a generation request, persisted for provenance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapters: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulties: Option<Vec<Difficulty>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub years: Option<Vec<i32>>,
    pub exclude_used: bool,
}

/// A generation request consumed by the engine
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub subject: Subject,
    pub grade_level: GradeLevel,
    #[serde(default)]
    pub chapters: Option<Vec<String>>,
    #[serde(default)]
    pub difficulties: Option<Vec<Difficulty>>,
    #[serde(default)]
    pub years: Option<Vec<i32>>,
    #[serde(default)]
    pub pattern_id: Option<Uuid>,
    #[serde(default)]
    pub settings: PaperSettings,
}

impl GenerationRequest {
    pub fn new(subject: Subject, grade_level: GradeLevel) -> Self {
        Self {
            subject,
            grade_level,
            chapters: None,
            difficulties: None,
            years: None,
            pattern_id: None,
            settings: PaperSettings::default(),
        }
    }

    pub fn filters(&self) -> PaperFilters {
        PaperFilters {
            chapters: self.chapters.clone(),
            difficulties: self.difficulties.clone(),
            years: self.years.clone(),
            exclude_used: self.settings.exclude_used_questions,
        }
    }
}

/// An ordered question reference inside a generated paper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperQuestionRef {
    pub question_id: Uuid,
    pub section_name: String,
    pub kind: QuestionKind,
    pub marks: u32,
    pub order: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_category: Option<TopicCategory>,
    pub competency_level: CompetencyLevel,
    pub is_translated: bool,
    pub is_rewritten: bool,
    pub has_explanation: bool,
    pub is_culturally_adapted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cognitive_level: Option<String>,
    #[serde(default)]
    pub processing_history: Vec<ProcessingEvent>,
}

/// The persisted output of one generation run. Created once; only the
/// download counters are mutated afterwards, by the export collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPaper {
    pub id: Uuid,
    pub user_id: Uuid,
    pub pattern_id: Uuid,
    pub subject: Subject,
    pub grade_level: GradeLevel,
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub questions: Vec<PaperQuestionRef>,
    pub total_marks: u32,
    pub total_questions: u32,
    pub duration_minutes: u32,
    pub filters: PaperFilters,
    pub settings: PaperSettings,
    pub download_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_downloaded_at: Option<DateTime<Utc>>,
}

/// Per-section breakdown returned alongside the paper
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionBreakdown {
    pub name: String,
    pub kind: QuestionKind,
    pub marks_per_question: u32,
    pub total_marks: u32,
    pub requested_questions: u32,
    pub delivered_questions: u32,
    /// Populated when cognitive-level analysis is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cognitive_levels: Option<Vec<String>>,
    /// Fraction of delivered questions still active in the bank
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
}

/// Summary statistics for a generation run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperStatistics {
    pub total_questions: u32,
    pub total_marks: u32,
    pub sections: u32,
    /// Active processing features, or ["None"]
    pub processing_features: Vec<String>,
    pub requested_questions: u32,
    /// True when the pool could not supply the full requested count
    pub under_delivered: bool,
}

/// Full generation result: the persisted paper plus presentation data
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub paper: GeneratedPaper,
    pub sections: Vec<SectionBreakdown>,
    pub instructions: Vec<String>,
    pub statistics: PaperStatistics,
    pub enrichment: EnrichmentReport,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_defaults() {
        let s = PaperSettings::default();
        assert!(s.randomize_questions);
        assert!(s.include_marking_scheme);
        assert!(s.include_answer_tips);
        assert!(s.batch_processing);
        assert!(!s.translate_questions);
        assert!(!s.rewrite_questions);
        assert!(!s.cognitive_level_analysis);
        assert_eq!(s.target_language(), "nepali");
    }

    #[test]
    fn test_prevent_memorization_alias() {
        let s: PaperSettings =
            serde_json::from_str(r#"{"preventMemorization": true}"#).unwrap();
        assert!(s.rewrite_questions);

        let s: PaperSettings = serde_json::from_str(r#"{"rewriteQuestions": true}"#).unwrap();
        assert!(s.rewrite_questions);
    }

    #[test]
    fn test_request_minimal_json() {
        let req: GenerationRequest = serde_json::from_str(
            r#"{"subject": "chemistry", "gradeLevel": "12"}"#,
        )
        .unwrap();
        assert_eq!(req.subject, Subject::Chemistry);
        assert_eq!(req.grade_level, GradeLevel::Twelve);
        assert!(req.pattern_id.is_none());
        assert!(!req.settings.any_enrichment());
    }
}
