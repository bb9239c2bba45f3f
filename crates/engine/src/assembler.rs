//! Paper assembly
//!
//! Merges the pattern, the enriched question list, and the request
//! settings into a persisted `GeneratedPaper` plus the presentation
//! data (section breakdowns, instructions, statistics) returned to the
//! caller.

use crate::cognitive::determine_cognitive_level;
use chrono::Utc;
use examforge_common::errors::Result;
use examforge_common::models::{
    DistributionSpec, EnrichedQuestion, EnrichmentReport, GeneratedPaper, GenerationRequest,
    GenerationResult, PaperQuestionRef, PaperSettings, PaperStatistics, SectionBreakdown,
};
use examforge_common::store::PaperStore;
use std::ops::Range;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// One sampled section: its spec plus the slice of the flat question
/// list it produced
pub struct SectionOutcome {
    pub section_index: usize,
    pub requested: u32,
    pub range: Range<usize>,
}

pub struct PaperAssembler {
    papers: Arc<dyn PaperStore>,
}

impl PaperAssembler {
    pub fn new(papers: Arc<dyn PaperStore>) -> Self {
        Self { papers }
    }

    /// Assemble and persist the paper. Question order follows section
    /// order then sampling order; enrichment completion order never
    /// affects it.
    pub async fn assemble(
        &self,
        user_id: Uuid,
        pattern: &DistributionSpec,
        request: &GenerationRequest,
        questions: &[EnrichedQuestion],
        sections: &[SectionOutcome],
        enrichment: EnrichmentReport,
    ) -> Result<GenerationResult> {
        let settings = &request.settings;
        let refs = self.map_question_refs(pattern, questions, settings);
        let breakdowns = self.section_breakdowns(pattern, questions, sections, settings);

        let delivered = questions.len() as u32;
        let statistics = PaperStatistics {
            total_questions: delivered,
            total_marks: pattern.total_marks,
            sections: breakdowns.len() as u32,
            processing_features: Self::processing_features(settings),
            requested_questions: pattern.total_questions,
            under_delivered: delivered < pattern.total_questions,
        };

        let paper = GeneratedPaper {
            id: Uuid::new_v4(),
            user_id,
            pattern_id: pattern.id,
            subject: request.subject,
            grade_level: request.grade_level,
            title: Self::build_title(request),
            generated_at: Utc::now(),
            questions: refs,
            total_marks: pattern.total_marks,
            total_questions: pattern.total_questions,
            duration_minutes: pattern.duration_minutes,
            filters: request.filters(),
            settings: settings.clone(),
            download_count: 0,
            last_downloaded_at: None,
        };

        self.papers.insert_paper(&paper).await?;
        info!(paper = %paper.id, user = %user_id, delivered, "Paper persisted");

        Ok(GenerationResult {
            paper,
            sections: breakdowns,
            instructions: pattern.instructions.clone(),
            statistics,
            enrichment,
        })
    }

    /// Map each question to a section by (kind, marks); questions with
    /// no matching section land in "General"
    fn map_question_refs(
        &self,
        pattern: &DistributionSpec,
        questions: &[EnrichedQuestion],
        settings: &PaperSettings,
    ) -> Vec<PaperQuestionRef> {
        questions
            .iter()
            .enumerate()
            .map(|(index, q)| {
                let section_name = pattern
                    .sections
                    .iter()
                    .find(|s| s.kind == q.record.kind && s.marks_per_question == q.record.marks)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| "General".to_string());

                PaperQuestionRef {
                    question_id: q.record.id,
                    section_name,
                    kind: q.record.kind,
                    marks: q.record.marks,
                    order: (index + 1) as u32,
                    topic_category: q.record.topic_category,
                    competency_level: q.record.competency_level,
                    is_translated: q.translated_text.is_some(),
                    is_rewritten: q.rewritten_text.is_some(),
                    has_explanation: q.generated_explanation.is_some()
                        || q.record.explanation.is_some(),
                    is_culturally_adapted: q.culturally_adapted_text.is_some(),
                    cognitive_level: settings
                        .cognitive_level_analysis
                        .then(|| determine_cognitive_level(q.current_text()).to_string()),
                    processing_history: q.history.clone(),
                }
            })
            .collect()
    }

    fn section_breakdowns(
        &self,
        pattern: &DistributionSpec,
        questions: &[EnrichedQuestion],
        sections: &[SectionOutcome],
        settings: &PaperSettings,
    ) -> Vec<SectionBreakdown> {
        sections
            .iter()
            .map(|outcome| {
                let spec = &pattern.sections[outcome.section_index];
                let slice = &questions[outcome.range.clone()];

                let (cognitive_levels, success_rate) = if settings.cognitive_level_analysis {
                    let levels = slice
                        .iter()
                        .map(|q| determine_cognitive_level(q.current_text()).to_string())
                        .collect();
                    let rate = if slice.is_empty() {
                        0.0
                    } else {
                        slice.iter().filter(|q| q.record.is_active).count() as f64
                            / slice.len() as f64
                    };
                    (Some(levels), Some(rate))
                } else {
                    (None, None)
                };

                SectionBreakdown {
                    name: spec.name.clone(),
                    kind: spec.kind,
                    marks_per_question: spec.marks_per_question,
                    total_marks: spec.total_marks,
                    requested_questions: outcome.requested,
                    delivered_questions: slice.len() as u32,
                    cognitive_levels,
                    success_rate,
                }
            })
            .collect()
    }

    /// `{Subject} - Class {level}[ - {features} Edition] - {Month D, YYYY}`
    fn build_title(request: &GenerationRequest) -> String {
        let settings = &request.settings;
        let mut features: Vec<&str> = Vec::new();
        if settings.rewrite_questions {
            features.push("Critical Thinking");
        }
        if settings.translate_questions {
            features.push("Translated");
        }
        if settings.cultural_adaptation {
            features.push("Culturally Adapted");
        }
        if settings.generate_explanations {
            features.push("With Explanations");
        }
        if settings.cognitive_level_analysis {
            features.push("Cognitive Analysis");
        }

        let feature_str = if features.is_empty() {
            String::new()
        } else {
            format!(" - {} Edition", features.join(", "))
        };
        let date = Utc::now().format("%B %-d, %Y");

        format!(
            "{} - Class {}{} - {}",
            request.subject.display_name(),
            request.grade_level,
            feature_str,
            date
        )
    }

    /// Active processing features for the statistics block, or ["None"]
    fn processing_features(settings: &PaperSettings) -> Vec<String> {
        let mut features = Vec::new();
        if settings.rewrite_questions {
            features.push("Paraphrasing".to_string());
        }
        if settings.translate_questions {
            features.push(format!("Translation ({})", settings.target_language()));
        }
        if settings.generate_explanations {
            features.push("Explanations".to_string());
        }
        if settings.cultural_adaptation {
            features.push("Cultural Adaptation".to_string());
        }
        if settings.cognitive_level_analysis {
            features.push("Cognitive Analysis".to_string());
        }

        if features.is_empty() {
            features.push("None".to_string());
        }
        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use examforge_common::models::{GradeLevel, Subject};

    fn request_with(settings: PaperSettings) -> GenerationRequest {
        let mut request = GenerationRequest::new(Subject::Chemistry, GradeLevel::Twelve);
        request.settings = settings;
        request
    }

    #[test]
    fn test_title_without_features() {
        let title = PaperAssembler::build_title(&request_with(PaperSettings::default()));
        assert!(title.starts_with("Chemistry - Class 12 - "));
        assert!(!title.contains("Edition"));
    }

    #[test]
    fn test_title_feature_ordering() {
        let settings = PaperSettings {
            rewrite_questions: true,
            translate_questions: true,
            ..PaperSettings::default()
        };
        let title = PaperAssembler::build_title(&request_with(settings));
        assert!(title.contains(" - Critical Thinking, Translated Edition - "));
    }

    #[test]
    fn test_processing_features_default_none() {
        let features = PaperAssembler::processing_features(&PaperSettings::default());
        assert_eq!(features, vec!["None".to_string()]);
    }

    #[test]
    fn test_processing_features_names_language() {
        let settings = PaperSettings {
            translate_questions: true,
            language: Some("hindi".to_string()),
            generate_explanations: true,
            ..PaperSettings::default()
        };
        let features = PaperAssembler::processing_features(&settings);
        assert_eq!(
            features,
            vec!["Translation (hindi)".to_string(), "Explanations".to_string()]
        );
    }
}
