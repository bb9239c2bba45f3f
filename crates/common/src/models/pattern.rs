//! Distribution patterns: the declarative shape of a generated paper
//!
//! A `DistributionSpec` is authored by the administrative collaborator and
//! is read-only to the engine. The structural invariants (section totals
//! summing to the pattern totals, quota counts fitting inside sections)
//! belong to the authoring side; `validate` exists so fixtures can be
//! checked and the resolver can warn on inconsistent data.

use crate::errors::{AppError, Result};
use crate::models::question::{
    CompetencyLevel, GradeLevel, QuestionKind, Subject, TopicCategory,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A quota bucket keyed on topic category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicQuota {
    pub category: TopicCategory,
    pub questions: u32,
    pub marks: u32,
}

/// A quota bucket keyed on competency level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetencyQuota {
    pub level: CompetencyLevel,
    pub questions: u32,
}

/// Optional quota breakdown for a section. The tagged variant removes
/// the "both breakdowns present" ambiguity of carrying two nullable
/// lists side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "buckets", rename_all = "camelCase")]
pub enum SectionQuota {
    #[default]
    None,
    ByTopic(Vec<TopicQuota>),
    ByCompetency(Vec<CompetencyQuota>),
}

impl SectionQuota {
    pub fn is_none(&self) -> bool {
        matches!(self, SectionQuota::None)
    }

    /// Total question count constrained by the quota buckets
    pub fn constrained_count(&self) -> u32 {
        match self {
            SectionQuota::None => 0,
            SectionQuota::ByTopic(buckets) => buckets.iter().map(|b| b.questions).sum(),
            SectionQuota::ByCompetency(buckets) => buckets.iter().map(|b| b.questions).sum(),
        }
    }
}

/// One section of a distribution pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub kind: QuestionKind,
    pub marks_per_question: u32,
    pub number_of_questions: u32,
    pub total_marks: u32,
    #[serde(default)]
    pub quota: SectionQuota,
}

/// A full distribution pattern for a (subject, level) pair
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionSpec {
    pub id: Uuid,
    pub name: String,
    pub subject: Subject,
    pub grade_level: GradeLevel,
    pub total_marks: u32,
    pub total_questions: u32,
    pub duration_minutes: u32,
    pub sections: Vec<SectionSpec>,
    #[serde(default)]
    pub instructions: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl DistributionSpec {
    /// Check the structural invariants of the pattern.
    ///
    /// Sum of section marks must equal `total_marks`, sum of section
    /// question counts must equal `total_questions`, and quota bucket
    /// counts must fit inside their section (the remainder is filled
    /// unconstrained).
    pub fn validate(&self) -> Result<()> {
        let section_marks: u32 = self.sections.iter().map(|s| s.total_marks).sum();
        if section_marks != self.total_marks {
            return Err(AppError::Validation {
                message: format!(
                    "section marks sum to {} but pattern declares {}",
                    section_marks, self.total_marks
                ),
                field: Some("totalMarks".to_string()),
            });
        }

        let section_questions: u32 = self.sections.iter().map(|s| s.number_of_questions).sum();
        if section_questions != self.total_questions {
            return Err(AppError::Validation {
                message: format!(
                    "section question counts sum to {} but pattern declares {}",
                    section_questions, self.total_questions
                ),
                field: Some("totalQuestions".to_string()),
            });
        }

        for section in &self.sections {
            if section.marks_per_question * section.number_of_questions != section.total_marks {
                return Err(AppError::Validation {
                    message: format!(
                        "section '{}' declares {} marks but {}x{} questions",
                        section.name,
                        section.total_marks,
                        section.number_of_questions,
                        section.marks_per_question
                    ),
                    field: Some("sections".to_string()),
                });
            }
            let constrained = section.quota.constrained_count();
            if constrained > section.number_of_questions {
                return Err(AppError::Validation {
                    message: format!(
                        "section '{}' quota constrains {} questions but section has {}",
                        section.name, constrained, section.number_of_questions
                    ),
                    field: Some("sections".to_string()),
                });
            }
        }

        Ok(())
    }
}
