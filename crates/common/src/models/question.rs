//! Question bank records and sampling filters

use crate::errors::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Exam subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Physics,
    Chemistry,
    Biology,
    Math,
    English,
}

impl Subject {
    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Physics => "physics",
            Subject::Chemistry => "chemistry",
            Subject::Biology => "biology",
            Subject::Math => "math",
            Subject::English => "english",
        }
    }

    /// Capitalized display name, used in paper titles
    pub fn display_name(&self) -> &'static str {
        match self {
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::Biology => "Biology",
            Subject::Math => "Math",
            Subject::English => "English",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "physics" => Ok(Subject::Physics),
            "chemistry" => Ok(Subject::Chemistry),
            "biology" => Ok(Subject::Biology),
            "math" => Ok(Subject::Math),
            "english" => Ok(Subject::English),
            other => Err(AppError::InvalidFormat {
                message: format!("unknown subject: {}", other),
            }),
        }
    }
}

/// Class level (grades 11 and 12)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeLevel {
    #[serde(rename = "11")]
    Eleven,
    #[serde(rename = "12")]
    Twelve,
}

impl GradeLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GradeLevel::Eleven => "11",
            GradeLevel::Twelve => "12",
        }
    }
}

impl fmt::Display for GradeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GradeLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "11" => Ok(GradeLevel::Eleven),
            "12" => Ok(GradeLevel::Twelve),
            other => Err(AppError::InvalidFormat {
                message: format!("unknown grade level: {}", other),
            }),
        }
    }
}

/// Question kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Mcq,
    ShortAnswer,
    LongAnswer,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Mcq => "mcq",
            QuestionKind::ShortAnswer => "short_answer",
            QuestionKind::LongAnswer => "long_answer",
        }
    }
}

impl FromStr for QuestionKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mcq" => Ok(QuestionKind::Mcq),
            "short_answer" => Ok(QuestionKind::ShortAnswer),
            "long_answer" => Ok(QuestionKind::LongAnswer),
            other => Err(AppError::InvalidFormat {
                message: format!("unknown question kind: {}", other),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(AppError::InvalidFormat {
                message: format!("unknown difficulty: {}", other),
            }),
        }
    }
}

/// Cognitive-demand classification attached to a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetencyLevel {
    Remembering,
    Understanding,
    Applying,
    HigherAbility,
}

impl CompetencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompetencyLevel::Remembering => "remembering",
            CompetencyLevel::Understanding => "understanding",
            CompetencyLevel::Applying => "applying",
            CompetencyLevel::HigherAbility => "higher_ability",
        }
    }
}

impl FromStr for CompetencyLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remembering" => Ok(CompetencyLevel::Remembering),
            "understanding" => Ok(CompetencyLevel::Understanding),
            "applying" => Ok(CompetencyLevel::Applying),
            "higher_ability" => Ok(CompetencyLevel::HigherAbility),
            other => Err(AppError::InvalidFormat {
                message: format!("unknown competency level: {}", other),
            }),
        }
    }
}

/// Syllabus topic category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TopicCategory {
    PhysicalChemistry,
    InorganicChemistry,
    OrganicChemistry,
    AppliedChemistry,
}

impl TopicCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopicCategory::PhysicalChemistry => "physical_chemistry",
            TopicCategory::InorganicChemistry => "inorganic_chemistry",
            TopicCategory::OrganicChemistry => "organic_chemistry",
            TopicCategory::AppliedChemistry => "applied_chemistry",
        }
    }
}

impl FromStr for TopicCategory {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "physical_chemistry" => Ok(TopicCategory::PhysicalChemistry),
            "inorganic_chemistry" => Ok(TopicCategory::InorganicChemistry),
            "organic_chemistry" => Ok(TopicCategory::OrganicChemistry),
            "applied_chemistry" => Ok(TopicCategory::AppliedChemistry),
            other => Err(AppError::InvalidFormat {
                message: format!("unknown topic category: {}", other),
            }),
        }
    }
}

/// A question-bank record. Read-only to the engine apart from usage
/// accounting; enrichment works on per-run snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRecord {
    pub id: Uuid,
    pub question_text: String,
    pub kind: QuestionKind,
    pub subject: Subject,
    pub grade_level: GradeLevel,
    pub chapter: String,
    pub topic_category: Option<TopicCategory>,
    pub competency_level: CompetencyLevel,
    pub difficulty: Difficulty,
    pub year: i32,
    pub marks: u32,
    pub options: Option<Vec<String>>,
    pub correct_answer: String,
    pub explanation: Option<String>,
    pub marking_scheme: Option<String>,
    pub answer_tips: Option<String>,
    pub is_active: bool,
    pub usage_count: i64,
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Filter over the question bank. Built by the sampler from a section
/// spec and request criteria; interpreted by the storage layer.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionFilter {
    pub subject: Subject,
    pub grade_level: GradeLevel,
    pub kind: QuestionKind,
    pub marks: u32,
    pub chapters: Option<Vec<String>>,
    pub difficulties: Option<Vec<Difficulty>>,
    pub years: Option<Vec<i32>>,
    /// Restrict to never-used questions (usage_count == 0)
    pub unused_only: bool,
    /// Quota-bucket constraints, at most one of the two
    pub topic_category: Option<TopicCategory>,
    pub competency_level: Option<CompetencyLevel>,
}

impl QuestionFilter {
    pub fn new(
        subject: Subject,
        grade_level: GradeLevel,
        kind: QuestionKind,
        marks: u32,
    ) -> Self {
        Self {
            subject,
            grade_level,
            kind,
            marks,
            chapters: None,
            difficulties: None,
            years: None,
            unused_only: false,
            topic_category: None,
            competency_level: None,
        }
    }

    pub fn with_topic(&self, category: TopicCategory) -> Self {
        Self {
            topic_category: Some(category),
            ..self.clone()
        }
    }

    pub fn with_competency(&self, level: CompetencyLevel) -> Self {
        Self {
            competency_level: Some(level),
            ..self.clone()
        }
    }

    /// Relaxation step one: drop the difficulty constraint
    pub fn without_difficulties(&self) -> Self {
        Self {
            difficulties: None,
            ..self.clone()
        }
    }

    /// Relaxation step two: drop the year constraint
    pub fn without_years(&self) -> Self {
        Self {
            years: None,
            ..self.clone()
        }
    }

    /// In-memory predicate matching the storage-layer interpretation
    pub fn matches(&self, q: &QuestionRecord) -> bool {
        if !q.is_active
            || q.subject != self.subject
            || q.grade_level != self.grade_level
            || q.kind != self.kind
            || q.marks != self.marks
        {
            return false;
        }
        if let Some(chapters) = &self.chapters {
            if !chapters.iter().any(|c| c == &q.chapter) {
                return false;
            }
        }
        if let Some(difficulties) = &self.difficulties {
            if !difficulties.contains(&q.difficulty) {
                return false;
            }
        }
        if let Some(years) = &self.years {
            if !years.contains(&q.year) {
                return false;
            }
        }
        if self.unused_only && q.usage_count != 0 {
            return false;
        }
        if let Some(category) = self.topic_category {
            if q.topic_category != Some(category) {
                return false;
            }
        }
        if let Some(level) = self.competency_level {
            if q.competency_level != level {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> QuestionRecord {
        QuestionRecord {
            id: Uuid::new_v4(),
            question_text: "What is an acid?".to_string(),
            kind: QuestionKind::Mcq,
            subject: Subject::Chemistry,
            grade_level: GradeLevel::Twelve,
            chapter: "Acids and Bases".to_string(),
            topic_category: Some(TopicCategory::PhysicalChemistry),
            competency_level: CompetencyLevel::Remembering,
            difficulty: Difficulty::Easy,
            year: 2023,
            marks: 1,
            options: Some(vec!["a".into(), "b".into(), "c".into(), "d".into()]),
            correct_answer: "a".to_string(),
            explanation: None,
            marking_scheme: None,
            answer_tips: None,
            is_active: true,
            usage_count: 0,
            last_used_at: None,
        }
    }

    #[test]
    fn test_filter_base_fields() {
        let q = record();
        let f = QuestionFilter::new(
            Subject::Chemistry,
            GradeLevel::Twelve,
            QuestionKind::Mcq,
            1,
        );
        assert!(f.matches(&q));

        let f = QuestionFilter::new(Subject::Physics, GradeLevel::Twelve, QuestionKind::Mcq, 1);
        assert!(!f.matches(&q));
    }

    #[test]
    fn test_filter_unused_only() {
        let mut q = record();
        let mut f = QuestionFilter::new(
            Subject::Chemistry,
            GradeLevel::Twelve,
            QuestionKind::Mcq,
            1,
        );
        f.unused_only = true;
        assert!(f.matches(&q));

        q.usage_count = 2;
        assert!(!f.matches(&q));
    }

    #[test]
    fn test_filter_relaxation_steps() {
        let mut q = record();
        q.difficulty = Difficulty::Hard;
        q.year = 2019;

        let mut f = QuestionFilter::new(
            Subject::Chemistry,
            GradeLevel::Twelve,
            QuestionKind::Mcq,
            1,
        );
        f.difficulties = Some(vec![Difficulty::Easy]);
        f.years = Some(vec![2023]);
        assert!(!f.matches(&q));
        assert!(!f.without_difficulties().matches(&q));
        assert!(f.without_difficulties().without_years().matches(&q));
    }

    #[test]
    fn test_enum_round_trip() {
        for s in ["physics", "chemistry", "biology", "math", "english"] {
            assert_eq!(Subject::from_str(s).unwrap().as_str(), s);
        }
        assert_eq!(
            QuestionKind::from_str("short_answer").unwrap(),
            QuestionKind::ShortAnswer
        );
        assert!(Difficulty::from_str("impossible").is_err());
    }
}
