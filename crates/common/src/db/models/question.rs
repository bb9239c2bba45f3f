//! Question bank entity

use crate::models::{
    CompetencyLevel, Difficulty, GradeLevel, QuestionKind, QuestionRecord, Subject, TopicCategory,
};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub question_text: String,

    #[sea_orm(column_type = "Text")]
    pub kind: String,

    #[sea_orm(column_type = "Text")]
    pub subject: String,

    #[sea_orm(column_type = "Text")]
    pub grade_level: String,

    #[sea_orm(column_type = "Text")]
    pub chapter: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub topic_category: Option<String>,

    #[sea_orm(column_type = "Text")]
    pub competency_level: String,

    #[sea_orm(column_type = "Text")]
    pub difficulty: String,

    pub year: i32,

    pub marks: i32,

    /// MCQ options as a JSON array of strings
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub options: Option<serde_json::Value>,

    #[sea_orm(column_type = "Text")]
    pub correct_answer: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub explanation: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub marking_scheme: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub answer_tips: Option<String>,

    pub is_active: bool,

    pub usage_count: i64,

    pub last_used_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert a row into the domain record, parsing the enum columns.
    /// The error alias stays fully qualified here: an imported alias
    /// would shadow `std::result::Result` in the derive expansion.
    pub fn into_record(self) -> crate::errors::Result<QuestionRecord> {
        Ok(QuestionRecord {
            id: self.id,
            question_text: self.question_text,
            kind: self.kind.parse::<QuestionKind>()?,
            subject: self.subject.parse::<Subject>()?,
            grade_level: self.grade_level.parse::<GradeLevel>()?,
            chapter: self.chapter,
            topic_category: self
                .topic_category
                .map(|t| t.parse::<TopicCategory>())
                .transpose()?,
            competency_level: self.competency_level.parse::<CompetencyLevel>()?,
            difficulty: self.difficulty.parse::<Difficulty>()?,
            year: self.year,
            marks: self.marks as u32,
            options: self
                .options
                .map(serde_json::from_value::<Vec<String>>)
                .transpose()?,
            correct_answer: self.correct_answer,
            explanation: self.explanation,
            marking_scheme: self.marking_scheme,
            answer_tips: self.answer_tips,
            is_active: self.is_active,
            usage_count: self.usage_count,
            last_used_at: self.last_used_at.map(Into::into),
        })
    }
}
