//! Generated paper entity

use crate::models::GeneratedPaper;
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "generated_papers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub user_id: Uuid,

    pub pattern_id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub subject: String,

    #[sea_orm(column_type = "Text")]
    pub grade_level: String,

    #[sea_orm(column_type = "Text")]
    pub title: String,

    pub generated_at: DateTimeWithTimeZone,

    /// Ordered question references as a JSON array
    #[sea_orm(column_type = "JsonBinary")]
    pub questions: serde_json::Value,

    pub total_marks: i32,

    pub total_questions: i32,

    pub duration_minutes: i32,

    #[sea_orm(column_type = "JsonBinary")]
    pub filters: serde_json::Value,

    #[sea_orm(column_type = "JsonBinary")]
    pub settings: serde_json::Value,

    pub download_count: i32,

    pub last_downloaded_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl ActiveModel {
    /// Build an insertable row from a domain paper
    pub fn from_paper(paper: &GeneratedPaper) -> crate::errors::Result<Self> {
        Ok(Self {
            id: Set(paper.id),
            user_id: Set(paper.user_id),
            pattern_id: Set(paper.pattern_id),
            subject: Set(paper.subject.as_str().to_string()),
            grade_level: Set(paper.grade_level.as_str().to_string()),
            title: Set(paper.title.clone()),
            generated_at: Set(paper.generated_at.into()),
            questions: Set(serde_json::to_value(&paper.questions)?),
            total_marks: Set(paper.total_marks as i32),
            total_questions: Set(paper.total_questions as i32),
            duration_minutes: Set(paper.duration_minutes as i32),
            filters: Set(serde_json::to_value(&paper.filters)?),
            settings: Set(serde_json::to_value(&paper.settings)?),
            download_count: Set(paper.download_count as i32),
            last_downloaded_at: Set(paper.last_downloaded_at.map(Into::into)),
        })
    }
}
