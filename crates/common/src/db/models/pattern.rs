//! Distribution pattern entity

use crate::models::{DistributionSpec, GradeLevel, SectionSpec, Subject};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "paper_patterns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(column_type = "Text")]
    pub name: String,

    #[sea_orm(column_type = "Text")]
    pub subject: String,

    #[sea_orm(column_type = "Text")]
    pub grade_level: String,

    pub total_marks: i32,

    pub total_questions: i32,

    pub duration_minutes: i32,

    /// Section specs as a JSON array
    #[sea_orm(column_type = "JsonBinary")]
    pub sections: serde_json::Value,

    /// Printed exam instructions as a JSON array of strings
    #[sea_orm(column_type = "JsonBinary")]
    pub instructions: serde_json::Value,

    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_spec(self) -> crate::errors::Result<DistributionSpec> {
        Ok(DistributionSpec {
            id: self.id,
            name: self.name,
            subject: self.subject.parse::<Subject>()?,
            grade_level: self.grade_level.parse::<GradeLevel>()?,
            total_marks: self.total_marks as u32,
            total_questions: self.total_questions as u32,
            duration_minutes: self.duration_minutes as u32,
            sections: serde_json::from_value::<Vec<SectionSpec>>(self.sections)?,
            instructions: serde_json::from_value::<Vec<String>>(self.instructions)?,
            is_active: self.is_active,
            created_at: self.created_at.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_into_spec_decodes_section_documents() {
        let sections = serde_json::json!([{
            "name": "Group B",
            "kind": "short_answer",
            "marksPerQuestion": 5,
            "numberOfQuestions": 8,
            "totalMarks": 40
        }]);
        let model = Model {
            id: Uuid::new_v4(),
            name: "NEB Chemistry Class 12".to_string(),
            subject: "chemistry".to_string(),
            grade_level: "12".to_string(),
            total_marks: 40,
            total_questions: 8,
            duration_minutes: 90,
            sections,
            instructions: serde_json::json!(["Attempt all questions."]),
            is_active: true,
            created_at: Utc::now().into(),
        };

        let spec = model.into_spec().unwrap();
        assert_eq!(spec.subject, Subject::Chemistry);
        assert_eq!(spec.sections.len(), 1);
        assert_eq!(spec.sections[0].number_of_questions, 8);
        assert!(spec.sections[0].quota.is_none());
        assert_eq!(spec.instructions, vec!["Attempt all questions."]);
    }
}
