//! SeaORM entity models
//!
//! Database entities for the ExamForge engine. Domain enums are stored
//! as text columns and parsed back through their `FromStr` impls;
//! nested documents (pattern sections, paper question lists) are JSONB.

mod generated_paper;
mod pattern;
mod question;

pub use question::{
    ActiveModel as QuestionActiveModel, Column as QuestionColumn, Entity as QuestionEntity,
    Model as QuestionModel,
};

pub use pattern::{
    ActiveModel as PatternActiveModel, Column as PatternColumn, Entity as PatternEntity,
    Model as PatternModel,
};

pub use generated_paper::{
    ActiveModel as GeneratedPaperActiveModel, Column as GeneratedPaperColumn,
    Entity as GeneratedPaperEntity, Model as GeneratedPaperModel,
};
