//! Repository pattern for database operations
//!
//! Implements the store traits against Postgres so the engine can run
//! unchanged over this or the in-memory store.

use crate::db::models::*;
use crate::db::DbPool;
use crate::errors::Result;
use crate::models::{
    DistributionSpec, GeneratedPaper, GradeLevel, QuestionFilter, QuestionRecord, Subject,
};
use crate::store::{PaperStore, PatternStore, QuestionStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

/// Repository for data access operations
#[derive(Clone)]
pub struct Repository {
    pool: DbPool,
}

impl Repository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> &DatabaseConnection {
        self.pool.conn()
    }

    // ========================================================================
    // Health Check
    // ========================================================================

    /// Ping the database
    pub async fn ping(&self) -> Result<()> {
        self.pool.ping().await
    }

    // ========================================================================
    // Query Building
    // ========================================================================

    fn candidate_query(filter: &QuestionFilter) -> sea_orm::Select<QuestionEntity> {
        let mut query = QuestionEntity::find()
            .filter(QuestionColumn::IsActive.eq(true))
            .filter(QuestionColumn::Subject.eq(filter.subject.as_str()))
            .filter(QuestionColumn::GradeLevel.eq(filter.grade_level.as_str()))
            .filter(QuestionColumn::Kind.eq(filter.kind.as_str()))
            .filter(QuestionColumn::Marks.eq(filter.marks as i32));

        if let Some(chapters) = &filter.chapters {
            query = query.filter(QuestionColumn::Chapter.is_in(chapters.clone()));
        }
        if let Some(difficulties) = &filter.difficulties {
            let values: Vec<&str> = difficulties.iter().map(|d| d.as_str()).collect();
            query = query.filter(QuestionColumn::Difficulty.is_in(values));
        }
        if let Some(years) = &filter.years {
            query = query.filter(QuestionColumn::Year.is_in(years.clone()));
        }
        if filter.unused_only {
            query = query.filter(QuestionColumn::UsageCount.eq(0));
        }
        if let Some(category) = filter.topic_category {
            query = query.filter(QuestionColumn::TopicCategory.eq(category.as_str()));
        }
        if let Some(level) = filter.competency_level {
            query = query.filter(QuestionColumn::CompetencyLevel.eq(level.as_str()));
        }

        query
    }
}

// ============================================================================
// Store Trait Implementations
// ============================================================================

#[async_trait]
impl QuestionStore for Repository {
    async fn find_candidates(&self, filter: &QuestionFilter) -> Result<Vec<QuestionRecord>> {
        Self::candidate_query(filter)
            .order_by_asc(QuestionColumn::Id)
            .all(self.conn())
            .await?
            .into_iter()
            .map(QuestionModel::into_record)
            .collect()
    }

    async fn record_usage(&self, ids: &[Uuid], at: DateTime<Utc>) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }

        QuestionEntity::update_many()
            .col_expr(
                QuestionColumn::UsageCount,
                Expr::col(QuestionColumn::UsageCount).add(1),
            )
            .col_expr(QuestionColumn::LastUsedAt, Expr::value(at))
            .col_expr(QuestionColumn::UpdatedAt, Expr::value(at))
            .filter(QuestionColumn::Id.is_in(ids.to_vec()))
            .exec(self.conn())
            .await?;

        Ok(())
    }
}

#[async_trait]
impl PatternStore for Repository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<DistributionSpec>> {
        PatternEntity::find_by_id(id)
            .one(self.conn())
            .await?
            .map(PatternModel::into_spec)
            .transpose()
    }

    async fn find_latest_active(
        &self,
        subject: Subject,
        grade_level: GradeLevel,
    ) -> Result<Option<DistributionSpec>> {
        PatternEntity::find()
            .filter(PatternColumn::IsActive.eq(true))
            .filter(PatternColumn::Subject.eq(subject.as_str()))
            .filter(PatternColumn::GradeLevel.eq(grade_level.as_str()))
            .order_by_desc(PatternColumn::CreatedAt)
            .one(self.conn())
            .await?
            .map(PatternModel::into_spec)
            .transpose()
    }
}

#[async_trait]
impl PaperStore for Repository {
    async fn insert_paper(&self, paper: &GeneratedPaper) -> Result<()> {
        GeneratedPaperActiveModel::from_paper(paper)?
            .insert(self.conn())
            .await?;
        Ok(())
    }
}
