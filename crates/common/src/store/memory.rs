//! In-memory store for tests and credential-less runs

use crate::errors::Result;
use crate::models::{
    DistributionSpec, GeneratedPaper, GradeLevel, QuestionFilter, QuestionRecord, Subject,
};
use crate::store::{PaperStore, PatternStore, QuestionStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

/// All three store traits backed by maps behind a `RwLock`. Poisoned
/// locks are unreachable here since no holder panics mid-write, so the
/// guards use `unwrap_or_else` on the poison error's inner value.
#[derive(Default)]
pub struct MemoryStore {
    questions: RwLock<HashMap<Uuid, QuestionRecord>>,
    patterns: RwLock<HashMap<Uuid, DistributionSpec>>,
    papers: RwLock<HashMap<Uuid, GeneratedPaper>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_question(&self, record: QuestionRecord) {
        self.questions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(record.id, record);
    }

    pub fn insert_pattern(&self, spec: DistributionSpec) {
        self.patterns
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(spec.id, spec);
    }

    pub fn get_question(&self, id: Uuid) -> Option<QuestionRecord> {
        self.questions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
    }

    pub fn paper_count(&self) -> usize {
        self.papers.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn get_paper(&self, id: Uuid) -> Option<GeneratedPaper> {
        self.papers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
    }
}

#[async_trait]
impl QuestionStore for MemoryStore {
    async fn find_candidates(&self, filter: &QuestionFilter) -> Result<Vec<QuestionRecord>> {
        let questions = self.questions.read().unwrap_or_else(|e| e.into_inner());
        let mut matches: Vec<QuestionRecord> =
            questions.values().filter(|q| filter.matches(q)).cloned().collect();
        // Stable order so seeded sampling is reproducible across runs
        matches.sort_by_key(|q| q.id);
        Ok(matches)
    }

    async fn record_usage(&self, ids: &[Uuid], at: DateTime<Utc>) -> Result<()> {
        let mut questions = self.questions.write().unwrap_or_else(|e| e.into_inner());
        for id in ids {
            if let Some(q) = questions.get_mut(id) {
                q.usage_count += 1;
                q.last_used_at = Some(at);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl PatternStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<DistributionSpec>> {
        Ok(self
            .patterns
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned())
    }

    async fn find_latest_active(
        &self,
        subject: Subject,
        grade_level: GradeLevel,
    ) -> Result<Option<DistributionSpec>> {
        let patterns = self.patterns.read().unwrap_or_else(|e| e.into_inner());
        Ok(patterns
            .values()
            .filter(|p| p.is_active && p.subject == subject && p.grade_level == grade_level)
            .max_by_key(|p| p.created_at)
            .cloned())
    }
}

#[async_trait]
impl PaperStore for MemoryStore {
    async fn insert_paper(&self, paper: &GeneratedPaper) -> Result<()> {
        self.papers
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(paper.id, paper.clone());
        Ok(())
    }
}
