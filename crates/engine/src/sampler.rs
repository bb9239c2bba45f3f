//! Constrained question sampling
//!
//! For one section of a pattern, draws `number_of_questions` records
//! from the bank: quota buckets first (topic or competency), then an
//! unconstrained top-off, then progressive filter relaxation when the
//! pool runs dry. Draws are uniform without replacement and never
//! repeat a question within a section.

use examforge_common::errors::Result;
use examforge_common::metrics::record_section_relaxed;
use examforge_common::models::{
    GradeLevel, PaperFilters, QuestionFilter, QuestionRecord, SectionQuota, SectionSpec, Subject,
};
use examforge_common::store::QuestionStore;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};
use uuid::Uuid;

/// Result of sampling one section
#[derive(Debug)]
pub struct SectionSample {
    pub questions: Vec<QuestionRecord>,
    pub requested: u32,
    /// Whether difficulty/year filters had to be dropped to fill
    pub relaxed: bool,
}

impl SectionSample {
    pub fn under_delivered(&self) -> bool {
        (self.questions.len() as u32) < self.requested
    }
}

pub struct QuestionSampler {
    store: Arc<dyn QuestionStore>,
    rng: Mutex<StdRng>,
}

impl QuestionSampler {
    pub fn new(store: Arc<dyn QuestionStore>) -> Self {
        Self {
            store,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Seeded variant for reproducible draws in tests
    pub fn with_seed(store: Arc<dyn QuestionStore>, seed: u64) -> Self {
        Self {
            store,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Sample a full section, best effort. Returns fewer questions than
    /// requested only when the pool is exhausted after relaxation;
    /// callers surface that through delivered totals, not errors.
    pub async fn sample_section(
        &self,
        subject: Subject,
        grade_level: GradeLevel,
        section: &SectionSpec,
        filters: &PaperFilters,
    ) -> Result<SectionSample> {
        let requested = section.number_of_questions as usize;

        let mut base = QuestionFilter::new(
            subject,
            grade_level,
            section.kind,
            section.marks_per_question,
        );
        base.chapters = filters.chapters.clone();
        base.difficulties = filters.difficulties.clone();
        base.years = filters.years.clone();
        base.unused_only = filters.exclude_used;

        let mut selected: Vec<QuestionRecord> = Vec::with_capacity(requested);
        let mut seen: HashSet<Uuid> = HashSet::with_capacity(requested);

        // Quota buckets first
        match &section.quota {
            SectionQuota::None => {}
            SectionQuota::ByTopic(buckets) => {
                for bucket in buckets {
                    let filter = base.with_topic(bucket.category);
                    self.draw_into(&filter, bucket.questions as usize, &mut selected, &mut seen)
                        .await?;
                }
            }
            SectionQuota::ByCompetency(buckets) => {
                for bucket in buckets {
                    let filter = base.with_competency(bucket.level);
                    self.draw_into(&filter, bucket.questions as usize, &mut selected, &mut seen)
                        .await?;
                }
            }
        }

        // Unconstrained top-off for the shortfall
        if selected.len() < requested {
            let shortfall = requested - selected.len();
            self.draw_into(&base, shortfall, &mut selected, &mut seen)
                .await?;
        }

        // Progressive relaxation: drop difficulty, then year
        let mut relaxed = false;
        if selected.len() < requested && base.difficulties.is_some() {
            relaxed = true;
            let filter = base.without_difficulties();
            let shortfall = requested - selected.len();
            self.draw_into(&filter, shortfall, &mut selected, &mut seen)
                .await?;
            base = filter;
        }
        if selected.len() < requested && base.years.is_some() {
            relaxed = true;
            let filter = base.without_years();
            let shortfall = requested - selected.len();
            self.draw_into(&filter, shortfall, &mut selected, &mut seen)
                .await?;
        }

        if relaxed {
            record_section_relaxed(&section.name);
        }
        if selected.len() < requested {
            warn!(
                section = %section.name,
                requested,
                delivered = selected.len(),
                "Question pool exhausted, section under-delivered"
            );
        } else {
            debug!(section = %section.name, count = selected.len(), "Section sampled");
        }

        Ok(SectionSample {
            questions: selected,
            requested: section.number_of_questions,
            relaxed,
        })
    }

    /// Draw up to `count` records matching the filter, skipping ids
    /// already selected. Uniform without replacement.
    async fn draw_into(
        &self,
        filter: &QuestionFilter,
        count: usize,
        selected: &mut Vec<QuestionRecord>,
        seen: &mut HashSet<Uuid>,
    ) -> Result<()> {
        if count == 0 {
            return Ok(());
        }

        let mut candidates = self.store.find_candidates(filter).await?;
        candidates.retain(|q| !seen.contains(&q.id));

        let picks: Vec<QuestionRecord> = {
            let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
            candidates
                .choose_multiple(&mut *rng, count)
                .cloned()
                .collect()
        };

        for pick in picks {
            seen.insert(pick.id);
            selected.push(pick);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use examforge_common::models::{
        CompetencyLevel, Difficulty, QuestionKind, SectionQuota, TopicCategory, TopicQuota,
    };
    use examforge_common::store::MemoryStore;

    fn record(
        kind: QuestionKind,
        marks: u32,
        topic: Option<TopicCategory>,
        difficulty: Difficulty,
        year: i32,
    ) -> QuestionRecord {
        QuestionRecord {
            id: Uuid::new_v4(),
            question_text: "Sample question?".to_string(),
            kind,
            subject: Subject::Chemistry,
            grade_level: GradeLevel::Twelve,
            chapter: "Electrochemistry".to_string(),
            topic_category: topic,
            competency_level: CompetencyLevel::Understanding,
            difficulty,
            year,
            marks,
            options: None,
            correct_answer: "answer".to_string(),
            explanation: None,
            marking_scheme: None,
            answer_tips: None,
            is_active: true,
            usage_count: 0,
            last_used_at: None,
        }
    }

    fn section(count: u32, quota: SectionQuota) -> SectionSpec {
        SectionSpec {
            name: "Group B".to_string(),
            description: None,
            kind: QuestionKind::ShortAnswer,
            marks_per_question: 5,
            number_of_questions: count,
            total_marks: count * 5,
            quota,
        }
    }

    fn seed_pool(store: &MemoryStore, topic: TopicCategory, n: usize) {
        for _ in 0..n {
            store.insert_question(record(
                QuestionKind::ShortAnswer,
                5,
                Some(topic),
                Difficulty::Medium,
                2023,
            ));
        }
    }

    #[tokio::test]
    async fn test_quota_buckets_honored() {
        let store = Arc::new(MemoryStore::new());
        seed_pool(&store, TopicCategory::OrganicChemistry, 10);
        seed_pool(&store, TopicCategory::PhysicalChemistry, 10);

        let quota = SectionQuota::ByTopic(vec![
            TopicQuota {
                category: TopicCategory::OrganicChemistry,
                questions: 3,
                marks: 15,
            },
            TopicQuota {
                category: TopicCategory::PhysicalChemistry,
                questions: 2,
                marks: 10,
            },
        ]);

        let sampler = QuestionSampler::with_seed(store, 7);
        let sample = sampler
            .sample_section(
                Subject::Chemistry,
                GradeLevel::Twelve,
                &section(5, quota),
                &PaperFilters::default(),
            )
            .await
            .unwrap();

        assert_eq!(sample.questions.len(), 5);
        assert!(!sample.relaxed);
        let organic = sample
            .questions
            .iter()
            .filter(|q| q.topic_category == Some(TopicCategory::OrganicChemistry))
            .count();
        assert_eq!(organic, 3);
    }

    #[tokio::test]
    async fn test_under_supplied_bucket_tops_off_without_duplicates() {
        let store = Arc::new(MemoryStore::new());
        // Only 1 organic question, plenty of physical ones
        seed_pool(&store, TopicCategory::OrganicChemistry, 1);
        seed_pool(&store, TopicCategory::PhysicalChemistry, 10);

        let quota = SectionQuota::ByTopic(vec![TopicQuota {
            category: TopicCategory::OrganicChemistry,
            questions: 3,
            marks: 15,
        }]);

        let sampler = QuestionSampler::with_seed(store, 7);
        let sample = sampler
            .sample_section(
                Subject::Chemistry,
                GradeLevel::Twelve,
                &section(6, quota),
                &PaperFilters::default(),
            )
            .await
            .unwrap();

        assert_eq!(sample.questions.len(), 6);
        let ids: HashSet<Uuid> = sample.questions.iter().map(|q| q.id).collect();
        assert_eq!(ids.len(), 6);
    }

    #[tokio::test]
    async fn test_relaxation_drops_difficulty_then_year() {
        let store = Arc::new(MemoryStore::new());
        // 2 matching strictly, 2 more if difficulty is dropped, 2 more
        // if year is dropped too
        for _ in 0..2 {
            store.insert_question(record(
                QuestionKind::ShortAnswer,
                5,
                None,
                Difficulty::Easy,
                2023,
            ));
            store.insert_question(record(
                QuestionKind::ShortAnswer,
                5,
                None,
                Difficulty::Hard,
                2023,
            ));
            store.insert_question(record(
                QuestionKind::ShortAnswer,
                5,
                None,
                Difficulty::Hard,
                2019,
            ));
        }

        let filters = PaperFilters {
            chapters: None,
            difficulties: Some(vec![Difficulty::Easy]),
            years: Some(vec![2023]),
            exclude_used: false,
        };

        let sampler = QuestionSampler::with_seed(store, 11);
        let sample = sampler
            .sample_section(
                Subject::Chemistry,
                GradeLevel::Twelve,
                &section(6, SectionQuota::None),
                &filters,
            )
            .await
            .unwrap();

        assert_eq!(sample.questions.len(), 6);
        assert!(sample.relaxed);
    }

    #[tokio::test]
    async fn test_exhausted_pool_under_delivers_without_error() {
        let store = Arc::new(MemoryStore::new());
        seed_pool(&store, TopicCategory::OrganicChemistry, 3);

        let sampler = QuestionSampler::with_seed(store, 3);
        let sample = sampler
            .sample_section(
                Subject::Chemistry,
                GradeLevel::Twelve,
                &section(8, SectionQuota::None),
                &PaperFilters::default(),
            )
            .await
            .unwrap();

        assert_eq!(sample.questions.len(), 3);
        assert!(sample.under_delivered());
    }

    #[tokio::test]
    async fn test_exclude_used_filters_bank() {
        let store = Arc::new(MemoryStore::new());
        let mut used = record(QuestionKind::ShortAnswer, 5, None, Difficulty::Medium, 2023);
        used.usage_count = 4;
        store.insert_question(used);
        seed_pool(&store, TopicCategory::OrganicChemistry, 2);

        let filters = PaperFilters {
            exclude_used: true,
            ..PaperFilters::default()
        };

        let sampler = QuestionSampler::with_seed(store, 5);
        let sample = sampler
            .sample_section(
                Subject::Chemistry,
                GradeLevel::Twelve,
                &section(3, SectionQuota::None),
                &filters,
            )
            .await
            .unwrap();

        assert_eq!(sample.questions.len(), 2);
        assert!(sample.questions.iter().all(|q| q.usage_count == 0));
    }
}
