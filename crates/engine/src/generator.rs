//! Top-level generation orchestrator
//!
//! Drives one request through resolve, sample, account, enrich,
//! assemble, persist. Stateless across calls; only configuration and
//! storage errors propagate, enrichment and accounting degradation is
//! absorbed into the result.

use crate::accountant::UsageAccountant;
use crate::assembler::{PaperAssembler, SectionOutcome};
use crate::enrichment::{EnrichmentPipeline, IntervalPacer};
use crate::resolver::PatternResolver;
use crate::sampler::QuestionSampler;
use examforge_common::config::EnrichmentConfig;
use examforge_common::errors::Result;
use examforge_common::metrics::GenerationMetrics;
use examforge_common::models::{
    EnrichedQuestion, GenerationRequest, GenerationResult, QuestionRecord,
};
use examforge_common::provider::TextProvider;
use examforge_common::store::{PaperStore, PatternStore, QuestionStore};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

pub struct PaperGenerator {
    resolver: PatternResolver,
    sampler: QuestionSampler,
    pipeline: EnrichmentPipeline,
    accountant: UsageAccountant,
    assembler: PaperAssembler,
}

impl PaperGenerator {
    pub fn new(
        questions: Arc<dyn QuestionStore>,
        patterns: Arc<dyn PatternStore>,
        papers: Arc<dyn PaperStore>,
        provider: Arc<dyn TextProvider>,
        config: EnrichmentConfig,
    ) -> Self {
        Self {
            resolver: PatternResolver::new(patterns),
            sampler: QuestionSampler::new(questions.clone()),
            pipeline: EnrichmentPipeline::new(provider, Arc::new(IntervalPacer), config),
            accountant: UsageAccountant::new(questions),
            assembler: PaperAssembler::new(papers),
        }
    }

    /// Assemble from pre-built parts, used by tests to inject seeded
    /// samplers and no-op pacers
    pub fn from_parts(
        resolver: PatternResolver,
        sampler: QuestionSampler,
        pipeline: EnrichmentPipeline,
        accountant: UsageAccountant,
        assembler: PaperAssembler,
    ) -> Self {
        Self {
            resolver,
            sampler,
            pipeline,
            accountant,
            assembler,
        }
    }

    /// Generate one paper for a request. Sections are sampled
    /// sequentially; a paper is returned whenever sampling produced at
    /// least one question, with shortfalls surfaced in the statistics.
    #[instrument(skip_all, fields(subject = %request.subject, grade = %request.grade_level))]
    pub async fn generate(
        &self,
        user_id: Uuid,
        request: &GenerationRequest,
    ) -> Result<GenerationResult> {
        let metrics = GenerationMetrics::start(request.subject.as_str());

        let pattern = self.resolver.resolve(request).await?;
        let filters = request.filters();

        let mut questions: Vec<EnrichedQuestion> = Vec::new();
        let mut outcomes: Vec<SectionOutcome> = Vec::new();
        for (section_index, section) in pattern.sections.iter().enumerate() {
            let sample = self
                .sampler
                .sample_section(request.subject, request.grade_level, section, &filters)
                .await?;

            let start = questions.len();
            questions.extend(sample.questions.into_iter().map(EnrichedQuestion::new));
            outcomes.push(SectionOutcome {
                section_index,
                requested: sample.requested,
                range: start..questions.len(),
            });
        }

        // Every delivered question is accounted exactly once,
        // regardless of which sampling path selected it
        let records: Vec<QuestionRecord> = questions.iter().map(|q| q.record.clone()).collect();
        self.accountant.record(&records).await;

        let report = self
            .pipeline
            .run(&mut questions, request.subject, &request.settings)
            .await;

        let result = self
            .assembler
            .assemble(user_id, &pattern, request, &questions, &outcomes, report)
            .await?;

        metrics.finish(result.paper.questions.len());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::NoopPacer;
    use chrono::Utc;
    use examforge_common::models::{
        CompetencyLevel, Difficulty, DistributionSpec, GradeLevel, PaperSettings, QuestionKind,
        SectionQuota, SectionSpec, Subject,
    };
    use examforge_common::provider::FallbackProvider;
    use examforge_common::store::MemoryStore;
    use std::collections::HashSet;

    fn chemistry_pattern() -> DistributionSpec {
        DistributionSpec {
            id: Uuid::new_v4(),
            name: "NEB Chemistry Class 12".to_string(),
            subject: Subject::Chemistry,
            grade_level: GradeLevel::Twelve,
            total_marks: 75,
            total_questions: 22,
            duration_minutes: 180,
            sections: vec![
                SectionSpec {
                    name: "Group A".to_string(),
                    description: Some("Multiple choice questions".to_string()),
                    kind: QuestionKind::Mcq,
                    marks_per_question: 1,
                    number_of_questions: 11,
                    total_marks: 11,
                    quota: SectionQuota::None,
                },
                SectionSpec {
                    name: "Group B".to_string(),
                    description: Some("Short answer questions".to_string()),
                    kind: QuestionKind::ShortAnswer,
                    marks_per_question: 5,
                    number_of_questions: 8,
                    total_marks: 40,
                    quota: SectionQuota::None,
                },
                SectionSpec {
                    name: "Group C".to_string(),
                    description: Some("Long answer questions".to_string()),
                    kind: QuestionKind::LongAnswer,
                    marks_per_question: 8,
                    number_of_questions: 3,
                    total_marks: 24,
                    quota: SectionQuota::None,
                },
            ],
            instructions: vec!["Attempt all questions.".to_string()],
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn bank_question(kind: QuestionKind, marks: u32, n: usize) -> QuestionRecord {
        QuestionRecord {
            id: Uuid::new_v4(),
            question_text: format!("What is concept number {}?", n),
            kind,
            subject: Subject::Chemistry,
            grade_level: GradeLevel::Twelve,
            chapter: "Electrochemistry".to_string(),
            topic_category: None,
            competency_level: CompetencyLevel::Understanding,
            difficulty: Difficulty::Medium,
            year: 2023,
            marks,
            options: (kind == QuestionKind::Mcq)
                .then(|| vec!["a".into(), "b".into(), "c".into(), "d".into()]),
            correct_answer: "a".to_string(),
            explanation: None,
            marking_scheme: None,
            answer_tips: None,
            is_active: true,
            usage_count: 0,
            last_used_at: None,
        }
    }

    /// Seed `mcq`/`saq`/`laq` questions of the right shapes
    fn seed_bank(store: &MemoryStore, mcq: usize, saq: usize, laq: usize) {
        for n in 0..mcq {
            store.insert_question(bank_question(QuestionKind::Mcq, 1, n));
        }
        for n in 0..saq {
            store.insert_question(bank_question(QuestionKind::ShortAnswer, 5, n));
        }
        for n in 0..laq {
            store.insert_question(bank_question(QuestionKind::LongAnswer, 8, n));
        }
    }

    fn generator(store: Arc<MemoryStore>, seed: u64) -> PaperGenerator {
        PaperGenerator::from_parts(
            PatternResolver::new(store.clone()),
            QuestionSampler::with_seed(store.clone(), seed),
            EnrichmentPipeline::new(
                Arc::new(FallbackProvider::new()),
                Arc::new(NoopPacer::new()),
                EnrichmentConfig::default(),
            ),
            UsageAccountant::new(store.clone()),
            PaperAssembler::new(store),
        )
    }

    #[tokio::test]
    async fn test_full_paper_with_default_settings() {
        let store = Arc::new(MemoryStore::new());
        seed_bank(&store, 15, 12, 6);
        store.insert_pattern(chemistry_pattern());

        let gen = generator(store.clone(), 42);
        let request = GenerationRequest::new(Subject::Chemistry, GradeLevel::Twelve);
        let result = gen.generate(Uuid::new_v4(), &request).await.unwrap();

        assert_eq!(result.statistics.total_questions, 22);
        assert_eq!(result.statistics.total_marks, 75);
        assert_eq!(result.statistics.sections, 3);
        assert_eq!(result.statistics.processing_features, vec!["None"]);
        assert!(!result.statistics.under_delivered);

        // Section order then sampling order, 1-based
        let orders: Vec<u32> = result.paper.questions.iter().map(|q| q.order).collect();
        assert_eq!(orders, (1..=22).collect::<Vec<u32>>());
        assert_eq!(
            result
                .paper
                .questions
                .iter()
                .filter(|q| q.section_name == "Group A")
                .count(),
            11
        );
        assert_eq!(result.instructions, vec!["Attempt all questions."]);
        assert_eq!(store.paper_count(), 1);
    }

    #[tokio::test]
    async fn test_translation_with_fallback_provider() {
        let store = Arc::new(MemoryStore::new());
        seed_bank(&store, 15, 12, 6);
        store.insert_pattern(chemistry_pattern());

        let gen = generator(store, 42);
        let mut request = GenerationRequest::new(Subject::Chemistry, GradeLevel::Twelve);
        request.settings = PaperSettings {
            translate_questions: true,
            language: Some("nepali".to_string()),
            ..PaperSettings::default()
        };

        let result = gen.generate(Uuid::new_v4(), &request).await.unwrap();

        assert!(result.paper.questions.iter().all(|q| q.is_translated));
        assert!(result
            .statistics
            .processing_features
            .contains(&"Translation (nepali)".to_string()));
        assert_eq!(result.enrichment.translate.success, 22);
        assert!(result.paper.title.contains("Translated Edition"));
    }

    #[tokio::test]
    async fn test_exclude_used_and_single_increment() {
        let store = Arc::new(MemoryStore::new());
        seed_bank(&store, 15, 12, 6);
        store.insert_pattern(chemistry_pattern());

        let gen = generator(store.clone(), 42);
        let mut request = GenerationRequest::new(Subject::Chemistry, GradeLevel::Twelve);
        request.settings = PaperSettings {
            exclude_used_questions: true,
            ..PaperSettings::default()
        };

        let result = gen.generate(Uuid::new_v4(), &request).await.unwrap();

        for question_ref in &result.paper.questions {
            let stored = store.get_question(question_ref.question_id).unwrap();
            assert_eq!(stored.usage_count, 1);
            assert!(stored.last_used_at.is_some());
        }
    }

    #[tokio::test]
    async fn test_no_exclusivity_between_requests() {
        let store = Arc::new(MemoryStore::new());
        // Pool exactly the size of one paper
        seed_bank(&store, 11, 8, 3);
        store.insert_pattern(chemistry_pattern());

        let gen = generator(store, 42);
        let request = GenerationRequest::new(Subject::Chemistry, GradeLevel::Twelve);

        let first = gen.generate(Uuid::new_v4(), &request).await.unwrap();
        let second = gen.generate(Uuid::new_v4(), &request).await.unwrap();

        assert_eq!(first.statistics.total_questions, 22);
        assert_eq!(second.statistics.total_questions, 22);

        // Overlap is the accepted property: with a pool this size the
        // two papers necessarily reuse questions
        let first_ids: HashSet<Uuid> =
            first.paper.questions.iter().map(|q| q.question_id).collect();
        assert!(second
            .paper
            .questions
            .iter()
            .any(|q| first_ids.contains(&q.question_id)));
    }

    #[tokio::test]
    async fn test_insufficient_pool_flags_under_delivery() {
        let store = Arc::new(MemoryStore::new());
        // Short answer pool two questions short
        seed_bank(&store, 11, 6, 3);
        store.insert_pattern(chemistry_pattern());

        let gen = generator(store, 42);
        let request = GenerationRequest::new(Subject::Chemistry, GradeLevel::Twelve);
        let result = gen.generate(Uuid::new_v4(), &request).await.unwrap();

        assert_eq!(result.statistics.total_questions, 20);
        assert!(result.statistics.under_delivered);
        let group_b = result
            .sections
            .iter()
            .find(|s| s.name == "Group B")
            .unwrap();
        assert_eq!(group_b.requested_questions, 8);
        assert_eq!(group_b.delivered_questions, 6);
    }

    #[tokio::test]
    async fn test_cognitive_analysis_populates_metadata() {
        let store = Arc::new(MemoryStore::new());
        seed_bank(&store, 15, 12, 6);
        store.insert_pattern(chemistry_pattern());

        let gen = generator(store, 42);
        let mut request = GenerationRequest::new(Subject::Chemistry, GradeLevel::Twelve);
        request.settings = PaperSettings {
            cognitive_level_analysis: true,
            ..PaperSettings::default()
        };

        let result = gen.generate(Uuid::new_v4(), &request).await.unwrap();

        // "What is ..." phrasing classifies as remember
        assert!(result
            .paper
            .questions
            .iter()
            .all(|q| q.cognitive_level.as_deref() == Some("remember")));
        for section in &result.sections {
            let levels = section.cognitive_levels.as_ref().unwrap();
            assert_eq!(levels.len(), section.delivered_questions as usize);
            assert_eq!(section.success_rate, Some(1.0));
        }
        assert!(result
            .statistics
            .processing_features
            .contains(&"Cognitive Analysis".to_string()));
    }
}
