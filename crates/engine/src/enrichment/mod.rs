//! Enrichment pipeline
//!
//! Applies the enabled stages (rewrite, translate, explain, culturally
//! adapt) over the sampled set in concurrency-bounded batches. Per-item
//! failures are absorbed into processing history and counters; nothing
//! a provider does can fail the request.

mod pacer;

pub use pacer::{IntervalPacer, NoopPacer, Pacer};

use examforge_common::config::EnrichmentConfig;
use examforge_common::metrics::{record_enrichment_outcome, record_provider_failure};
use examforge_common::models::{
    EnrichedQuestion, EnrichmentReport, PaperSettings, StageKind, StageStatus, Subject,
};
use examforge_common::provider::{TextProvider, TextRequest};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Minimum length for generated text to count as a real rewrite
const MIN_GENERATED_LEN: usize = 10;

/// Outcome of attempting one stage on one question
enum StageOutcome {
    Recorded(StageStatus),
    /// Stage did not apply to this question, no event or counter
    Skipped,
}

struct StagePolicy {
    batch_size: usize,
    delay: Duration,
    sequential_threshold: usize,
}

pub struct EnrichmentPipeline {
    provider: Arc<dyn TextProvider>,
    pacer: Arc<dyn Pacer>,
    config: EnrichmentConfig,
}

impl EnrichmentPipeline {
    pub fn new(
        provider: Arc<dyn TextProvider>,
        pacer: Arc<dyn Pacer>,
        config: EnrichmentConfig,
    ) -> Self {
        Self {
            provider,
            pacer,
            config,
        }
    }

    fn policy(&self, stage: StageKind) -> StagePolicy {
        let c = &self.config;
        match stage {
            StageKind::Rewrite => StagePolicy {
                batch_size: c.rewrite_batch_size,
                delay: Duration::from_millis(c.rewrite_delay_ms),
                sequential_threshold: c.rewrite_sequential_threshold,
            },
            StageKind::Translate => StagePolicy {
                batch_size: c.translate_batch_size,
                delay: Duration::from_millis(c.translate_delay_ms),
                sequential_threshold: c.translate_sequential_threshold,
            },
            StageKind::Explain => StagePolicy {
                batch_size: c.explain_batch_size,
                delay: Duration::from_millis(c.explain_delay_ms),
                sequential_threshold: c.explain_sequential_threshold,
            },
            StageKind::CulturalAdaptation => StagePolicy {
                batch_size: c.adapt_batch_size,
                delay: Duration::from_millis(c.adapt_delay_ms),
                sequential_threshold: c.adapt_sequential_threshold,
            },
        }
    }

    /// Run every enabled stage over the sampled set, in order:
    /// rewrite, translate, explain, culturally adapt.
    #[instrument(skip_all, fields(count = questions.len()))]
    pub async fn run(
        &self,
        questions: &mut [EnrichedQuestion],
        subject: Subject,
        settings: &PaperSettings,
    ) -> EnrichmentReport {
        let mut report = EnrichmentReport::default();
        if questions.is_empty() || !settings.any_enrichment() {
            return report;
        }

        if settings.rewrite_questions {
            self.run_stage(StageKind::Rewrite, questions, subject, settings, &mut report)
                .await;
        }
        if settings.translate_questions {
            self.run_stage(
                StageKind::Translate,
                questions,
                subject,
                settings,
                &mut report,
            )
            .await;
        }
        if settings.generate_explanations {
            self.run_stage(StageKind::Explain, questions, subject, settings, &mut report)
                .await;
        }
        if settings.cultural_adaptation {
            self.run_stage(
                StageKind::CulturalAdaptation,
                questions,
                subject,
                settings,
                &mut report,
            )
            .await;
        }

        report
    }

    /// Drive one stage over the set. Small sets (or explicit
    /// `batchProcessing=false`) run sequentially; otherwise items run
    /// concurrently within fixed-size batches with a courtesy delay
    /// between batches.
    async fn run_stage(
        &self,
        stage: StageKind,
        questions: &mut [EnrichedQuestion],
        subject: Subject,
        settings: &PaperSettings,
        report: &mut EnrichmentReport,
    ) {
        let policy = self.policy(stage);
        let sequential =
            !settings.batch_processing || questions.len() <= policy.sequential_threshold;

        debug!(
            stage = %stage,
            count = questions.len(),
            sequential,
            "Running enrichment stage"
        );

        if sequential {
            for question in questions.iter_mut() {
                let outcome = self.apply(stage, question, subject, settings).await;
                Self::absorb(stage, outcome, report);
            }
            return;
        }

        let batch_count = questions.len().div_ceil(policy.batch_size);
        for (index, batch) in questions.chunks_mut(policy.batch_size).enumerate() {
            let outcomes = join_all(
                batch
                    .iter_mut()
                    .map(|question| self.apply(stage, question, subject, settings)),
            )
            .await;

            for outcome in outcomes {
                Self::absorb(stage, outcome, report);
            }

            if index + 1 < batch_count {
                self.pacer.pause(policy.delay).await;
            }
        }
    }

    fn absorb(stage: StageKind, outcome: StageOutcome, report: &mut EnrichmentReport) {
        if let StageOutcome::Recorded(status) = outcome {
            report.stage_mut(stage).absorb(status);
        }
    }

    /// Apply one stage to one question. Always resolves; provider
    /// errors become an `Error` event with the original text retained.
    async fn apply(
        &self,
        stage: StageKind,
        question: &mut EnrichedQuestion,
        subject: Subject,
        settings: &PaperSettings,
    ) -> StageOutcome {
        let (status, message) = match stage {
            StageKind::Rewrite => self.apply_rewrite(question, subject).await,
            StageKind::Translate => self.apply_translate(question, subject, settings).await,
            StageKind::Explain => match self.apply_explain(question, subject).await {
                Some(result) => result,
                None => return StageOutcome::Skipped,
            },
            StageKind::CulturalAdaptation => self.apply_adaptation(question, subject).await,
        };

        record_enrichment_outcome(stage.as_str(), Self::status_label(status));
        question.push_event(stage, status, message);
        StageOutcome::Recorded(status)
    }

    fn status_label(status: StageStatus) -> &'static str {
        match status {
            StageStatus::Success => "success",
            StageStatus::NoChange => "no_change",
            StageStatus::Error => "error",
        }
    }

    /// Accept generated text only when it is non-trivial and actually
    /// differs from the input
    fn is_real_change(generated: &str, original: &str) -> bool {
        generated.len() >= MIN_GENERATED_LEN
            && generated.to_lowercase() != original.to_lowercase()
    }

    async fn apply_rewrite(
        &self,
        question: &mut EnrichedQuestion,
        subject: Subject,
    ) -> (StageStatus, Option<String>) {
        let request = TextRequest::paraphrase(question.current_text(), subject);
        match self.provider.generate(&request).await {
            Ok(text) => {
                let text = text.trim();
                if Self::is_real_change(text, question.current_text()) {
                    question.record.question_text = text.to_string();
                    question.rewritten_text = Some(text.to_string());
                    (StageStatus::Success, None)
                } else {
                    (
                        StageStatus::NoChange,
                        Some("generated text indistinguishable from original".to_string()),
                    )
                }
            }
            Err(e) => {
                record_provider_failure(self.provider.name());
                (StageStatus::Error, Some(e.to_string()))
            }
        }
    }

    async fn apply_translate(
        &self,
        question: &mut EnrichedQuestion,
        subject: Subject,
        settings: &PaperSettings,
    ) -> (StageStatus, Option<String>) {
        let language = settings.target_language();
        let request = TextRequest::translate(question.current_text(), subject, language);
        match self.provider.generate(&request).await {
            Ok(text) => {
                let text = text.trim();
                if !Self::is_real_change(text, question.current_text()) {
                    return (
                        StageStatus::NoChange,
                        Some("translation indistinguishable from original".to_string()),
                    );
                }
                question.translated_text = Some(text.to_string());

                // MCQ options translate one by one; a failed option
                // keeps its original string
                if let Some(options) = question.original_options.clone() {
                    let mut translated = Vec::with_capacity(options.len());
                    for option in &options {
                        let request = TextRequest::translate(option, subject, language);
                        match self.provider.generate(&request).await {
                            Ok(t) if !t.trim().is_empty() => translated.push(t.trim().to_string()),
                            _ => translated.push(option.clone()),
                        }
                    }
                    question.translated_options = Some(translated);
                }

                (StageStatus::Success, None)
            }
            Err(e) => {
                record_provider_failure(self.provider.name());
                (StageStatus::Error, Some(e.to_string()))
            }
        }
    }

    /// `None` when the question already carries a curator explanation
    async fn apply_explain(
        &self,
        question: &mut EnrichedQuestion,
        subject: Subject,
    ) -> Option<(StageStatus, Option<String>)> {
        if question.record.explanation.is_some() {
            return None;
        }

        let request = TextRequest::explain(
            question.current_text(),
            question.record.correct_answer.clone(),
            subject,
        );
        Some(match self.provider.generate(&request).await {
            Ok(text) if text.trim().len() >= MIN_GENERATED_LEN => {
                question.generated_explanation = Some(text.trim().to_string());
                (StageStatus::Success, None)
            }
            Ok(_) => (
                StageStatus::NoChange,
                Some("generated explanation too short".to_string()),
            ),
            Err(e) => {
                record_provider_failure(self.provider.name());
                (StageStatus::Error, Some(e.to_string()))
            }
        })
    }

    async fn apply_adaptation(
        &self,
        question: &mut EnrichedQuestion,
        subject: Subject,
    ) -> (StageStatus, Option<String>) {
        let request = TextRequest::translate(question.current_text(), subject, "nepali");
        match self.provider.generate(&request).await {
            Ok(text) => {
                let text = text.trim();
                if Self::is_real_change(text, question.current_text()) {
                    question.culturally_adapted_text = Some(text.to_string());
                    (StageStatus::Success, None)
                } else {
                    (
                        StageStatus::NoChange,
                        Some("adaptation indistinguishable from original".to_string()),
                    )
                }
            }
            Err(e) => {
                record_provider_failure(self.provider.name());
                (StageStatus::Error, Some(e.to_string()))
            }
        }
    }
}
