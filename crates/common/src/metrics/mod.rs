//! Metrics and observability utilities
//!
//! Counter helpers for the generation pipeline with standardized
//! naming conventions.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all ExamForge metrics
pub const METRICS_PREFIX: &str = "examforge";

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_papers_generated_total", METRICS_PREFIX),
        Unit::Count,
        "Total papers generated"
    );

    describe_histogram!(
        format!("{}_generation_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Paper generation latency in seconds"
    );

    describe_counter!(
        format!("{}_questions_sampled_total", METRICS_PREFIX),
        Unit::Count,
        "Total questions sampled into papers"
    );

    describe_counter!(
        format!("{}_sections_relaxed_total", METRICS_PREFIX),
        Unit::Count,
        "Sections that needed filter relaxation to fill"
    );

    describe_counter!(
        format!("{}_enrichment_outcomes_total", METRICS_PREFIX),
        Unit::Count,
        "Enrichment stage outcomes by stage and status"
    );

    describe_counter!(
        format!("{}_provider_failures_total", METRICS_PREFIX),
        Unit::Count,
        "Text provider request failures"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record generation metrics
pub struct GenerationMetrics {
    start: Instant,
    subject: String,
}

impl GenerationMetrics {
    /// Start tracking a generation run
    pub fn start(subject: &str) -> Self {
        Self {
            start: Instant::now(),
            subject: subject.to_string(),
        }
    }

    /// Record run completion
    pub fn finish(self, question_count: usize) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_papers_generated_total", METRICS_PREFIX),
            "subject" => self.subject.clone()
        )
        .increment(1);

        counter!(
            format!("{}_questions_sampled_total", METRICS_PREFIX),
            "subject" => self.subject.clone()
        )
        .increment(question_count as u64);

        histogram!(
            format!("{}_generation_duration_seconds", METRICS_PREFIX),
            "subject" => self.subject
        )
        .record(duration);
    }
}

/// Helper to record a section that required relaxation
pub fn record_section_relaxed(section: &str) {
    counter!(
        format!("{}_sections_relaxed_total", METRICS_PREFIX),
        "section" => section.to_string()
    )
    .increment(1);
}

/// Helper to record an enrichment stage outcome
pub fn record_enrichment_outcome(stage: &str, status: &str) {
    counter!(
        format!("{}_enrichment_outcomes_total", METRICS_PREFIX),
        "stage" => stage.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Helper to record a provider failure
pub fn record_provider_failure(provider: &str) {
    counter!(
        format!("{}_provider_failures_total", METRICS_PREFIX),
        "provider" => provider.to_string()
    )
    .increment(1);
}
