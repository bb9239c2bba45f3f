//! Pattern resolution
//!
//! Turns a generation request into the distribution pattern the rest
//! of the pipeline works from. An explicit pattern id must exist; with
//! no id, the latest active pattern for the subject and level is used.

use examforge_common::errors::{AppError, Result};
use examforge_common::models::{DistributionSpec, GenerationRequest};
use examforge_common::store::PatternStore;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct PatternResolver {
    patterns: Arc<dyn PatternStore>,
}

impl PatternResolver {
    pub fn new(patterns: Arc<dyn PatternStore>) -> Self {
        Self { patterns }
    }

    pub async fn resolve(&self, request: &GenerationRequest) -> Result<DistributionSpec> {
        let spec = match request.pattern_id {
            Some(id) => self
                .patterns
                .find_by_id(id)
                .await?
                .ok_or_else(|| AppError::PatternNotFound { id: id.to_string() })?,
            None => self
                .patterns
                .find_latest_active(request.subject, request.grade_level)
                .await?
                .ok_or_else(|| AppError::NoPatternAvailable {
                    subject: request.subject.to_string(),
                    grade_level: request.grade_level.to_string(),
                })?,
        };

        // Patterns are validated when authored; a failure here points at
        // hand-edited data, worth surfacing but not fatal
        if let Err(e) = spec.validate() {
            warn!(pattern = %spec.name, error = %e, "Pattern failed structural validation");
        }

        debug!(pattern = %spec.name, sections = spec.sections.len(), "Resolved pattern");
        Ok(spec)
    }
}
