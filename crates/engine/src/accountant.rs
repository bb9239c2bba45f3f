//! Usage accounting
//!
//! After sampling, every delivered question gets its usage counter
//! incremented exactly once. Accounting is a side effect: a store
//! failure is logged and swallowed so it can never block delivery.

use chrono::Utc;
use examforge_common::models::QuestionRecord;
use examforge_common::store::QuestionStore;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct UsageAccountant {
    store: Arc<dyn QuestionStore>,
}

impl UsageAccountant {
    pub fn new(store: Arc<dyn QuestionStore>) -> Self {
        Self { store }
    }

    pub async fn record(&self, questions: &[QuestionRecord]) {
        if questions.is_empty() {
            return;
        }

        let ids: Vec<_> = questions.iter().map(|q| q.id).collect();
        match self.store.record_usage(&ids, Utc::now()).await {
            Ok(()) => debug!(count = ids.len(), "Usage recorded"),
            Err(e) => warn!(count = ids.len(), error = %e, "Usage recording failed"),
        }
    }
}
