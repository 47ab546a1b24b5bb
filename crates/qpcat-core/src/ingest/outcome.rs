use std::fmt;

use serde::{Deserialize, Serialize};

/// Aggregate result of one ingestion call.
///
/// `messages` holds one line per failed entry, in entry order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionOutcome {
    pub success_count: usize,
    pub failure_count: usize,
    pub messages: Vec<String>,
    /// Ids of the records created, in entry order.
    pub created: Vec<i64>,
}

impl IngestionOutcome {
    pub fn record_success(&mut self, paper_id: i64) {
        self.success_count += 1;
        self.created.push(paper_id);
    }

    pub fn record_failure(&mut self, entry_name: &str, detail: &dyn fmt::Display) {
        self.failure_count += 1;
        self.messages
            .push(format!("Error processing {entry_name}: {detail}"));
    }

    /// Number of entries attempted.
    pub const fn total(&self) -> usize {
        self.success_count + self.failure_count
    }

    pub const fn has_failures(&self) -> bool {
        self.failure_count > 0
    }
}
