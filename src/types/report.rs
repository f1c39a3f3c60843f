//! Report data consumed by caption generation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Read-only view of a damage report, as supplied by the report store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSharingData {
    pub id: String,
    /// Damage category key, e.g. `berlubang`.
    pub category: String,
    pub street: String,
    pub district: String,
    pub city: String,
    pub province: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub share_count: u64,
}

impl ReportSharingData {
    /// `street, district, city`, skipping blank parts.
    pub fn location(&self) -> String {
        [&self.street, &self.district, &self.city]
            .into_iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
