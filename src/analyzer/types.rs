use serde::{Deserialize, Serialize};

/// Selects one option of one cleaner for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CleanRequest {
    pub cleaner_id: String,
    pub option_id: String,
}

impl CleanRequest {
    pub fn new(cleaner_id: impl Into<String>, option_id: impl Into<String>) -> Self {
        Self {
            cleaner_id: cleaner_id.into(),
            option_id: option_id.into(),
        }
    }
}

/// Reclaimable space found for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeItem {
    pub cleaner_id: String,
    pub option_id: String,
    /// Total bytes of matched files
    pub size: u64,
    /// Number of matched files, never capped
    pub file_count: u64,
    /// Sample of matched paths
    pub paths: Vec<String>,
    /// Entries whose stat failed
    #[serde(default)]
    pub skipped: u64,
}

/// Result of one analysis batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub total_size: u64,
    pub total_files: u64,
    pub items: Vec<AnalyzeItem>,
}

impl AnalyzeResponse {
    /// Build a response whose totals are the exact sums over `items`.
    pub fn from_items(items: Vec<AnalyzeItem>) -> Self {
        let total_size = items.iter().map(|item| item.size).sum();
        let total_files = items.iter().map(|item| item.file_count).sum();
        Self {
            total_size,
            total_files,
            items,
        }
    }

    /// Item for the given pair, if it was analysed.
    pub fn item(&self, cleaner_id: &str, option_id: &str) -> Option<&AnalyzeItem> {
        self.items
            .iter()
            .find(|item| item.cleaner_id == cleaner_id && item.option_id == option_id)
    }
}
