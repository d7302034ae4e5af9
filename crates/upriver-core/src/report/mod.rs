//! Report rendering over built traversal structures
//!
//! All renderers are read-only consumers of the tree/chain values
//! produced by the traversal engine; the only store access they perform
//! is display-name resolution through the shared name cache.

pub mod compact;
pub mod json;
pub mod markdown;

use chrono::{DateTime, Local};

/// Context shared by every report: dataset version, the product flow of
/// the root process (when known) and the generation timestamp.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    pub dataset_version: String,
    pub root_flow_id: Option<String>,
    pub category_filter: Option<String>,
    pub generated_at: DateTime<Local>,
}

impl ReportMeta {
    pub fn new(dataset_version: &str) -> Self {
        ReportMeta {
            dataset_version: dataset_version.to_string(),
            root_flow_id: None,
            category_filter: None,
            generated_at: Local::now(),
        }
    }

    pub fn with_root_flow(mut self, flow_id: Option<String>) -> Self {
        self.root_flow_id = flow_id;
        self
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category_filter = category;
        self
    }
}

/// Short display prefix of an id (UUIDs are shown truncated).
pub(crate) fn short(id: &str) -> String {
    id.chars().take(8).collect()
}
