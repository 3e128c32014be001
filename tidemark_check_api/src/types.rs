use serde::{Deserialize, Serialize};

/// Line count at which schema or structure diffs are considered large.
pub const DEFAULT_LARGE_DIFF_THRESHOLD: u32 = 200;

/// Conventional locations of the files a Rails-style project keeps in sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Layout {
    /// Directory holding timestamped migration files.
    pub migrations_dir: String,
    /// Generated schema snapshot declaring the current version.
    pub schema_path: String,
    /// Generated SQL dump listing every applied version.
    pub structure_path: String,
    /// Extensions of source files whose comment-only edits are tolerated next to migrations.
    pub annotated_extensions: Vec<String>,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            migrations_dir: "db/migrate".into(),
            schema_path: "db/schema.rb".into(),
            structure_path: "db/structure.sql".into(),
            annotated_extensions: vec!["rb".into()],
        }
    }
}

/// Settings shared by every check during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckSettings {
    /// Additions or deletions at which a schema/structure diff is flagged; `None` or `0` disables it.
    pub large_diff_threshold: Option<u32>,
    /// File locations checked by the rules.
    pub layout: Layout,
}

impl CheckSettings {
    /// The large-diff threshold, if the rule is enabled.
    #[must_use]
    pub fn large_diff_threshold(&self) -> Option<u32> {
        self.large_diff_threshold.filter(|threshold| *threshold > 0)
    }
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            large_diff_threshold: Some(DEFAULT_LARGE_DIFF_THRESHOLD),
            layout: Layout::default(),
        }
    }
}

/// Summary information about a registered check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckSummary {
    /// Stable identifier for the check.
    pub id: String,
    /// Human-friendly label for display.
    pub label: String,
}
