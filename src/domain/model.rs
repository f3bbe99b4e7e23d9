use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

/// Which on-disk artifact the working text was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Baseline {
    Backup,
    Live,
}

#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub path: String,
    pub text: String,
    pub baseline: Baseline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerDeclaration {
    pub line: usize,
    pub method: String,
    pub deferred: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    After,
    Before,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertionPoint {
    pub line: usize,
    pub placement: Placement,
    pub indent: String,
}

/// Tunables of the migration heuristics. Every field has a default matching
/// the Next.js `params` -> `Promise<params>` migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationRules {
    pub param_name: String,
    pub resolved_name: String,
    pub wrapper: String,
    pub methods: Vec<String>,
    pub bootstrap_calls: Vec<String>,
    /// Lines inspected for the wrapped signature, declaration line included.
    pub signature_lookahead: usize,
    /// Upper bound (exclusive, relative to the declaration) of the body scan.
    pub scan_window: usize,
}

impl Default for MigrationRules {
    fn default() -> Self {
        Self {
            param_name: "params".to_string(),
            resolved_name: "resolvedParams".to_string(),
            wrapper: "Promise".to_string(),
            methods: ["GET", "POST", "PUT", "PATCH", "DELETE"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            bootstrap_calls: vec!["connectDB".to_string()],
            signature_lookahead: 4,
            scan_window: 10,
        }
    }
}

impl MigrationRules {
    pub fn resolution_statement(&self) -> String {
        format!(
            "const {} = await {};",
            self.resolved_name, self.param_name
        )
    }

    pub fn wrapped_marker(&self) -> String {
        format!("{}: {}<", self.param_name, self.wrapper)
    }
}

/// Counters produced by one run of the transformer over a file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformStats {
    pub signatures_rewritten: usize,
    pub resolutions_inserted: usize,
    pub already_resolved: usize,
    /// Declaration lines (1-based) whose body had no anchor in the scan window.
    pub unanchored: Vec<usize>,
    pub references_rewritten: usize,
}

#[derive(Debug, Clone)]
pub struct TransformOutput {
    pub text: String,
    pub stats: TransformStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    Fixed,
    WouldFix,
    SkippedNotFound,
    SkippedNoChange,
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOutcome {
    pub path: String,
    #[serde(flatten)]
    pub status: FileStatus,
    pub baseline: Option<Baseline>,
    pub stats: Option<TransformStats>,
}

impl FileOutcome {
    pub fn skipped_not_found(path: &str) -> Self {
        Self {
            path: path.to_string(),
            status: FileStatus::SkippedNotFound,
            baseline: None,
            stats: None,
        }
    }

    pub fn failed(path: &str, reason: String) -> Self {
        Self {
            path: path.to_string(),
            status: FileStatus::Failed { reason },
            baseline: None,
            stats: None,
        }
    }

    pub fn is_changed(&self) -> bool {
        matches!(self.status, FileStatus::Fixed | FileStatus::WouldFix)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub dry_run: bool,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn changed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_changed()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, FileStatus::Failed { .. }))
            .count()
    }

    pub fn summary(&self) -> String {
        if self.dry_run {
            format!("Would fix {}/{} files", self.changed(), self.total())
        } else {
            format!("Fixed {}/{} files", self.changed(), self.total())
        }
    }

    /// Pretty-printed report, the only thing written to stdout with `--report-json`.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
