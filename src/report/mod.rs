//! Human- and machine-readable staleness reports
//!
//! Only records whose documentation already exists are surfaced. Missing
//! documentation is not something to "update", so it never appears here.

use crate::repo::MirrorConfig;
use crate::stale::{stale_records, ChangeRecord};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Banner line delimiting the text report
pub const BANNER: &str = "════════════════════════════════════════════════════════════";

/// Renders classified records for people and for downstream tooling
#[derive(Debug, Clone)]
pub struct ReportRenderer {
    docs_root: String,
    instruction: String,
}

/// One stale pair in the JSON report
#[derive(Debug, Clone, Serialize)]
pub struct StaleEntry<'a> {
    pub source_path: &'a str,
    pub doc_path: &'a str,
}

/// JSON report body
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub stale: Vec<StaleEntry<'a>>,
    /// `None` when nothing is stale
    pub instruction: Option<String>,
}

impl ReportRenderer {
    pub fn new(config: &MirrorConfig) -> Self {
        Self {
            docs_root: config.docs_root(),
            instruction: config.instruction.clone(),
        }
    }

    /// The single batch instruction covering every affected source file
    pub fn instruction(&self, sources: &[&str]) -> String {
        self.instruction
            .replace("{docs_root}", &self.docs_root)
            .replace("{files}", &sources.join(" "))
    }

    /// Text report; empty when no documentation is stale
    pub fn render(&self, records: &[ChangeRecord]) -> String {
        let stale: Vec<&ChangeRecord> = stale_records(records).collect();
        if stale.is_empty() {
            return String::new();
        }

        let sources: Vec<&str> = stale.iter().map(|r| r.source_path.as_str()).collect();

        let mut out = String::new();
        out.push_str(BANNER);
        out.push('\n');
        out.push_str("📚 Documentation may be out of date\n");
        out.push_str(BANNER);
        out.push_str("\n\n");
        out.push_str(&format!(
            "{} changed source file(s) have existing documentation:\n\n",
            stale.len()
        ));

        for record in &stale {
            out.push_str(&format!("  {} → {}\n", record.source_path, record.doc_path));
        }

        out.push_str("\nTo update them all at once:\n\n");
        out.push_str(&format!("  {}\n", self.instruction(&sources)));
        out.push('\n');
        out.push_str(BANNER);
        out.push('\n');

        out
    }

    /// JSON report, always well-formed even when nothing is stale
    pub fn render_json(&self, records: &[ChangeRecord]) -> Result<String> {
        let stale: Vec<StaleEntry<'_>> = stale_records(records)
            .map(|r| StaleEntry {
                source_path: &r.source_path,
                doc_path: &r.doc_path,
            })
            .collect();

        let instruction = if stale.is_empty() {
            None
        } else {
            let sources: Vec<&str> = stale.iter().map(|e| e.source_path).collect();
            Some(self.instruction(&sources))
        };

        let report = JsonReport {
            generated_at: Utc::now(),
            stale,
            instruction,
        };

        Ok(serde_json::to_string_pretty(&report)?)
    }
}
