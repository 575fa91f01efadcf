// WHY: machine-readable record of a run for --stats-out
// Mirrors what the CLI prints per file so runs can be audited afterwards

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::quotes::QuoteTally;

/// Processing status of one input
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Converted,
    Unchanged,
    /// Quote report only (`--report-only`)
    Reported,
    Failed,
}

/// Per-file processing statistics
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FileStats {
    /// Input path as given on the command line
    pub path: String,
    /// Number of characters in the extracted text
    pub chars_processed: u64,
    pub quotes_before: QuoteTally,
    pub quotes_after: QuoteTally,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Written document, if any
    pub output_path: Option<String>,
    pub status: FileStatus,
    /// Error message if processing failed
    pub error: Option<String>,
}

impl FileStats {
    /// Stats entry for an input that failed before conversion
    pub fn failed(path: impl Into<String>, error: impl Into<String>, processing_time_ms: u64) -> Self {
        Self {
            path: path.into(),
            chars_processed: 0,
            quotes_before: QuoteTally::default(),
            quotes_after: QuoteTally::default(),
            processing_time_ms,
            output_path: None,
            status: FileStatus::Failed,
            error: Some(error.into()),
        }
    }

    /// Straight quotes turned into curly ones
    pub fn quotes_normalized(&self) -> u64 {
        self.quotes_before.straight_double + self.quotes_before.straight_single
    }
}

/// Aggregate statistics for one CLI run
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RunStats {
    /// Seconds since the Unix epoch when the run started
    pub run_start: u64,
    pub total_processing_time_ms: u64,
    pub files_converted: u64,
    pub files_unchanged: u64,
    pub files_reported: u64,
    pub files_failed: u64,
    pub total_quotes_normalized: u64,
    pub file_stats: Vec<FileStats>,
}

impl RunStats {
    pub fn new(run_start: u64) -> Self {
        Self {
            run_start,
            ..Default::default()
        }
    }

    pub fn record(&mut self, stats: FileStats) {
        match stats.status {
            FileStatus::Converted => self.files_converted += 1,
            FileStatus::Unchanged => self.files_unchanged += 1,
            FileStatus::Reported => self.files_reported += 1,
            FileStatus::Failed => self.files_failed += 1,
        }
        if stats.status == FileStatus::Converted {
            self.total_quotes_normalized += stats.quotes_normalized();
        }
        self.file_stats.push(stats);
    }
}

/// Write run statistics as pretty JSON
pub async fn write_stats_file(path: &Path, stats: &RunStats) -> Result<()> {
    let content = serde_json::to_string_pretty(stats)?;
    tokio::fs::write(path, content)
        .await
        .with_context(|| format!("Failed to write stats file {}", path.display()))?;
    Ok(())
}
