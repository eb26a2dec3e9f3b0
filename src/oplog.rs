//! Persistent operation log, one JSON object per line.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::pipeline::Report;
use crate::utils;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failed,
}

/// One line of the operation log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub operation: String,
    pub file: String,
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_reduction_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogEntry {
    pub fn success(report: &Report) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            operation: report.name().to_string(),
            file: report.input.display().to_string(),
            status: Status::Success,
            original_size: Some(report.original_size),
            final_size: Some(report.final_size),
            elapsed_ms: Some(report.elapsed.as_millis() as u64),
            compression_ratio: report.compression_ratio(),
            size_reduction_percent: report.size_reduction_percent(),
            error: None,
        }
    }

    pub fn failure(operation: &str, file: &Path, error: &Error) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            operation: operation.to_string(),
            file: file.display().to_string(),
            status: Status::Failed,
            original_size: None,
            final_size: None,
            elapsed_ms: None,
            compression_ratio: None,
            size_reduction_percent: None,
            error: Some(error.to_string()),
        }
    }

    /// Multi-line human readable rendering.
    pub fn render(&self) -> String {
        let rule = "=".repeat(80);
        let mut lines = vec![rule.clone()];
        match self.status {
            Status::Success => lines.push(format!("OPERATION: {}", self.operation)),
            Status::Failed => lines.push(format!("FAILED OPERATION: {}", self.operation)),
        }
        lines.push(format!("Date: {}", utils::display_timestamp(&self.timestamp)));
        lines.push(format!("File: {}", self.file));
        if let Some(size) = self.original_size {
            lines.push(format!("Original size: {}", utils::format_bytes(size)));
        }
        if let Some(size) = self.final_size {
            lines.push(format!("Final size: {}", utils::format_bytes(size)));
        }
        if let Some(ms) = self.elapsed_ms {
            lines.push(format!("Elapsed: {ms} ms ({:.3} s)", ms as f64 / 1000.0));
        }
        if let Some(ratio) = self.compression_ratio {
            lines.push(format!("Compression ratio: {ratio:.2}:1"));
        }
        if let Some(pct) = self.size_reduction_percent {
            lines.push(format!("Size reduction: {pct:.2}%"));
        }
        if let Some(error) = &self.error {
            lines.push(format!("Error: {error}"));
        }
        lines.push(format!(
            "Status: {}",
            match self.status {
                Status::Success => "SUCCESS",
                Status::Failed => "FAILED",
            }
        ));
        lines.push(rule);
        lines.join("\n")
    }
}

/// Append-only JSON-lines log of file operations.
#[derive(Debug, Clone)]
pub struct OperationLog {
    path: PathBuf,
}

impl OperationLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, entry: &LogEntry) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(entry)?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{json}")
    }

    pub fn record_success(&self, report: &Report) -> io::Result<()> {
        self.append(&LogEntry::success(report))
    }

    pub fn record_failure(&self, operation: &str, file: &Path, error: &Error) -> io::Result<()> {
        self.append(&LogEntry::failure(operation, file, error))
    }

    /// All entries, oldest first. A missing log file reads as empty.
    pub fn entries(&self) -> io::Result<Vec<LogEntry>> {
        let file = match fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        let mut entries = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            entries.push(serde_json::from_str(&line)?);
        }
        Ok(entries)
    }
}
