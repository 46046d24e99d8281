//! Per-file results and summary counters.

use std::path::PathBuf;

use crate::Verdict;

/// Result of checking a single keybox file.
#[derive(Debug, Clone, serde::Serialize)]
pub struct FileReport {
    /// File name within the scanned directory.
    pub file_name: String,
    /// Full path the file was read from.
    pub path: PathBuf,
    /// `DeviceID` of the keybox, when it parsed.
    pub device_id: Option<String>,
    pub verdict: Verdict,
    /// Where the file was moved, if it was.
    pub moved_to: Option<PathBuf>,
}

/// Aggregate counts over a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct Summary {
    pub total: usize,
    pub valid: usize,
    pub revoked: usize,
    pub invalid: usize,
}

impl Summary {
    /// Count one verdict.
    pub fn record(&mut self, verdict: &Verdict) {
        self.total += 1;
        match verdict {
            Verdict::Valid { .. } => self.valid += 1,
            Verdict::Revoked { .. } => self.revoked += 1,
            Verdict::Invalid { .. } => self.invalid += 1,
        }
    }
}
