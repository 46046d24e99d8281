//! Directory scanner.

use std::path::{Path, PathBuf};

use color_eyre::eyre::WrapErr as _;
use keybox_core::{
    FileReport, InvalidReason, Keybox, LeafSerials, RevokedSerial, Summary, Verdict,
};
use keybox_revocation::RevocationList;

use crate::ScanOptions;

/// Outcome of scanning a directory.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ScanReport {
    /// Directory that was scanned.
    pub directory: PathBuf,
    /// Where valid keyboxes were moved, when moving was enabled.
    pub destination: Option<PathBuf>,
    /// One entry per examined file, in name order.
    pub files: Vec<FileReport>,
    pub summary: Summary,
}

/// Checks keyboxes against a revocation list.
pub struct Scanner {
    list: RevocationList,
    options: ScanOptions,
}

impl Scanner {
    /// Create a new scanner.
    pub fn new(list: RevocationList, options: ScanOptions) -> Self {
        Self { list, options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Judge a parsed keybox.
    pub fn classify(&self, keybox: &Keybox) -> Verdict {
        let Some((ec, rsa)) = keybox.leaf_pair() else {
            return Verdict::Invalid {
                reason: InvalidReason::NotEnoughCertificates {
                    found: keybox.certificates.len(),
                },
            };
        };

        let serials = match (
            keybox_crypto::certificate_serial(&ec.text),
            keybox_crypto::certificate_serial(&rsa.text),
        ) {
            (Ok(ec), Ok(rsa)) => LeafSerials { ec, rsa },
            (Err(e), _) | (_, Err(e)) => {
                return Verdict::Invalid {
                    reason: InvalidReason::CertificateParse(format!("{e:#}")),
                };
            }
        };

        let hits: Vec<RevokedSerial> = serials
            .iter()
            .filter_map(|serial| {
                self.list.lookup(serial).map(|entry| RevokedSerial {
                    serial: serial.clone(),
                    status: entry.status.as_ref().map(|s| s.as_str().to_string()),
                    reason: entry.reason.as_ref().map(|r| r.as_str().to_string()),
                })
            })
            .collect();

        if hits.is_empty() {
            Verdict::Valid { serials }
        } else {
            Verdict::Revoked { serials, hits }
        }
    }

    /// Read, parse and classify one file. Never moves it.
    pub fn check_file(&self, path: &Path) -> FileReport {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let report = |device_id: Option<String>, verdict: Verdict| FileReport {
            file_name: file_name.clone(),
            path: path.to_path_buf(),
            device_id,
            verdict,
            moved_to: None,
        };

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(file = %file_name, error = %e, "could not be read");
                return report(
                    None,
                    Verdict::Invalid {
                        reason: InvalidReason::Unreadable(e.to_string()),
                    },
                );
            }
        };

        match Keybox::from_bytes(&bytes) {
            Ok(keybox) => {
                let verdict = self.classify(&keybox);
                report(keybox.device_id, verdict)
            }
            Err(e) => {
                tracing::warn!(file = %file_name, "could not be parsed as XML: {}", e);
                report(
                    None,
                    Verdict::Invalid {
                        reason: InvalidReason::Malformed(e.to_string()),
                    },
                )
            }
        }
    }

    /// Check every `.xml` file directly inside `dir`.
    pub fn scan_dir(&self, dir: &Path) -> color_eyre::eyre::Result<ScanReport> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)
            .wrap_err_with(|| format!("failed to list {}", dir.display()))?
        {
            let entry = entry.wrap_err_with(|| format!("failed to list {}", dir.display()))?;
            let path = entry.path();
            if is_keybox_candidate(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        let destination = if self.options.move_valid {
            let destination = dir.join(&self.options.destination_dir);
            std::fs::create_dir_all(&destination)
                .wrap_err_with(|| format!("failed to create {}", destination.display()))?;
            Some(destination)
        } else {
            None
        };

        let mut summary = Summary::default();
        let mut files = Vec::with_capacity(paths.len());

        for path in paths {
            let mut report = self.check_file(&path);
            summary.record(&report.verdict);
            tracing::debug!(file = %report.file_name, verdict = report.verdict.label(), "checked");

            if report.verdict.is_valid()
                && let Some(destination) = destination.as_ref()
            {
                let target = destination.join(&report.file_name);
                match std::fs::rename(&path, &target) {
                    Ok(()) => {
                        tracing::info!(file = %report.file_name, to = %target.display(), "moved valid keybox");
                        report.moved_to = Some(target);
                    }
                    Err(e) => {
                        tracing::error!(file = %report.file_name, error = %e, "failed to move valid keybox");
                    }
                }
            }

            files.push(report);
        }

        Ok(ScanReport {
            directory: dir.to_path_buf(),
            destination,
            files,
            summary,
        })
    }
}

/// Regular files (following symlinks) whose name ends in `.xml`, any case.
fn is_keybox_candidate(path: &Path) -> bool {
    let is_xml = path
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase().ends_with(".xml"))
        .unwrap_or(false);

    is_xml && std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}
