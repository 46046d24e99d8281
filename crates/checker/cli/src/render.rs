//! Terminal report.

use std::io::Write;

use colored::Colorize as _;
use keybox_core::{FileReport, InvalidReason, Summary, Verdict};
use keybox_scan::ScanReport;

const RULE_WIDTH: usize = 40;

/// Write the human-readable report.
pub fn render_report(out: &mut impl Write, report: &ScanReport) -> std::io::Result<()> {
    for file in &report.files {
        render_file(out, file)?;
    }
    render_summary(out, &report.summary)
}

/// Write the JSON report.
pub fn render_json(out: &mut impl Write, report: &ScanReport) -> std::io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)
}

fn render_file(out: &mut impl Write, file: &FileReport) -> std::io::Result<()> {
    let header = format!("[{}] {}", file.verdict.label(), file.file_name);
    let header = match &file.verdict {
        Verdict::Valid { .. } => header.green().bold(),
        Verdict::Revoked { .. } => header.red().bold(),
        Verdict::Invalid {
            reason: InvalidReason::CertificateParse(_),
        } => header.red().bold(),
        Verdict::Invalid { .. } => header.yellow().bold(),
    };

    writeln!(out)?;
    writeln!(out, "{}", header)?;

    match &file.verdict {
        Verdict::Valid { serials } => {
            writeln!(out, "  EC Cert Serial Number: {}", serials.ec)?;
            writeln!(out, "  RSA Cert Serial Number: {}", serials.rsa)?;
        }
        Verdict::Revoked { serials, hits } => {
            writeln!(out, "  EC Cert Serial Number: {}", serials.ec)?;
            writeln!(out, "  RSA Cert Serial Number: {}", serials.rsa)?;
            for hit in hits {
                let status = hit.status.as_deref().unwrap_or("LISTED");
                match hit.reason.as_deref() {
                    Some(reason) => {
                        writeln!(out, "  Revoked serial {}: {} ({})", hit.serial, status, reason)?
                    }
                    None => writeln!(out, "  Revoked serial {}: {}", hit.serial, status)?,
                }
            }
        }
        Verdict::Invalid { reason } => {
            writeln!(out, "  Reason: {}", reason.describe())?;
        }
    }

    Ok(())
}

fn render_summary(out: &mut impl Write, summary: &Summary) -> std::io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);

    writeln!(out)?;
    writeln!(out, "{}", rule)?;
    writeln!(out, "{}", "Summary:".cyan().bold())?;
    writeln!(out, "  Total XML files examined: {}", summary.total)?;
    writeln!(out, "  Valid Certificates: {}", summary.valid)?;
    writeln!(out, "  Revoked Certificates: {}", summary.revoked)?;
    writeln!(out, "  Invalid Keyboxes: {}", summary.invalid)?;
    writeln!(out, "{}", rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use keybox_core::{LeafSerials, RevokedSerial, SerialNumber};
    use std::path::PathBuf;

    fn file(name: &str, verdict: Verdict) -> FileReport {
        FileReport {
            file_name: name.to_string(),
            path: PathBuf::from(name),
            device_id: None,
            verdict,
            moved_to: None,
        }
    }

    fn sample() -> ScanReport {
        let serials = LeafSerials {
            ec: SerialNumber::parse("a1b2").unwrap(),
            rsa: SerialNumber::parse("badc0ffee").unwrap(),
        };
        let files = vec![
            file(
                "good.xml",
                Verdict::Valid {
                    serials: serials.clone(),
                },
            ),
            file(
                "leaked.xml",
                Verdict::Revoked {
                    serials: serials.clone(),
                    hits: vec![RevokedSerial {
                        serial: serials.rsa.clone(),
                        status: Some("REVOKED".into()),
                        reason: Some("KEY_COMPROMISE".into()),
                    }],
                },
            ),
            file(
                "short.xml",
                Verdict::Invalid {
                    reason: InvalidReason::NotEnoughCertificates { found: 1 },
                },
            ),
            file(
                "corrupt.xml",
                Verdict::Invalid {
                    reason: InvalidReason::CertificateParse("bad DER".into()),
                },
            ),
        ];

        let mut summary = Summary::default();
        for f in &files {
            summary.record(&f.verdict);
        }

        ScanReport {
            directory: PathBuf::from("."),
            destination: None,
            files,
            summary,
        }
    }

    #[test]
    fn test_render_plain() {
        colored::control::set_override(false);

        let mut out = Vec::new();
        render_report(&mut out, &sample()).unwrap();
        let text = String::from_utf8(out).unwrap();

        let expected = "\n[VALID] good.xml\n\
                        \x20 EC Cert Serial Number: a1b2\n\
                        \x20 RSA Cert Serial Number: badc0ffee\n\
                        \n[REVOKED] leaked.xml\n\
                        \x20 EC Cert Serial Number: a1b2\n\
                        \x20 RSA Cert Serial Number: badc0ffee\n\
                        \x20 Revoked serial badc0ffee: REVOKED (KEY_COMPROMISE)\n\
                        \n[INVALID] short.xml\n\
                        \x20 Reason: Not enough certificate data.\n\
                        \n[ERROR] corrupt.xml\n\
                        \x20 Reason: Certificate parsing failed.\n\
                        \n========================================\n\
                        Summary:\n\
                        \x20 Total XML files examined: 4\n\
                        \x20 Valid Certificates: 1\n\
                        \x20 Revoked Certificates: 1\n\
                        \x20 Invalid Keyboxes: 2\n\
                        ========================================\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_render_hit_without_status_or_reason() {
        colored::control::set_override(false);

        let serials = LeafSerials {
            ec: SerialNumber::parse("a1b2").unwrap(),
            rsa: SerialNumber::parse("badc0ffee").unwrap(),
        };
        let hit = |status: Option<&str>| RevokedSerial {
            serial: serials.ec.clone(),
            status: status.map(Into::into),
            reason: None,
        };
        let report = ScanReport {
            directory: PathBuf::from("."),
            destination: None,
            files: vec![file(
                "listed.xml",
                Verdict::Revoked {
                    serials: serials.clone(),
                    hits: vec![hit(None), hit(Some("SUSPENDED"))],
                },
            )],
            summary: Summary::default(),
        };

        let mut out = Vec::new();
        render_report(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("  Revoked serial a1b2: LISTED\n"));
        assert!(text.contains("  Revoked serial a1b2: SUSPENDED\n"));
    }

    #[test]
    fn test_render_json() {
        let mut out = Vec::new();
        render_json(&mut out, &sample()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["summary"]["total"], 4);
        assert_eq!(value["files"][0]["verdict"]["verdict"], "valid");
        assert_eq!(value["files"][1]["verdict"]["hits"][0]["serial"], "badc0ffee");
        assert_eq!(
            value["files"][2]["verdict"]["reason"]["kind"],
            "not_enough_certificates"
        );
    }
}
