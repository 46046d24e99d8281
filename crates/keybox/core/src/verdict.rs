//! Per-keybox verdicts.

use crate::SerialNumber;

/// Serials of the two leaf certificates.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct LeafSerials {
    /// EC leaf certificate serial.
    pub ec: SerialNumber,
    /// RSA leaf certificate serial.
    pub rsa: SerialNumber,
}

impl LeafSerials {
    /// Both serials, EC first.
    pub fn iter(&self) -> impl Iterator<Item = &SerialNumber> {
        [&self.ec, &self.rsa].into_iter()
    }
}

/// A leaf serial found on the status list.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RevokedSerial {
    pub serial: SerialNumber,
    pub status: Option<String>,
    pub reason: Option<String>,
}

/// Why a keybox could not be judged.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum InvalidReason {
    /// The file could not be read.
    Unreadable(String),
    /// The file is not well-formed XML.
    Malformed(String),
    /// Fewer certificates than a keybox needs.
    NotEnoughCertificates { found: usize },
    /// A leaf certificate could not be parsed.
    CertificateParse(String),
}

impl InvalidReason {
    /// Short human-readable reason.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Unreadable(_) => "Could not be read.",
            Self::Malformed(_) => "Could not be parsed as XML.",
            Self::NotEnoughCertificates { .. } => "Not enough certificate data.",
            Self::CertificateParse(_) => "Certificate parsing failed.",
        }
    }
}

/// Outcome of checking one keybox.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Valid {
        serials: LeafSerials,
    },
    Revoked {
        serials: LeafSerials,
        hits: Vec<RevokedSerial>,
    },
    Invalid {
        reason: InvalidReason,
    },
}

impl Verdict {
    /// Report label. Certificate parse failures show as `ERROR`.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Valid { .. } => "VALID",
            Self::Revoked { .. } => "REVOKED",
            Self::Invalid {
                reason: InvalidReason::CertificateParse(_),
            } => "ERROR",
            Self::Invalid { .. } => "INVALID",
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// Leaf serials, when both certificates parsed.
    pub fn serials(&self) -> Option<&LeafSerials> {
        match self {
            Self::Valid { serials } | Self::Revoked { serials, .. } => Some(serials),
            Self::Invalid { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn serials() -> LeafSerials {
        LeafSerials {
            ec: SerialNumber::parse("a1").unwrap(),
            rsa: SerialNumber::parse("b2").unwrap(),
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(Verdict::Valid { serials: serials() }.label(), "VALID");
        assert_eq!(
            Verdict::Revoked {
                serials: serials(),
                hits: vec![]
            }
            .label(),
            "REVOKED"
        );
        assert_eq!(
            Verdict::Invalid {
                reason: InvalidReason::CertificateParse("bad".into())
            }
            .label(),
            "ERROR"
        );
        assert_eq!(
            Verdict::Invalid {
                reason: InvalidReason::NotEnoughCertificates { found: 2 }
            }
            .label(),
            "INVALID"
        );
    }

    #[test]
    fn test_serials_only_when_parsed() {
        let valid = Verdict::Valid { serials: serials() };
        let ids: Vec<_> = valid.serials().unwrap().iter().map(|s| s.as_str()).collect();
        assert_eq!(ids, ["a1", "b2"]);

        let invalid = Verdict::Invalid {
            reason: InvalidReason::Malformed("eof".into()),
        };
        assert!(invalid.serials().is_none());
        assert!(!invalid.is_valid());
    }
}
