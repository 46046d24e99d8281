//! Attestation status list.

use std::collections::HashMap;

use color_eyre::eyre::WrapErr as _;
use keybox_core::SerialNumber;

/// Status of a listed certificate.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryStatus {
    Revoked,
    Suspended,
    #[serde(other)]
    Other,
}

/// Why a certificate was listed.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RevocationReason {
    Unspecified,
    KeyCompromise,
    CaCompromise,
    Superseded,
    SoftwareFlaw,
    #[serde(other)]
    Other,
}

/// One entry of the status list. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RevocationEntry {
    #[serde(default)]
    pub status: Option<EntryStatus>,
    #[serde(default)]
    pub reason: Option<RevocationReason>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub expires: Option<String>,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revoked => "REVOKED",
            Self::Suspended => "SUSPENDED",
            Self::Other => "OTHER",
        }
    }
}

impl RevocationReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unspecified => "UNSPECIFIED",
            Self::KeyCompromise => "KEY_COMPROMISE",
            Self::CaCompromise => "CA_COMPROMISE",
            Self::Superseded => "SUPERSEDED",
            Self::SoftwareFlaw => "SOFTWARE_FLAW",
            Self::Other => "OTHER",
        }
    }
}

#[derive(serde::Deserialize)]
struct RawList {
    entries: HashMap<String, RevocationEntry>,
}

/// Revoked and suspended certificate serials.
#[derive(Debug, Clone, Default)]
pub struct RevocationList {
    entries: HashMap<SerialNumber, RevocationEntry>,
}

impl RevocationList {
    /// Parse the JSON status document.
    ///
    /// The document must carry an `entries` object. Keys that are not hex
    /// serials are skipped.
    pub fn from_json(bytes: &[u8]) -> color_eyre::eyre::Result<Self> {
        let raw: RawList =
            serde_json::from_slice(bytes).wrap_err("failed to parse status list JSON")?;

        let mut entries = HashMap::with_capacity(raw.entries.len());
        for (key, entry) in raw.entries {
            match SerialNumber::parse(&key) {
                Ok(serial) => {
                    entries.insert(serial, entry);
                }
                Err(e) => tracing::warn!(key = %key, error = %e, "skipping status list entry"),
            }
        }

        Ok(Self { entries })
    }

    /// Build a list from parsed entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (SerialNumber, RevocationEntry)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Entry for a serial, if listed.
    pub fn lookup(&self, serial: &SerialNumber) -> Option<&RevocationEntry> {
        self.entries.get(serial)
    }

    /// A listed serial counts as revoked whatever its status.
    pub fn is_revoked(&self, serial: &SerialNumber) -> bool {
        self.entries.contains_key(serial)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
