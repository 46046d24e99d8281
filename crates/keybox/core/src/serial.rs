//! Certificate serial numbers.

/// A certificate serial number in its canonical text form.
///
/// Canonical form is lowercase hex with no leading zeros (`"0"` for zero),
/// which is how the attestation status list keys its entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(transparent)]
pub struct SerialNumber(String);

/// Error returned when text is not a hex serial.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid serial number: {0:?}")]
pub struct InvalidSerial(pub String);

impl SerialNumber {
    /// Build a serial from big-endian bytes (e.g. a DER INTEGER body).
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
        Self::canonical(&hex)
    }

    /// Parse a hex serial, accepting either case, an optional `0x` prefix and
    /// leading zeros.
    pub fn parse(text: &str) -> Result<Self, InvalidSerial> {
        let trimmed = text.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(InvalidSerial(text.to_string()));
        }

        Ok(Self::canonical(&digits.to_ascii_lowercase()))
    }

    /// The canonical hex text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn canonical(hex: &str) -> Self {
        let stripped = hex.trim_start_matches('0');
        if stripped.is_empty() {
            Self("0".to_string())
        } else {
            Self(stripped.to_string())
        }
    }
}

impl std::fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for SerialNumber {
    type Err = InvalidSerial;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> serde::Deserialize<'de> for SerialNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_strips_der_padding() {
        // DER prepends 0x00 when the high bit is set
        let serial = SerialNumber::from_bytes(&[0x00, 0xa1, 0xb2, 0xc3]);
        assert_eq!(serial.as_str(), "a1b2c3");

        let serial = SerialNumber::from_bytes(&[0x0b, 0xad, 0xc0, 0xff, 0xee]);
        assert_eq!(serial.as_str(), "badc0ffee");
    }

    #[test]
    fn test_zero_serial() {
        assert_eq!(SerialNumber::from_bytes(&[0x00]).as_str(), "0");
        assert_eq!(SerialNumber::from_bytes(&[]).as_str(), "0");
        assert_eq!(SerialNumber::parse("000").unwrap().as_str(), "0");
    }

    #[test]
    fn test_parse_normalizes() {
        let a = SerialNumber::parse("0x00BADC0FFEE").unwrap();
        let b: SerialNumber = "badc0ffee".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "badc0ffee");
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        assert!(SerialNumber::parse("").is_err());
        assert!(SerialNumber::parse("0x").is_err());
        assert!(SerialNumber::parse("not-a-serial").is_err());
    }
}
