//! Certificate utilities.

use color_eyre::eyre::WrapErr as _;
use keybox_core::SerialNumber;
use x509_parser::prelude::*;

/// Normalize an indented PEM block.
///
/// Keybox files indent certificate text to match the XML nesting; PEM
/// decoders expect every line to start at column zero.
pub fn normalize_pem(text: &str) -> String {
    text.trim()
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a certificate from PEM format.
pub fn parse_pem_cert(pem_str: &str) -> color_eyre::eyre::Result<Vec<u8>> {
    let pem_data =
        ::pem::parse(pem_str).map_err(|e| color_eyre::eyre::eyre!("failed to parse PEM: {}", e))?;

    if pem_data.tag() != "CERTIFICATE" {
        color_eyre::eyre::bail!("PEM is not a certificate, got: {}", pem_data.tag());
    }

    Ok(pem_data.into_contents())
}

/// Decode certificate text from a keybox into DER.
///
/// Armored PEM is the norm; a bare base64 body without `-----BEGIN` lines is
/// also accepted.
pub fn decode_certificate(text: &str) -> color_eyre::eyre::Result<Vec<u8>> {
    let normalized = normalize_pem(text);
    if normalized.is_empty() {
        color_eyre::eyre::bail!("certificate text is empty");
    }

    if normalized.contains("-----BEGIN") {
        return parse_pem_cert(&normalized);
    }

    let b64: String = normalized.split_whitespace().collect();

    use base64::Engine as _;
    base64::engine::general_purpose::STANDARD
        .decode(b64)
        .wrap_err("failed to decode base64 certificate")
}

/// Extract the serial number from a DER certificate.
pub fn serial_from_der(cert_der: &[u8]) -> color_eyre::eyre::Result<SerialNumber> {
    let (rest, cert) =
        X509Certificate::from_der(cert_der).wrap_err("failed to parse certificate DER")?;

    if !rest.is_empty() {
        color_eyre::eyre::bail!("{} trailing bytes after certificate", rest.len());
    }

    Ok(SerialNumber::from_bytes(cert.raw_serial()))
}

/// Decode certificate text and return its serial number.
pub fn certificate_serial(text: &str) -> color_eyre::eyre::Result<SerialNumber> {
    let der = decode_certificate(text)?;
    let serial = serial_from_der(&der)?;
    tracing::trace!(serial = %serial, "parsed certificate");
    Ok(serial)
}
