//! Keybox XML extraction.
//!
//! A keybox file looks like:
//!
//! ```xml
//! <AndroidAttestation>
//!   <Keybox DeviceID="...">
//!     <Key algorithm="ecdsa">
//!       <PrivateKey format="pem">...</PrivateKey>
//!       <CertificateChain>
//!         <Certificate format="pem">...</Certificate>
//!       </CertificateChain>
//!     </Key>
//!     <Key algorithm="rsa">...</Key>
//!   </Keybox>
//! </AndroidAttestation>
//! ```

use quick_xml::events::Event;

/// Minimum number of certificates a keybox must carry.
pub const MIN_CERTIFICATES: usize = 4;

/// Position of the EC leaf certificate.
pub const EC_LEAF_INDEX: usize = 0;

/// Position of the RSA leaf certificate.
pub const RSA_LEAF_INDEX: usize = 3;

/// Errors from keybox parsing.
#[derive(Debug, thiserror::Error)]
pub enum KeyboxError {
    #[error("malformed XML at byte {position}: {message}")]
    Malformed { position: u64, message: String },
    #[error("cannot decode document as {encoding}")]
    Encoding { encoding: &'static str },
}

/// A certificate embedded in a keybox.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CertificateEntry {
    /// `algorithm` attribute of the enclosing `Key` element.
    pub algorithm: Option<String>,
    /// Raw element text, usually an indented PEM block.
    pub text: String,
}

/// Parsed content of a keybox file.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Keybox {
    /// `DeviceID` attribute of the first `Keybox` element.
    pub device_id: Option<String>,
    /// Every `Certificate` element in document order.
    pub certificates: Vec<CertificateEntry>,
}

impl Keybox {
    /// Parse keybox XML.
    ///
    /// Any well-formed document is accepted; one without `Certificate`
    /// elements simply yields no certificates.
    pub fn parse(xml: &str) -> Result<Self, KeyboxError> {
        let mut reader = quick_xml::Reader::from_str(xml);

        let mut keybox = Keybox::default();
        let mut depth = 0usize;
        let mut saw_root = false;
        let mut saw_keybox = false;
        let mut key_algorithm: Option<String> = None;
        // (depth of the Certificate element, algorithm, accumulated text)
        let mut current: Option<(usize, Option<String>, String)> = None;

        loop {
            let position = reader.buffer_position();
            let event = reader
                .read_event()
                .map_err(|e| malformed(reader.error_position(), e))?;

            let is_empty = matches!(event, Event::Empty(_));
            match event {
                Event::Start(ref e) | Event::Empty(ref e) => {
                    if depth == 0 && saw_root {
                        return Err(malformed(position, "junk after document element"));
                    }
                    saw_root = true;

                    match e.local_name().as_ref() {
                        b"Keybox" if !saw_keybox => {
                            saw_keybox = true;
                            keybox.device_id = attribute(e, "DeviceID", position)?;
                        }
                        b"Key" if !is_empty => {
                            key_algorithm = attribute(e, "algorithm", position)?;
                        }
                        b"Certificate" if current.is_none() => {
                            if is_empty {
                                keybox.certificates.push(CertificateEntry {
                                    algorithm: key_algorithm.clone(),
                                    text: String::new(),
                                });
                            } else {
                                current = Some((depth, key_algorithm.clone(), String::new()));
                            }
                        }
                        _ => {}
                    }

                    if !is_empty {
                        depth += 1;
                    }
                }
                Event::End(ref e) => {
                    depth = depth
                        .checked_sub(1)
                        .ok_or_else(|| malformed(position, "unexpected closing tag"))?;

                    if current.as_ref().is_some_and(|(d, _, _)| *d == depth) {
                        if let Some((_, algorithm, text)) = current.take() {
                            keybox.certificates.push(CertificateEntry { algorithm, text });
                        }
                    } else if e.local_name().as_ref() == b"Key" {
                        key_algorithm = None;
                    }
                }
                Event::Text(e) => {
                    let text = e.unescape().map_err(|err| malformed(position, err))?;
                    if depth == 0 && !text.trim().is_empty() {
                        return Err(malformed(position, "text outside of document element"));
                    }
                    if let Some((_, _, buf)) = current.as_mut() {
                        buf.push_str(&text);
                    }
                }
                Event::CData(e) => {
                    if let Some((_, _, buf)) = current.as_mut() {
                        buf.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_root {
            return Err(malformed(reader.buffer_position(), "no element found"));
        }
        if depth != 0 {
            return Err(malformed(reader.buffer_position(), "unclosed element"));
        }

        Ok(keybox)
    }

    /// Parse keybox XML from raw file bytes, honoring a byte order mark or
    /// the declared `encoding`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyboxError> {
        let xml = crate::decode_document(bytes)?;
        Self::parse(&xml)
    }

    /// The EC and RSA leaf certificates, by position.
    pub fn leaf_pair(&self) -> Option<(&CertificateEntry, &CertificateEntry)> {
        if self.certificates.len() < MIN_CERTIFICATES {
            return None;
        }
        Some((
            &self.certificates[EC_LEAF_INDEX],
            &self.certificates[RSA_LEAF_INDEX],
        ))
    }
}

fn attribute(
    element: &quick_xml::events::BytesStart<'_>,
    name: &str,
    position: u64,
) -> Result<Option<String>, KeyboxError> {
    let attr = element
        .try_get_attribute(name)
        .map_err(|e| malformed(position, e))?;

    attr.map(|a| {
        a.unescape_value()
            .map(|v| v.into_owned())
            .map_err(|e| malformed(position, e))
    })
    .transpose()
}

fn malformed(position: u64, message: impl std::fmt::Display) -> KeyboxError {
    KeyboxError::Malformed {
        position,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = include_str!("../../../../testdata/keybox.xml");

    #[test]
    fn test_parse_sample_keybox() {
        let keybox = Keybox::parse(SAMPLE).unwrap();
        assert_eq!(keybox.device_id.as_deref(), Some("test-device-01"));
        assert_eq!(keybox.certificates.len(), 6);
        assert_eq!(keybox.certificates[0].algorithm.as_deref(), Some("ecdsa"));
        assert_eq!(keybox.certificates[3].algorithm.as_deref(), Some("rsa"));
        assert!(keybox.certificates[0].text.contains("BEGIN CERTIFICATE"));
    }

    #[test]
    fn test_leaf_pair_positions() {
        let keybox = Keybox::parse(SAMPLE).unwrap();
        let (ec, rsa) = keybox.leaf_pair().unwrap();
        assert_eq!(ec, &keybox.certificates[0]);
        assert_eq!(rsa, &keybox.certificates[3]);
    }

    #[test]
    fn test_too_few_certificates() {
        let xml = "<Keybox><Key algorithm=\"ecdsa\">\
                   <Certificate>a</Certificate><Certificate>b</Certificate>\
                   <Certificate>c</Certificate></Key></Keybox>";
        let keybox = Keybox::parse(xml).unwrap();
        assert_eq!(keybox.certificates.len(), 3);
        assert!(keybox.leaf_pair().is_none());
    }

    #[test]
    fn test_no_certificates_is_not_an_error() {
        let keybox = Keybox::parse("<AndroidAttestation/>").unwrap();
        assert!(keybox.certificates.is_empty());
        assert!(keybox.device_id.is_none());
    }

    #[test]
    fn test_text_is_unescaped() {
        let xml = "<r><Certificate>a&amp;b</Certificate><Certificate><![CDATA[<c>]]></Certificate></r>";
        let keybox = Keybox::parse(xml).unwrap();
        assert_eq!(keybox.certificates[0].text, "a&b");
        assert_eq!(keybox.certificates[1].text, "<c>");
        assert!(keybox.certificates[0].algorithm.is_none());
    }

    #[test]
    fn test_namespaced_certificate() {
        let xml = "<k:r xmlns:k=\"urn:x\"><k:Certificate>abc</k:Certificate></k:r>";
        let keybox = Keybox::parse(xml).unwrap();
        assert_eq!(keybox.certificates.len(), 1);
        assert_eq!(keybox.certificates[0].text, "abc");
    }

    #[test]
    fn test_device_id_from_first_keybox_only() {
        let xml = "<r><Keybox/><Keybox DeviceID=\"second\"/></r>";
        let keybox = Keybox::parse(xml).unwrap();
        assert!(keybox.device_id.is_none());

        let xml = "<r><Keybox DeviceID=\"first\"/><Keybox DeviceID=\"second\"/></r>";
        let keybox = Keybox::parse(xml).unwrap();
        assert_eq!(keybox.device_id.as_deref(), Some("first"));
    }

    #[test]
    fn test_from_bytes_latin1() {
        let mut xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?>\n<r><Keybox DeviceID=\"caf".to_vec();
        xml.push(0xe9);
        xml.extend_from_slice(b"\"/></r>");

        let keybox = Keybox::from_bytes(&xml).unwrap();
        assert_eq!(keybox.device_id.as_deref(), Some("caf\u{e9}"));
    }

    #[test]
    fn test_empty_certificate_element() {
        let keybox = Keybox::parse("<r><Certificate/></r>").unwrap();
        assert_eq!(keybox.certificates.len(), 1);
        assert!(keybox.certificates[0].text.is_empty());
    }

    #[test]
    fn test_malformed_documents() {
        for xml in [
            "",
            "not xml at all",
            "<r><Certificate>x</r>",
            "<r><Certificate>x</Certificate>",
            "<a/><b/>",
        ] {
            assert!(
                matches!(Keybox::parse(xml), Err(KeyboxError::Malformed { .. })),
                "expected malformed: {xml:?}"
            );
        }
    }
}
