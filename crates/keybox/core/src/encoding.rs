//! Document encoding detection.
//!
//! Order: byte order mark, UTF-16 `<?` sniffing, then the `encoding`
//! pseudo-attribute of the XML declaration. UTF-8 otherwise.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};

use crate::KeyboxError;

/// Bytes searched for the end of the XML declaration.
const DECLARATION_LIMIT: usize = 1024;

/// Decode raw document bytes into text.
pub fn decode_document(bytes: &[u8]) -> Result<Cow<'_, str>, KeyboxError> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (
            sniff_utf16(bytes)
                .or_else(|| declared_encoding(bytes))
                .unwrap_or(UTF_8),
            bytes,
        ),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or(KeyboxError::Encoding {
            encoding: encoding.name(),
        })
}

fn sniff_utf16(bytes: &[u8]) -> Option<&'static Encoding> {
    match bytes.get(..4)? {
        [0x3c, 0x00, 0x3f, 0x00] => Some(UTF_16LE),
        [0x00, 0x3c, 0x00, 0x3f] => Some(UTF_16BE),
        _ => None,
    }
}

fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    if !bytes.starts_with(b"<?xml") {
        return None;
    }

    let head = &bytes[..bytes.len().min(DECLARATION_LIMIT)];
    let decl = &head[..find(head, b"?>")?];
    let rest = &decl[find(decl, b"encoding")? + b"encoding".len()..];

    let rest = rest.trim_ascii_start().strip_prefix(b"=")?.trim_ascii_start();
    let (&quote, rest) = rest.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let label = &rest[..rest.iter().position(|&b| b == quote)?];

    // an ASCII-compatible document cannot really be UTF-16
    Encoding::for_label(label).filter(|e| *e != UTF_16LE && *e != UTF_16BE)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
