//! Byte-to-text decoding for submission files.
//!
//! A byte-order mark selects the encoding: UTF-8 (`EF BB BF`, stripped),
//! UTF-16 LE (`FF FE`) or UTF-16 BE (`FE FF`). Without a BOM the bytes must
//! be strict UTF-8.

use crate::error::DecodeError;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Decodes raw file bytes into a `String`.
///
/// ```rust
/// use ingest::decode_source;
///
/// assert_eq!(decode_source(b"\xEF\xBB\xBFint x;").unwrap(), "int x;");
/// assert_eq!(decode_source(&[0xFF, 0xFE, b'h', 0, b'i', 0]).unwrap(), "hi");
/// assert!(decode_source(&[0x66, 0x80]).is_err());
/// ```
pub fn decode_source(bytes: &[u8]) -> Result<String, DecodeError> {
    if let Some(rest) = bytes.strip_prefix(UTF8_BOM) {
        return decode_utf8(rest);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_LE_BOM) {
        return decode_utf16(rest, u16::from_le_bytes);
    }
    if let Some(rest) = bytes.strip_prefix(UTF16_BE_BOM) {
        return decode_utf16(rest, u16::from_be_bytes);
    }
    decode_utf8(bytes)
}

fn decode_utf8(bytes: &[u8]) -> Result<String, DecodeError> {
    simdutf8::compat::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| DecodeError::InvalidUtf8 {
            valid_up_to: e.valid_up_to(),
        })
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String, DecodeError> {
    if bytes.len() % 2 != 0 {
        return Err(DecodeError::OddUtf16Length { len: bytes.len() });
    }
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));

    let mut out = String::with_capacity(bytes.len() / 2);
    let mut index = 0;
    for decoded in char::decode_utf16(units) {
        match decoded {
            Ok(ch) => {
                index += ch.len_utf16();
                out.push(ch);
            }
            Err(_) => return Err(DecodeError::UnpairedSurrogate { index }),
        }
    }
    Ok(out)
}
