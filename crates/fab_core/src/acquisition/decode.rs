//! UTF-8 decoding of selected file bytes.
//!
//! A leading byte-order mark is always stripped, matching the browser's
//! `TextDecoder("utf-8")` and `Blob.text()`.

use std::borrow::Cow;

use super::errors::{AcquisitionResult, FileAcquisitionError};
use crate::models::DecodeStrategy;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Remove a leading UTF-8 byte-order mark.
pub fn strip_bom(bytes: &[u8]) -> &[u8] {
    bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes)
}

/// Decode raw file bytes according to `strategy`.
///
/// `NativeText` decodes lossily here; it only differs from `Utf8Lossy`
/// in who reads the file.
pub fn decode_bytes(
    file_name: &str,
    bytes: &[u8],
    strategy: DecodeStrategy,
) -> AcquisitionResult<String> {
    let bytes = strip_bom(bytes);
    match strategy {
        DecodeStrategy::Utf8Lossy | DecodeStrategy::NativeText => {
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
        DecodeStrategy::Utf8Strict => std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| FileAcquisitionError::decode_failed(file_name, e.valid_up_to())),
    }
}

/// Strip a BOM left in text produced by a platform reader.
pub fn normalize_text(text: String) -> String {
    match text.strip_prefix('\u{FEFF}') {
        Some(rest) => rest.to_owned(),
        None => text,
    }
}

/// Lossy decode that borrows when the input is already valid.
pub fn decode_lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(strip_bom(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_utf8_is_exact() {
        let text = "première ligne\nsecond line 🎮\n";
        for strategy in [DecodeStrategy::Utf8Lossy, DecodeStrategy::Utf8Strict] {
            assert_eq!(decode_bytes("a.txt", text.as_bytes(), strategy).unwrap(), text);
        }
    }

    #[test]
    fn lossy_substitutes_invalid_sequences() {
        let bytes = [b'o', b'k', 0xFF, b'!', 0xC3];
        let text = decode_bytes("a.bin", &bytes, DecodeStrategy::Utf8Lossy).unwrap();
        assert_eq!(text, "ok\u{FFFD}!\u{FFFD}");
    }

    #[test]
    fn strict_rejects_invalid_sequences() {
        let bytes = [b'o', b'k', 0xFF];
        let err = decode_bytes("a.bin", &bytes, DecodeStrategy::Utf8Strict).unwrap_err();
        assert_eq!(err, FileAcquisitionError::decode_failed("a.bin", 2));
    }

    #[test]
    fn bom_is_stripped() {
        let bytes = [0xEF, 0xBB, 0xBF, b'h', b'i'];
        assert_eq!(decode_bytes("b.txt", &bytes, DecodeStrategy::Utf8Strict).unwrap(), "hi");
        assert_eq!(decode_lossy(&bytes), "hi");
        assert_eq!(normalize_text("\u{FEFF}hi".to_string()), "hi");
        // Only the leading mark goes
        assert_eq!(normalize_text("h\u{FEFF}i".to_string()), "h\u{FEFF}i");
    }

    #[test]
    fn empty_file_decodes_to_empty_string() {
        assert_eq!(decode_bytes("e.txt", &[], DecodeStrategy::Utf8Strict).unwrap(), "");
    }
}
