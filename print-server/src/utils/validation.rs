//! Input decoding and length limits for print payloads

use crate::utils::{AppError, AppResult};

/// Maximum decoded length of a text payload, in characters
pub const MAX_TEXT_LEN: usize = 2000;

/// Percent-decode a query value
///
/// Only `%XX` escapes are decoded; `+` stays a plus sign. Byte sequences
/// that are not valid UTF-8 after decoding become U+FFFD.
pub fn decode_text(raw: &str) -> String {
    let bytes = urlencoding::decode_binary(raw.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Reject text longer than [`MAX_TEXT_LEN`] characters
pub fn validate_text_len(text: &str) -> AppResult<()> {
    let len = text.chars().count();
    if len > MAX_TEXT_LEN {
        return Err(AppError::PayloadTooLarge {
            len,
            max: MAX_TEXT_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text() {
        assert_eq!(decode_text("Hello%20World"), "Hello World");
        assert_eq!(decode_text("a+b"), "a+b");
        assert_eq!(decode_text("caf%C3%A9"), "café");
        assert_eq!(decode_text("100%"), "100%");
        assert_eq!(decode_text("%FF"), "\u{FFFD}");
    }

    #[test]
    fn test_length_boundary() {
        assert!(validate_text_len(&"a".repeat(2000)).is_ok());
        assert!(matches!(
            validate_text_len(&"a".repeat(2001)),
            Err(AppError::PayloadTooLarge { len: 2001, max: 2000 })
        ));
        // Counted in characters, not bytes
        assert!(validate_text_len(&"é".repeat(2000)).is_ok());
    }
}
