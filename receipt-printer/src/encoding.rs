//! Code page utilities for Western thermal printers
//!
//! Epson-compatible printers ship with the WPC1252 code page (`ESC t 16`).
//! This module provides utilities for:
//! - Converting UTF-8 text to Windows-1252 bytes
//! - Truncating/padding strings to a column width

use tracing::instrument;

/// ESC/POS code page number of WPC1252
pub const CODE_PAGE_WPC1252: u8 = 16;

/// Byte printed in place of characters that have no WPC1252 mapping
const REPLACEMENT: u8 = b'?';

/// Convert UTF-8 text to Windows-1252
///
/// Characters are converted one at a time so that an unmappable character
/// becomes a single `?` instead of an HTML numeric reference.
#[instrument(skip(s), fields(len = s.len()))]
pub fn encode_cp1252(s: &str) -> Vec<u8> {
    let mut result = Vec::with_capacity(s.len());
    let mut buf = [0u8; 4];

    for c in s.chars() {
        if c.is_ascii() {
            result.push(c as u8);
            continue;
        }

        let (bytes, _, had_errors) = encoding_rs::WINDOWS_1252.encode(c.encode_utf8(&mut buf));
        if had_errors {
            result.push(REPLACEMENT);
        } else {
            result.extend_from_slice(&bytes);
        }
    }

    result
}

/// Column width of a string (one column per character)
pub fn text_width(s: &str) -> usize {
    s.chars().count()
}

/// Truncate a string to at most `max_width` characters
pub fn truncate_width(s: &str, max_width: usize) -> String {
    s.chars().take(max_width).collect()
}

/// Pad a string to a specific column width
///
/// If the string is longer than the width, it will be truncated.
pub fn pad_width(s: &str, width: usize, align_right: bool) -> String {
    let current_width = text_width(s);
    if current_width >= width {
        return truncate_width(s, width);
    }
    let spaces = width - current_width;
    if align_right {
        format!("{}{}", " ".repeat(spaces), s)
    } else {
        format!("{}{}", s, " ".repeat(spaces))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_ascii_passthrough() {
        assert_eq!(encode_cp1252("Hello\n"), b"Hello\n".to_vec());
    }

    #[test]
    fn test_encode_latin() {
        assert_eq!(encode_cp1252("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_cp1252("€5"), vec![0x80, b'5']);
    }

    #[test]
    fn test_encode_unmappable() {
        assert_eq!(encode_cp1252("a你b"), b"a?b".to_vec());
        assert_eq!(encode_cp1252("🦀"), b"?".to_vec());
    }

    #[test]
    fn test_truncate_width() {
        assert_eq!(truncate_width("hello world", 5), "hello");
        assert_eq!(truncate_width("ñandú", 3), "ñan");
        assert_eq!(truncate_width("hi", 5), "hi");
    }

    #[test]
    fn test_pad_width() {
        assert_eq!(pad_width("hi", 5, false), "hi   ");
        assert_eq!(pad_width("hi", 5, true), "   hi");
        assert_eq!(pad_width("hello world", 5, false), "hello");
        assert_eq!(pad_width("año", 4, false), "año ");
    }
}
