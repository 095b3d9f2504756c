//! Windows-1252 and UTF-16 text conversion.
//!
//! Word stores "compressed" text pieces as cp1252 bytes and the others as
//! UTF-16LE. The standard PDF fonts are written with WinAnsiEncoding, which is
//! the cp1252 table.

use encoding_rs::{EncoderResult, UTF_16LE, WINDOWS_1252};
use unicode_normalization::UnicodeNormalization;

/// Decode a cp1252 byte string.
pub fn decode(bytes: &[u8]) -> String {
    WINDOWS_1252
        .decode_without_bom_handling(bytes)
        .0
        .into_owned()
}

/// Decode UTF-16LE code units; unpaired surrogates become U+FFFD.
pub fn decode_utf16le(bytes: &[u8]) -> String {
    UTF_16LE.decode_without_bom_handling(bytes).0.into_owned()
}

/// Encode one printable character, if cp1252 has it.
pub fn encode_char(ch: char) -> Option<u8> {
    if ch.is_control() {
        return None;
    }
    let mut utf8 = [0u8; 4];
    let mut out = [0u8; 4];
    let mut encoder = WINDOWS_1252.new_encoder();
    let (result, _, written) =
        encoder.encode_from_utf8_without_replacement(ch.encode_utf8(&mut utf8), &mut out, true);
    match (result, written) {
        (EncoderResult::InputEmpty, 1) => Some(out[0]),
        _ => None,
    }
}

/// Encode text for a WinAnsi font.
///
/// Text is NFC-normalized first so decomposed accents still find their
/// precomposed glyph. Tabs become a space; control characters and anything
/// cp1252 lacks become `?`. Returns the bytes and the number of replaced
/// characters.
pub fn encode_lossy(text: &str) -> (Vec<u8>, usize) {
    let mut replaced = 0;
    let normalized: String = text
        .nfc()
        .map(|ch| match ch {
            '\t' => ' ',
            c if c.is_control() => {
                replaced += 1;
                '?'
            }
            c => c,
        })
        .collect();

    let mut encoder = WINDOWS_1252.new_encoder();
    let mut bytes = Vec::with_capacity(normalized.len());
    let mut buffer = [0u8; 256];
    let mut input = normalized.as_str();
    loop {
        let (result, read, written) =
            encoder.encode_from_utf8_without_replacement(input, &mut buffer, true);
        bytes.extend_from_slice(&buffer[..written]);
        input = &input[read..];
        match result {
            EncoderResult::InputEmpty => break,
            EncoderResult::OutputFull => {}
            EncoderResult::Unmappable(_) => {
                replaced += 1;
                bytes.push(b'?');
            }
        }
    }
    (bytes, replaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ascii_and_latin1() {
        assert_eq!(decode(b"Hello"), "Hello");
        assert_eq!(decode(&[0x48, 0xE9]), "Hé");
    }

    #[test]
    fn test_decode_high_range() {
        assert_eq!(decode(&[0x80, 0x93, 0x94]), "€\u{201C}\u{201D}");
    }

    #[test]
    fn test_decode_utf16le() {
        assert_eq!(decode_utf16le(&[0x41, 0x00, 0x22, 0x6F]), "A\u{6F22}");
        // Lone high surrogate
        assert_eq!(decode_utf16le(&[0x3D, 0xD8]), "\u{FFFD}");
    }

    #[test]
    fn test_encode_char() {
        assert_eq!(encode_char('€'), Some(0x80));
        assert_eq!(encode_char('—'), Some(0x97));
        assert_eq!(encode_char('ÿ'), Some(0xFF));
        assert_eq!(encode_char('漢'), None);
        assert_eq!(encode_char('\r'), None);
    }

    #[test]
    fn test_encode_lossy_normalizes() {
        // "e" followed by a combining acute accent
        let (bytes, replaced) = encode_lossy("Caf\u{0065}\u{0301}");
        assert_eq!(bytes, vec![b'C', b'a', b'f', 0xE9]);
        assert_eq!(replaced, 0);
    }

    #[test]
    fn test_encode_lossy_replaces_unknown() {
        let (bytes, replaced) = encode_lossy("a\tb漢\u{7}c");
        assert_eq!(bytes, b"a b??c".to_vec());
        assert_eq!(replaced, 2);
    }

    #[test]
    fn test_encode_lossy_long_input() {
        let text = "\u{201C}é\u{201D}".repeat(200);
        let (bytes, replaced) = encode_lossy(&text);
        assert_eq!(bytes.len(), 600);
        assert_eq!(&bytes[..3], &[0x93, 0xE9, 0x94]);
        assert_eq!(replaced, 0);
    }
}
