//! Byte-order-mark sniffing and incremental decoding.

use encoding_rs::{CoderResult, Decoder, Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};
use tracing::warn;

/// Number of leading bytes needed to recognize every supported BOM.
pub const BOM_PREFIX_LEN: usize = 4;

/// A text encoding the scanner can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8.
    Utf8,
    /// UTF-7, decoded through its ASCII-compatible direct characters.
    Utf7,
    /// UTF-16 little endian.
    Utf16Le,
    /// UTF-16 big endian.
    Utf16Be,
    /// UTF-32 little endian.
    Utf32Le,
    /// UTF-32 big endian.
    Utf32Be,
    /// A BOM-less encoding chosen by configuration.
    Fallback(&'static Encoding),
}

impl TextEncoding {
    /// Human-readable name, used in logs.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Utf7 => "UTF-7",
            Self::Utf16Le => "UTF-16LE",
            Self::Utf16Be => "UTF-16BE",
            Self::Utf32Le => "UTF-32LE",
            Self::Utf32Be => "UTF-32BE",
            Self::Fallback(encoding) => encoding.name(),
        }
    }
}

/// The outcome of sniffing a file prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detected {
    /// Encoding of the content.
    pub encoding: TextEncoding,
    /// Length of the BOM to skip.
    pub offset: usize,
}

/// Picks the encoding of a stream from its first bytes.
///
/// Four-byte marks are tried before three-byte marks, which are tried before
/// two-byte marks. Without a mark the `fallback` encoding is used and
/// nothing is skipped.
#[must_use]
pub fn detect(prefix: &[u8], fallback: &'static Encoding) -> Detected {
    let found = |encoding, offset| Detected { encoding, offset };
    match prefix {
        [0xFF, 0xFE, 0x00, 0x00, ..] => found(TextEncoding::Utf32Le, 4),
        [0x00, 0x00, 0xFE, 0xFF, ..] => found(TextEncoding::Utf32Be, 4),
        [0xEF, 0xBB, 0xBF, ..] => found(TextEncoding::Utf8, 3),
        [0x2B, 0x2F, 0x76, ..] => found(TextEncoding::Utf7, 3),
        [0xFE, 0xFF, ..] => found(TextEncoding::Utf16Be, 2),
        [0xFF, 0xFE, ..] => found(TextEncoding::Utf16Le, 2),
        _ => found(TextEncoding::Fallback(fallback), 0),
    }
}

/// Resolves a WHATWG encoding label, falling back to windows-1252.
#[must_use]
pub fn fallback_for_label(label: &str) -> &'static Encoding {
    Encoding::for_label(label.as_bytes()).unwrap_or_else(|| {
        warn!("Unknown encoding label {label:?}, using windows-1252");
        WINDOWS_1252
    })
}

/// A decoder that resumes correctly across arbitrary chunk boundaries.
///
/// Malformed input is replaced with U+FFFD.
pub struct StreamDecoder {
    inner: Inner,
}

enum Inner {
    Whatwg(Decoder),
    Utf32 { big_endian: bool, pending: Vec<u8> },
}

impl std::fmt::Debug for StreamDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.inner {
            Inner::Whatwg(decoder) => decoder.encoding().name(),
            Inner::Utf32 { big_endian: true, .. } => "UTF-32BE",
            Inner::Utf32 { .. } => "UTF-32LE",
        };
        f.debug_struct("StreamDecoder").field("encoding", &kind).finish()
    }
}

impl StreamDecoder {
    /// Creates a decoder for `encoding`. The BOM must already be skipped.
    #[must_use]
    pub fn new(encoding: TextEncoding) -> Self {
        let whatwg = |encoding: &'static Encoding| {
            Inner::Whatwg(encoding.new_decoder_without_bom_handling())
        };
        let inner = match encoding {
            TextEncoding::Utf8 | TextEncoding::Utf7 => whatwg(UTF_8),
            TextEncoding::Utf16Le => whatwg(UTF_16LE),
            TextEncoding::Utf16Be => whatwg(UTF_16BE),
            TextEncoding::Fallback(encoding) => whatwg(encoding),
            TextEncoding::Utf32Le => Inner::Utf32 {
                big_endian: false,
                pending: Vec::with_capacity(4),
            },
            TextEncoding::Utf32Be => Inner::Utf32 {
                big_endian: true,
                pending: Vec::with_capacity(4),
            },
        };
        Self { inner }
    }

    /// Decodes `bytes`, appending the characters to `out`.
    ///
    /// Incomplete sequences at the end of `bytes` are held back until the
    /// next call. Pass `last = true` with the final chunk to flush them.
    pub fn decode(&mut self, bytes: &[u8], last: bool, out: &mut String) {
        match &mut self.inner {
            Inner::Whatwg(decoder) => decode_whatwg(decoder, bytes, last, out),
            Inner::Utf32 {
                big_endian,
                pending,
            } => decode_utf32(*big_endian, pending, bytes, last, out),
        }
    }
}

fn decode_whatwg(decoder: &mut Decoder, mut bytes: &[u8], last: bool, out: &mut String) {
    loop {
        let needed = decoder
            .max_utf8_buffer_length(bytes.len())
            .unwrap_or(bytes.len().saturating_mul(3).saturating_add(16));
        out.reserve(needed);
        let (result, read, _replaced) = decoder.decode_to_string(bytes, out, last);
        bytes = &bytes[read..];
        match result {
            CoderResult::InputEmpty => break,
            CoderResult::OutputFull => continue,
        }
    }
}

fn decode_utf32(
    big_endian: bool,
    pending: &mut Vec<u8>,
    bytes: &[u8],
    last: bool,
    out: &mut String,
) {
    for &byte in bytes {
        pending.push(byte);
        if pending.len() == 4 {
            let unit = [pending[0], pending[1], pending[2], pending[3]];
            let scalar = if big_endian {
                u32::from_be_bytes(unit)
            } else {
                u32::from_le_bytes(unit)
            };
            out.push(char::from_u32(scalar).unwrap_or(char::REPLACEMENT_CHARACTER));
            pending.clear();
        }
    }
    if last && !pending.is_empty() {
        out.push(char::REPLACEMENT_CHARACTER);
        pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_in_chunks(encoding: TextEncoding, bytes: &[u8], chunk: usize) -> String {
        let mut decoder = StreamDecoder::new(encoding);
        let mut out = String::new();
        for piece in bytes.chunks(chunk) {
            decoder.decode(piece, false, &mut out);
        }
        decoder.decode(&[], true, &mut out);
        out
    }

    #[test]
    fn detects_byte_order_marks() {
        let cases: [(&[u8], TextEncoding, usize); 6] = [
            (&[0xFF, 0xFE, 0x00, 0x00], TextEncoding::Utf32Le, 4),
            (&[0x00, 0x00, 0xFE, 0xFF], TextEncoding::Utf32Be, 4),
            (&[0xEF, 0xBB, 0xBF, b'a'], TextEncoding::Utf8, 3),
            (&[0x2B, 0x2F, 0x76, 0x38], TextEncoding::Utf7, 3),
            (&[0xFE, 0xFF, 0x00, b'a'], TextEncoding::Utf16Be, 2),
            (&[0xFF, 0xFE, b'a', 0x00], TextEncoding::Utf16Le, 2),
        ];
        for (prefix, encoding, offset) in cases {
            let detected = detect(prefix, WINDOWS_1252);
            assert_eq!(detected, Detected { encoding, offset }, "{prefix:?}");
        }
    }

    #[test]
    fn falls_back_without_a_mark() {
        let detected = detect(b"int", WINDOWS_1252);
        assert_eq!(detected.encoding, TextEncoding::Fallback(WINDOWS_1252));
        assert_eq!(detected.offset, 0);
        assert_eq!(detect(b"", WINDOWS_1252).offset, 0);
    }

    #[test]
    fn unknown_label_uses_windows_1252() {
        assert_eq!(fallback_for_label("no-such-encoding"), WINDOWS_1252);
        assert_eq!(fallback_for_label("utf-8"), UTF_8);
        assert_eq!(fallback_for_label("latin1"), WINDOWS_1252);
    }

    #[test]
    fn utf8_survives_split_sequences() {
        let text = "naïve ½ → done";
        for chunk in 1..5 {
            assert_eq!(decode_in_chunks(TextEncoding::Utf8, text.as_bytes(), chunk), text);
        }
    }

    #[test]
    fn utf16_survives_split_code_units() {
        let text = "a𝄞b\r\n";
        let bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_le_bytes).collect();
        for chunk in 1..4 {
            assert_eq!(decode_in_chunks(TextEncoding::Utf16Le, &bytes, chunk), text);
        }
        let bytes: Vec<u8> = text.encode_utf16().flat_map(u16::to_be_bytes).collect();
        assert_eq!(decode_in_chunks(TextEncoding::Utf16Be, &bytes, 3), text);
    }

    #[test]
    fn utf32_survives_split_code_units() {
        let text = "x→𝄞";
        let le: Vec<u8> = text.chars().flat_map(|c| u32::from(c).to_le_bytes()).collect();
        let be: Vec<u8> = text.chars().flat_map(|c| u32::from(c).to_be_bytes()).collect();
        for chunk in 1..6 {
            assert_eq!(decode_in_chunks(TextEncoding::Utf32Le, &le, chunk), text);
            assert_eq!(decode_in_chunks(TextEncoding::Utf32Be, &be, chunk), text);
        }
    }

    #[test]
    fn malformed_input_becomes_replacement_character() {
        assert_eq!(decode_in_chunks(TextEncoding::Utf8, b"a\xFFb", 2), "a\u{FFFD}b");
        assert_eq!(
            decode_in_chunks(TextEncoding::Utf32Le, &[0x41, 0, 0, 0, 0x42], 4),
            "A\u{FFFD}"
        );
        assert_eq!(
            decode_in_chunks(TextEncoding::Utf32Le, &[0x00, 0xD8, 0, 0], 4),
            "\u{FFFD}"
        );
    }

    #[test]
    fn fallback_decodes_single_bytes() {
        let decoded = decode_in_chunks(TextEncoding::Fallback(WINDOWS_1252), b"caf\xE9", 1);
        assert_eq!(decoded, "café");
    }
}
