//! The scan driver: bytes in, violations out.

use crate::context::ScanContext;
use crate::encoding::{detect, StreamDecoder, BOM_PREFIX_LEN};
use crate::rule::RuleBox;
use crate::types::{ScanResult, Violation};

use encoding_rs::{Encoding, WINDOWS_1252};
use std::fs::File;
use std::io::{self, ErrorKind, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Size of the byte chunks read from the input.
pub const CHUNK_SIZE: usize = 1024;

/// Errors that abort a single file scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The file exists but could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
}

/// Runs an ordered rule set over byte streams.
///
/// Every scan works on a fresh [`ScanContext`] and fresh copies of the
/// configured rules, so one scanner can serve any number of files, from any
/// number of threads.
pub struct Scanner {
    rules: Vec<RuleBox>,
    fallback: &'static Encoding,
}

impl Scanner {
    /// Creates a scanner running `rules` in the given order.
    #[must_use]
    pub fn new(rules: Vec<RuleBox>) -> Self {
        Self {
            rules,
            fallback: WINDOWS_1252,
        }
    }

    /// Sets the encoding used for input without a byte-order mark.
    #[must_use]
    pub fn with_fallback_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.fallback = encoding;
        self
    }

    /// The configured rules, in execution order.
    #[must_use]
    pub fn rules(&self) -> &[RuleBox] {
        &self.rules
    }

    /// Scans a file on disk.
    ///
    /// A file that does not exist yields a result holding a single
    /// file-not-found violation.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be opened or read.
    pub fn scan_file(&self, path: &Path) -> Result<ScanResult, ScanError> {
        let io_error = |source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("File not found: {}", path.display());
                let mut result = ScanResult::new(path);
                result.add(Violation::file_not_found(path, e.to_string()));
                return Ok(result);
            }
            Err(e) => return Err(io_error(e)),
        };

        self.scan(file, path).map_err(io_error)
    }

    /// Scans an in-memory string.
    #[must_use]
    pub fn scan_str(&self, text: &str, file: impl Into<PathBuf>) -> ScanResult {
        let mut rules = self.fresh_rules();
        let mut ctx = ScanContext::new();
        for ch in text.chars() {
            ctx.feed(ch, &mut rules);
        }
        Self::finish(ctx, rules, file.into())
    }

    /// Scans a byte stream, sniffing its encoding from the first bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if reading from `reader` fails.
    pub fn scan<R: Read>(&self, mut reader: R, file: impl Into<PathBuf>) -> io::Result<ScanResult> {
        let file = file.into();
        let mut rules = self.fresh_rules();
        let mut ctx = ScanContext::new();
        let mut buffer = [0u8; CHUNK_SIZE];
        let mut text = String::with_capacity(CHUNK_SIZE);

        let mut filled = 0;
        while filled < BOM_PREFIX_LEN {
            let read = read_chunk(&mut reader, &mut buffer[filled..])?;
            if read == 0 {
                break;
            }
            filled += read;
        }

        let detected = detect(&buffer[..filled], self.fallback);
        debug!(
            "Scanning {} as {}",
            file.display(),
            detected.encoding.name()
        );
        let mut decoder = StreamDecoder::new(detected.encoding);
        decoder.decode(&buffer[detected.offset..filled], false, &mut text);
        Self::drain(&mut text, &mut ctx, &mut rules);

        loop {
            let read = read_chunk(&mut reader, &mut buffer)?;
            if read == 0 {
                break;
            }
            decoder.decode(&buffer[..read], false, &mut text);
            Self::drain(&mut text, &mut ctx, &mut rules);
        }

        decoder.decode(&[], true, &mut text);
        Self::drain(&mut text, &mut ctx, &mut rules);

        Ok(Self::finish(ctx, rules, file))
    }

    fn fresh_rules(&self) -> Vec<RuleBox> {
        self.rules.iter().map(|rule| rule.fresh()).collect()
    }

    fn drain(text: &mut String, ctx: &mut ScanContext, rules: &mut [RuleBox]) {
        for ch in text.chars() {
            ctx.feed(ch, rules);
        }
        text.clear();
    }

    fn finish(ctx: ScanContext, mut rules: Vec<RuleBox>, file: PathBuf) -> ScanResult {
        let mut result = ScanResult::new(file);
        for violation in ctx.finish(&mut rules) {
            result.add(violation);
        }
        result
    }
}

impl std::fmt::Debug for Scanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scanner")
            .field("rules", &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

fn read_chunk<R: Read>(reader: &mut R, buffer: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buffer) {
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Step;
    use crate::rule::Rule;
    use crate::types::ViolationKind;

    /// Reports every code character as a violation, recording what it saw.
    #[derive(Default)]
    struct Echo {
        seen: String,
    }

    impl Rule for Echo {
        fn kind(&self) -> ViolationKind {
            ViolationKind::OneStatementPerLine
        }

        fn check(&mut self, ch: char, ctx: &mut ScanContext) {
            match ctx.step() {
                Step::Code => self.seen.push(ch),
                Step::LineEnd => self.seen.push('|'),
                Step::Skip => {}
            }
        }

        fn close(&mut self, ctx: &mut ScanContext) {
            ctx.report(Violation::new(self.kind(), None, self.seen.clone(), ""));
        }

        fn fresh(&self) -> RuleBox {
            Box::new(Self::default())
        }
    }

    /// A reader that hands out one byte per call.
    struct Trickle<'a>(&'a [u8]);

    impl Read for Trickle<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.split_first() {
                Some((&byte, rest)) if !buf.is_empty() => {
                    buf[0] = byte;
                    self.0 = rest;
                    Ok(1)
                }
                _ => Ok(0),
            }
        }
    }

    fn echo_scanner() -> Scanner {
        Scanner::new(vec![Box::new(Echo::default())])
    }

    fn echoed(result: &ScanResult) -> &str {
        &result.violations[0].message
    }

    #[test]
    fn scan_str_feeds_every_character() {
        let result = echo_scanner().scan_str("a; // b\nc;", "x.cs");
        assert_eq!(echoed(&result), "a; |c;");
        assert_eq!(result.file, PathBuf::from("x.cs"));
    }

    #[test]
    fn bom_is_skipped_even_when_read_byte_by_byte() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("x → y".as_bytes());
        let result = echo_scanner().scan(Trickle(&bytes), "x.cs").unwrap();
        assert_eq!(echoed(&result), "x → y");
    }

    #[test]
    fn utf16_stream_spanning_many_chunks() {
        let text = "ab;\n".repeat(600);
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
        assert!(bytes.len() > CHUNK_SIZE * 4);

        let result = echo_scanner().scan(bytes.as_slice(), "x.cs").unwrap();
        assert_eq!(echoed(&result), "ab;|".repeat(600));
    }

    #[test]
    fn scans_are_independent() {
        let scanner = echo_scanner();
        let first = scanner.scan_str("abc", "x.cs");
        let second = scanner.scan_str("abc", "x.cs");
        assert_eq!(first, second);
    }

    #[test]
    fn missing_file_becomes_violation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Missing.cs");
        let result = echo_scanner().scan_file(&path).unwrap();
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].kind, ViolationKind::FileNotFound);
        assert_eq!(result.violations[0].line, None);
        assert!(!result.is_clean());
    }

    #[test]
    fn scan_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Present.cs");
        std::fs::write(&path, b"caf\xE9;").unwrap();
        let result = echo_scanner().scan_file(&path).unwrap();
        assert_eq!(echoed(&result), "café;");
    }

    #[test]
    fn fallback_encoding_is_configurable() {
        let scanner = echo_scanner().with_fallback_encoding(encoding_rs::UTF_8);
        let result = scanner.scan("é".as_bytes(), "x.cs").unwrap();
        assert_eq!(echoed(&result), "é");
    }
}
