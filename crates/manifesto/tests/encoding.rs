//! Files in different encodings scan the same way.

use manifesto::{ScanResult, Violation, ViolationKind};
use std::fs;
use std::path::Path;

/// Source text with non-ASCII content, longer than several read chunks.
fn source() -> String {
    let mut text = String::from("class Café {\n    int ab = 1; int naïve = 2;\n");
    for _ in 0..80 {
        text.push_str("    // ünïcödé comment → ok\n    string greeting = \"½ € 𝄞\";\n");
    }
    text.push_str("    void Run() {\n        Call(bé,\n            bé);\n    }\n}\n");
    text
}

fn findings(result: &ScanResult) -> Vec<(ViolationKind, Option<usize>, String)> {
    result
        .violations
        .iter()
        .map(|v: &Violation| (v.kind, v.line, v.message.clone()))
        .collect()
}

fn write(dir: &Path, name: &str, bytes: &[u8]) -> ScanResult {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    manifesto::scan_file(&path).unwrap()
}

fn with_bom(bom: &[u8], body: impl IntoIterator<Item = u8>) -> Vec<u8> {
    bom.iter().copied().chain(body).collect()
}

#[test]
fn files_with_a_bom_match_the_decoded_text() {
    let text = source();
    assert!(text.len() > 4 * manifesto::CHUNK_SIZE);
    let dir = tempfile::tempdir().unwrap();

    let expected = findings(&manifesto::scanner().scan_str(&text, "Text.cs"));
    assert!(!expected.is_empty());

    let variants = [
        (
            "Bom8.cs",
            with_bom(&[0xEF, 0xBB, 0xBF], text.bytes()),
        ),
        (
            "Le16.cs",
            with_bom(&[0xFF, 0xFE], text.encode_utf16().flat_map(u16::to_le_bytes)),
        ),
        (
            "Be16.cs",
            with_bom(&[0xFE, 0xFF], text.encode_utf16().flat_map(u16::to_be_bytes)),
        ),
        (
            "Le32.cs",
            with_bom(
                &[0xFF, 0xFE, 0x00, 0x00],
                text.chars().flat_map(|c| u32::from(c).to_le_bytes()),
            ),
        ),
        (
            "Be32.cs",
            with_bom(
                &[0x00, 0x00, 0xFE, 0xFF],
                text.chars().flat_map(|c| u32::from(c).to_be_bytes()),
            ),
        ),
    ];

    for (name, bytes) in variants {
        let result = write(dir.path(), name, &bytes);
        assert_eq!(findings(&result), expected, "{name}");
    }
}

#[test]
fn bomless_file_uses_single_byte_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let result = write(dir.path(), "Latin.cs", b"var caf\xE9 = 1; var ab = 2;\n");
    let messages: Vec<_> = result.violations.iter().map(|v| v.message.as_str()).collect();
    assert_eq!(
        messages,
        [
            "Identifier 'ab' is 2 characters long (min: 3)",
            "Line holds more than one statement",
        ]
    );
    assert!(result.violations[0].source_line.contains("café"));
}

#[test]
fn missing_file_is_reported_not_raised() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Gone.cs");
    let result = manifesto::scan_file(&path).unwrap();
    assert_eq!(result.violations.len(), 1);
    let violation = &result.violations[0];
    assert_eq!(violation.kind, ViolationKind::FileNotFound);
    assert_eq!(violation.line, None);
    assert_eq!(violation.code(), "MF000");
}

#[test]
fn batch_scan_keeps_input_order() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("First.cs");
    let second = dir.path().join("Second.cs");
    fs::write(&first, "var abc = 1;\n").unwrap();
    fs::write(&second, "var ab = 1;\n").unwrap();
    let missing = dir.path().join("Missing.cs");

    let result = manifesto::scan_files([&second, &missing, &first]).unwrap();
    assert_eq!(result.files_checked, 3);
    assert_eq!(result.results[0].file, second);
    assert_eq!(result.results[2].file, first);
    assert!(result.results[2].is_clean());
    assert_eq!(result.count_by_severity(), (2, 0, 0));
}
