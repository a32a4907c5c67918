//! Core types for violations and scan results.

use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Severity level for violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The kind of breach a violation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViolationKind {
    /// The file could not be opened.
    FileNotFound,
    /// The file holds more code lines than allowed.
    FileTooLong,
    /// A line is wider than allowed.
    LineTooWide,
    /// A line holds more than one statement.
    OneStatementPerLine,
    /// A statement spans more than one line.
    OneLinePerStatement,
    /// A method body holds more lines than allowed.
    MethodTooLong,
    /// An identifier is shorter than allowed.
    VariableTooShort,
}

impl ViolationKind {
    /// Every kind, in code order.
    pub const ALL: [Self; 7] = [
        Self::FileNotFound,
        Self::FileTooLong,
        Self::LineTooWide,
        Self::OneStatementPerLine,
        Self::OneLinePerStatement,
        Self::MethodTooLong,
        Self::VariableTooShort,
    ];

    /// Returns the rule code (e.g., "MF002").
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::FileNotFound => "MF000",
            Self::FileTooLong => "MF001",
            Self::LineTooWide => "MF002",
            Self::OneStatementPerLine => "MF003",
            Self::OneLinePerStatement => "MF004",
            Self::MethodTooLong => "MF005",
            Self::VariableTooShort => "MF006",
        }
    }

    /// Returns the kebab-case rule name (e.g., "line-too-wide").
    #[must_use]
    pub fn rule_name(self) -> &'static str {
        match self {
            Self::FileNotFound => "file-not-found",
            Self::FileTooLong => "file-too-long",
            Self::LineTooWide => "line-too-wide",
            Self::OneStatementPerLine => "one-statement-per-line",
            Self::OneLinePerStatement => "one-line-per-statement",
            Self::MethodTooLong => "method-too-long",
            Self::VariableTooShort => "identifier-too-short",
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.rule_name())
    }
}

/// A suggested fix for a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A rule breach found while scanning a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// What kind of breach this is.
    pub kind: ViolationKind,
    /// Severity of this violation.
    pub severity: Severity,
    /// Line number (1-indexed), `None` for file-level findings.
    pub line: Option<usize>,
    /// Human-readable message.
    pub message: String,
    /// The offending line, or representative text for file-level findings.
    pub source_line: String,
    /// Optional suggestion for fixing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
}

impl Violation {
    /// Creates a new violation with [`Severity::Error`].
    ///
    /// Trailing line terminators are stripped from `source_line`.
    #[must_use]
    pub fn new(
        kind: ViolationKind,
        line: Option<usize>,
        message: impl Into<String>,
        source_line: impl Into<String>,
    ) -> Self {
        let mut source_line = source_line.into();
        let trimmed = source_line.trim_end_matches(['\r', '\n']).len();
        source_line.truncate(trimmed);

        Self {
            kind,
            severity: Severity::Error,
            line,
            message: message.into(),
            source_line,
            suggestion: None,
        }
    }

    /// Creates the violation reported for a file that cannot be opened.
    #[must_use]
    pub fn file_not_found(path: &Path, reason: impl Into<String>) -> Self {
        Self::new(
            ViolationKind::FileNotFound,
            None,
            reason,
            path.display().to_string(),
        )
    }

    /// Sets the severity level.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Adds a suggestion to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Returns the rule code of this violation.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Returns the rule name of this violation.
    #[must_use]
    pub fn rule(&self) -> &'static str {
        self.kind.rule_name()
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self, file: &Path) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}{}\n",
            self.code(),
            self.rule(),
            file.display(),
            self.line.map(|l| format!(":{l}")).unwrap_or_default(),
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if !self.source_line.is_empty() {
            let _ = writeln!(output, "  | {}", self.source_line);
        }
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {}", suggestion.message);
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{line}: ")?,
            None => write!(f, "-: ")?,
        }
        write!(f, "{} [{}] {}", self.severity, self.code(), self.message)
    }
}

/// A violation rendered as a miette diagnostic over its offending line.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("[{code}] {message}")]
pub struct ViolationDiagnostic {
    code: &'static str,
    message: String,
    #[help]
    help: Option<String>,
    #[source_code]
    src: NamedSource<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: &'static str,
}

impl ViolationDiagnostic {
    /// Builds a diagnostic for `violation` found in `file`.
    #[must_use]
    pub fn new(file: &Path, violation: &Violation) -> Self {
        let name = match violation.line {
            Some(line) => format!("{}:{line}", file.display()),
            None => file.display().to_string(),
        };
        Self {
            code: violation.code(),
            message: violation.message.clone(),
            help: violation.suggestion.as_ref().map(|s| s.message.clone()),
            span: SourceSpan::from((0, violation.source_line.len())),
            src: NamedSource::new(name, violation.source_line.clone()),
            label_message: violation.rule(),
        }
    }
}

/// Violations found in a single file, in detection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// The scanned file.
    pub file: PathBuf,
    /// Violations in detection order.
    pub violations: Vec<Violation>,
}

impl ScanResult {
    /// Creates an empty result for `file`.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            violations: Vec::new(),
        }
    }

    /// Appends a violation.
    pub fn add(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Returns true when the file has no violations at all.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the violations of the given kind.
    #[must_use]
    pub fn of_kind(&self, kind: ViolationKind) -> Vec<&Violation> {
        self.violations.iter().filter(|v| v.kind == kind).collect()
    }
}

/// Result of scanning a batch of files.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// Per-file results, in scan order.
    pub results: Vec<ScanResult>,
    /// Number of files checked.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file result.
    pub fn push(&mut self, result: ScanResult) {
        self.results.push(result);
        self.files_checked += 1;
    }

    /// Returns true when every file is clean.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.results.iter().all(ScanResult::is_clean)
    }

    /// Iterates over every violation together with its file.
    pub fn violations(&self) -> impl Iterator<Item = (&Path, &Violation)> {
        self.results
            .iter()
            .flat_map(|r| r.violations.iter().map(move |v| (r.file.as_path(), v)))
    }

    /// Returns the total number of violations.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.results.iter().map(|r| r.violations.len()).sum()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations().any(|(_, v)| v.severity >= severity)
    }

    /// Counts violations by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for (_, v) in self.violations() {
            match v.severity {
                Severity::Error => counts.0 += 1,
                Severity::Warning => counts.1 += 1,
                Severity::Info => counts.2 += 1,
            }
        }
        counts
    }

    /// Adds results from another batch.
    pub fn extend(&mut self, other: Self) {
        self.results.extend(other.results);
        self.files_checked += other.files_checked;
    }
}
