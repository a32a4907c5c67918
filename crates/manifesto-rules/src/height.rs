//! Rule limiting the number of code lines in a compilation unit.
//!
//! # Counting
//!
//! A line counts when it holds code outside comments, or when it is
//! entirely blank. Lines holding only comments do not count, and neither
//! does a last line without a line feed.
//!
//! # Configuration
//!
//! - `max_lines`: Maximum counted lines per file (default: 700)

use manifesto_core::{
    Rule, RuleBox, RuleConfig, ScanContext, Step, Suggestion, Violation, ViolationKind,
};

/// Default maximum number of counted lines.
pub const DEFAULT_MAX_LINES: usize = 700;

/// Flags files holding too many lines of code.
#[derive(Debug, Clone)]
pub struct HeightRule {
    max_lines: usize,
    code_length: usize,
    has_code: bool,
}

impl Default for HeightRule {
    fn default() -> Self {
        Self::new()
    }
}

impl HeightRule {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_lines: DEFAULT_MAX_LINES,
            code_length: 0,
            has_code: false,
        }
    }

    /// Creates the rule from its configuration section.
    #[must_use]
    pub fn from_config(config: &RuleConfig) -> Self {
        Self::new().max_lines(config.get_usize("max_lines", DEFAULT_MAX_LINES))
    }

    /// Sets the maximum number of counted lines.
    #[must_use]
    pub fn max_lines(mut self, max: usize) -> Self {
        self.max_lines = max;
        self
    }
}

impl Rule for HeightRule {
    fn kind(&self) -> ViolationKind {
        ViolationKind::FileTooLong
    }

    fn description(&self) -> &'static str {
        "Limits the number of code lines in a file"
    }

    fn check(&mut self, ch: char, ctx: &mut ScanContext) {
        match ctx.step() {
            Step::LineEnd => {
                if ctx.is_blank_line() || self.has_code {
                    self.code_length += 1;
                }
                self.has_code = false;
            }
            Step::Code if !ch.is_whitespace() => self.has_code = true,
            _ => {}
        }
    }

    fn close(&mut self, ctx: &mut ScanContext) {
        if self.code_length > self.max_lines {
            ctx.report(
                Violation::new(
                    self.kind(),
                    None,
                    format!(
                        "File has {} lines of code (max: {})",
                        self.code_length, self.max_lines
                    ),
                    "",
                )
                .with_suggestion(Suggestion::new(
                    "Split the file into smaller compilation units",
                )),
            );
        }
    }

    fn fresh(&self) -> RuleBox {
        Box::new(Self::new().max_lines(self.max_lines))
    }
}
