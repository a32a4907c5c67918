//! Rule requiring identifiers of a minimum length.
//!
//! Letters and digits accumulate into a word until whitespace or the end of
//! the line. Other characters neither end nor extend a word, so `a.b` reads
//! as `ab`. Words starting with a digit are numeric constants and exempt.
//!
//! # Configuration
//!
//! - `min_length`: Minimum identifier length (default: 3)
//! - `allowed`: Short words that are always accepted
//!   (default: `["if", "in", "as", "T"]`)

use manifesto_core::{
    Rule, RuleBox, RuleConfig, ScanContext, Step, Suggestion, Violation, ViolationKind,
};

/// Default minimum identifier length.
pub const DEFAULT_MIN_LENGTH: usize = 3;

/// Short words accepted by default.
pub const DEFAULT_ALLOWED: [&str; 4] = ["if", "in", "as", "T"];

/// Flags identifiers that are too short.
#[derive(Debug, Clone)]
pub struct VariableLengthRule {
    min_length: usize,
    allowed: Vec<String>,
    word: String,
    word_length: usize,
    numeric: bool,
}

impl Default for VariableLengthRule {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableLengthRule {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            allowed: DEFAULT_ALLOWED.iter().map(ToString::to_string).collect(),
            word: String::new(),
            word_length: 0,
            numeric: false,
        }
    }

    /// Creates the rule from its configuration section.
    #[must_use]
    pub fn from_config(config: &RuleConfig) -> Self {
        let rule = Self::new().min_length(config.get_usize("min_length", DEFAULT_MIN_LENGTH));
        match config.get_str_array("allowed") {
            Some(allowed) => rule.allowed(allowed),
            None => rule,
        }
    }

    /// Sets the minimum identifier length.
    #[must_use]
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = min;
        self
    }

    /// Replaces the set of short words that are always accepted.
    #[must_use]
    pub fn allowed<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = words.into_iter().map(Into::into).collect();
        self
    }

    fn flush(&mut self, ctx: &mut ScanContext) {
        if self.word_length == 0 {
            return;
        }

        let too_short = !self.numeric
            && self.word_length < self.min_length
            && !self.allowed.iter().any(|w| *w == self.word);
        if too_short {
            ctx.report(
                Violation::new(
                    self.kind(),
                    Some(ctx.line_number()),
                    format!(
                        "Identifier '{}' is {} characters long (min: {})",
                        self.word, self.word_length, self.min_length
                    ),
                    ctx.current_line(),
                )
                .with_suggestion(Suggestion::new("Use a descriptive name")),
            );
        }

        self.word.clear();
        self.word_length = 0;
        self.numeric = false;
    }
}

impl Rule for VariableLengthRule {
    fn kind(&self) -> ViolationKind {
        ViolationKind::VariableTooShort
    }

    fn description(&self) -> &'static str {
        "Requires identifiers of a minimum length"
    }

    fn check(&mut self, ch: char, ctx: &mut ScanContext) {
        match ctx.step() {
            Step::LineEnd => self.flush(ctx),
            Step::Code if !ctx.in_literal() => {
                if ch.is_whitespace() {
                    self.flush(ctx);
                } else if ch.is_alphanumeric() {
                    if self.word_length == 0 && ch.is_numeric() {
                        self.numeric = true;
                    }
                    self.word.push(ch);
                    self.word_length += 1;
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, ctx: &mut ScanContext) {
        self.flush(ctx);
    }

    fn fresh(&self) -> RuleBox {
        Box::new(
            Self::new()
                .min_length(self.min_length)
                .allowed(self.allowed.iter().cloned()),
        )
    }
}
