//! Rule limiting the width of a line.
//!
//! # Counting
//!
//! Tabs count as `tab_width` columns and every other character as one,
//! except carriage returns and NUL. Code can never start left of its
//! indentation baseline: at the first non-whitespace character of a line the
//! running width is raised to the current brace depth times `indent_width`.
//! Comment text is counted like code.
//!
//! # Configuration
//!
//! - `max_width`: Maximum width of a line (default: 128)
//! - `tab_width`: Columns counted for a tab (default: 4)
//! - `indent_width`: Columns added per open brace (default: 4)

use manifesto_core::{
    Rule, RuleBox, RuleConfig, ScanContext, Step, Suggestion, Violation, ViolationKind,
};

/// Default maximum line width.
pub const DEFAULT_MAX_WIDTH: usize = 128;

/// Default tab and indentation width.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Flags lines that are too wide.
#[derive(Debug, Clone)]
pub struct WidthRule {
    max_width: usize,
    tab_width: usize,
    indent_width: usize,
    characters: usize,
    reentrance: isize,
    line_start: bool,
}

impl Default for WidthRule {
    fn default() -> Self {
        Self::new()
    }
}

impl WidthRule {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            tab_width: DEFAULT_TAB_WIDTH,
            indent_width: DEFAULT_TAB_WIDTH,
            characters: 0,
            reentrance: 0,
            line_start: true,
        }
    }

    /// Creates the rule from its configuration section.
    #[must_use]
    pub fn from_config(config: &RuleConfig) -> Self {
        Self::new()
            .max_width(config.get_usize("max_width", DEFAULT_MAX_WIDTH))
            .tab_width(config.get_usize("tab_width", DEFAULT_TAB_WIDTH))
            .indent_width(config.get_usize("indent_width", DEFAULT_TAB_WIDTH))
    }

    /// Sets the maximum line width.
    #[must_use]
    pub fn max_width(mut self, max: usize) -> Self {
        self.max_width = max;
        self
    }

    /// Sets the columns counted for a tab.
    #[must_use]
    pub fn tab_width(mut self, width: usize) -> Self {
        self.tab_width = width;
        self
    }

    /// Sets the columns added per open brace.
    #[must_use]
    pub fn indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    fn baseline(&self) -> usize {
        usize::try_from(self.reentrance).unwrap_or(0)
    }

    fn indent_step(&self) -> isize {
        isize::try_from(self.indent_width).unwrap_or(isize::MAX)
    }

    fn end_line(&mut self, ctx: &mut ScanContext) {
        if self.characters > self.max_width {
            let shown = ctx.current_line().replace(' ', ".");
            ctx.report(
                Violation::new(
                    self.kind(),
                    Some(ctx.line_number()),
                    format!(
                        "Line is {} characters wide (max: {})",
                        self.characters, self.max_width
                    ),
                    shown,
                )
                .with_suggestion(Suggestion::new(
                    "Break the line up or reduce its nesting",
                )),
            );
        }
        self.characters = 0;
        self.line_start = true;
    }
}

impl Rule for WidthRule {
    fn kind(&self) -> ViolationKind {
        ViolationKind::LineTooWide
    }

    fn description(&self) -> &'static str {
        "Limits the width of a line, counting indentation from brace depth"
    }

    fn check(&mut self, ch: char, ctx: &mut ScanContext) {
        if ctx.step() == Step::LineEnd {
            self.end_line(ctx);
            return;
        }

        match ch {
            '\r' | '\0' => {}
            '\t' => self.characters += self.tab_width,
            c if c.is_whitespace() => self.characters += 1,
            c => {
                if self.line_start {
                    self.characters = self.characters.max(self.baseline());
                    self.line_start = false;
                }
                if !ctx.in_literal() && !ctx.in_comment() {
                    match c {
                        '{' => self.reentrance += self.indent_step(),
                        '}' => self.reentrance -= self.indent_step(),
                        _ => {}
                    }
                }
                self.characters += 1;
            }
        }
    }

    fn close(&mut self, ctx: &mut ScanContext) {
        self.end_line(ctx);
    }

    fn fresh(&self) -> RuleBox {
        Box::new(
            Self::new()
                .max_width(self.max_width)
                .tab_width(self.tab_width)
                .indent_width(self.indent_width),
        )
    }
}
