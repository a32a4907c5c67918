//! The shared lexical automaton every rule observes.
//!
//! A [`ScanContext`] is advanced one character at a time. For each character
//! it first updates the lexical state (literals, directives, comments), then
//! lets every rule look at the character, and finally updates the trailing
//! state (previous character, escape flag, line bookkeeping) for the next one.

use crate::rule::RuleBox;
use crate::types::Violation;

/// Sentinel standing for "nothing seen yet on this line".
pub const LINE_START: char = '\r';

/// How rules should treat the character currently being fed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The character is a line feed; rules finalize their per-line state.
    LineEnd,
    /// The character is candidate code content (may be whitespace).
    Code,
    /// The character is inside a comment or was claimed by lexical bookkeeping.
    Skip,
}

/// Per-file lexical state shared by all rules.
#[derive(Debug)]
pub struct ScanContext {
    previous: char,
    last_significant: char,
    in_char_literal: bool,
    in_string_literal: bool,
    in_directive: bool,
    escaped: bool,
    in_comment: bool,
    in_multiline_comment: bool,
    current_line: String,
    blank_line: bool,
    line_number: usize,
    claimed: bool,
    step: Step,
    violations: Vec<Violation>,
}

impl Default for ScanContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanContext {
    /// Creates the context for a fresh scan, positioned on line 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            previous: LINE_START,
            last_significant: LINE_START,
            in_char_literal: false,
            in_string_literal: false,
            in_directive: false,
            escaped: false,
            in_comment: false,
            in_multiline_comment: false,
            current_line: String::new(),
            blank_line: true,
            line_number: 1,
            claimed: false,
            step: Step::Skip,
            violations: Vec::new(),
        }
    }

    /// Feeds one character through the context and the given rules, in order.
    pub fn feed(&mut self, ch: char, rules: &mut [RuleBox]) {
        self.begin(ch);
        for rule in rules.iter_mut() {
            rule.check(ch, self);
        }
        self.end(ch);
    }

    /// Closes every rule in order and returns the collected violations.
    #[must_use]
    pub fn finish(mut self, rules: &mut [RuleBox]) -> Vec<Violation> {
        for rule in rules.iter_mut() {
            rule.close(&mut self);
        }
        self.violations
    }

    /// Records a violation.
    pub fn report(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Violations reported so far, in detection order.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Classification of the character currently being fed.
    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    /// The character fed before the current one.
    #[must_use]
    pub fn previous(&self) -> char {
        self.previous
    }

    /// Last non-whitespace code character of the current line, or
    /// [`LINE_START`].
    #[must_use]
    pub fn last_significant(&self) -> char {
        self.last_significant
    }

    /// True inside a `'...'` span.
    #[must_use]
    pub fn in_char_literal(&self) -> bool {
        self.in_char_literal
    }

    /// True inside a `"..."` span.
    #[must_use]
    pub fn in_string_literal(&self) -> bool {
        self.in_string_literal
    }

    /// True from a `#` to the end of its line.
    #[must_use]
    pub fn in_directive(&self) -> bool {
        self.in_directive
    }

    /// True inside a character literal, string literal or directive.
    #[must_use]
    pub fn in_literal(&self) -> bool {
        self.in_char_literal || self.in_string_literal || self.in_directive
    }

    /// True inside any comment.
    #[must_use]
    pub fn in_comment(&self) -> bool {
        self.in_comment
    }

    /// Text of the current line so far, including the current character.
    #[must_use]
    pub fn current_line(&self) -> &str {
        &self.current_line
    }

    /// True until a non-whitespace character appears on the current line.
    #[must_use]
    pub fn is_blank_line(&self) -> bool {
        self.blank_line
    }

    /// The 1-based number of the current line.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Returns true if the current line opens a base or sibling constructor
    /// call, given the first code character of that line.
    #[must_use]
    pub fn is_constructor_initializer(&self, first: char) -> bool {
        let calls_initializer =
            self.current_line.contains("base") || self.current_line.contains("this");
        first == ':' && calls_initializer && self.current_line.contains('(')
    }

    fn begin(&mut self, ch: char) {
        self.current_line.push(ch);
        if !ch.is_whitespace() {
            self.blank_line = false;
        }

        self.claimed = match ch {
            '\'' => self.toggle_char_literal(),
            '"' => self.toggle_string_literal(),
            '#' => self.enter_directive(),
            '/' => self.handle_slash(),
            '*' => self.handle_star(),
            _ => false,
        };

        self.step = if ch == '\n' {
            Step::LineEnd
        } else if self.claimed
            || self.in_comment
            || self.in_multiline_comment
            || (ch == '/' && self.previous.is_whitespace())
        {
            Step::Skip
        } else {
            Step::Code
        };

        if self.step == Step::Code && !ch.is_whitespace() && !self.in_literal() {
            self.last_significant = ch;
        }
    }

    fn end(&mut self, ch: char) {
        if ch == '\n' {
            self.in_comment = self.in_multiline_comment;
            self.blank_line = true;
            self.current_line.clear();
            self.line_number += 1;
            self.in_char_literal = false;
            self.in_string_literal = false;
            self.in_directive = false;
            self.last_significant = LINE_START;
        }
        self.previous = ch;
        self.escaped = !self.escaped && ch == '\\';
        self.claimed = false;
    }

    fn toggle_char_literal(&mut self) -> bool {
        if self.escaped || self.in_string_literal {
            return false;
        }
        self.in_char_literal = !self.in_char_literal;
        true
    }

    fn toggle_string_literal(&mut self) -> bool {
        if self.in_char_literal {
            return false;
        }
        self.in_string_literal = !self.in_string_literal;
        true
    }

    fn enter_directive(&mut self) -> bool {
        if self.in_char_literal || self.in_string_literal {
            return false;
        }
        self.in_directive = true;
        true
    }

    fn handle_slash(&mut self) -> bool {
        if self.in_literal() {
            return false;
        }
        match self.previous {
            '/' => {
                self.in_comment = true;
                true
            }
            '*' => {
                self.in_multiline_comment = false;
                self.in_comment = false;
                true
            }
            _ => false,
        }
    }

    fn handle_star(&mut self) -> bool {
        if self.in_literal() || self.previous != '/' {
            return false;
        }
        self.in_multiline_comment = true;
        self.in_comment = true;
        true
    }
}
