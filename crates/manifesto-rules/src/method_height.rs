//! Rule limiting the length of a method body.
//!
//! # Detection
//!
//! There is no parser behind this rule. A method is assumed to open on a
//! line that, outside any method, holds a `(` and a `)` with balanced
//! parentheses and ends with `{`. The body lasts until a `}` drops the brace
//! depth below the depth reached by that opening brace. Bodies opened on a
//! line of their own (`{` under the header) are therefore not detected, and
//! other constructs shaped like `(...) {` are taken for methods.
//!
//! Inside a body, a line counts when it is blank or holds code outside
//! comments. The opening and closing lines do not count.
//!
//! # Configuration
//!
//! - `max_lines`: Maximum counted lines per body (default: 20)

use manifesto_core::{
    Rule, RuleBox, RuleConfig, ScanContext, Step, Suggestion, Violation, ViolationKind,
};

/// Default maximum number of counted lines in a method body.
pub const DEFAULT_MAX_LINES: usize = 20;

/// Flags method bodies holding too many lines.
#[derive(Debug, Clone)]
pub struct MethodHeightRule {
    max_lines: usize,
    reentrance: isize,
    method_start: isize,
    method_length: usize,
    in_method: bool,
    method_enter: bool,
    method_exit: bool,
    depth: isize,
    has_code: bool,
    opening_line: String,
    opening_line_number: usize,
}

impl Default for MethodHeightRule {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodHeightRule {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_lines: DEFAULT_MAX_LINES,
            reentrance: 0,
            method_start: 0,
            method_length: 0,
            in_method: false,
            method_enter: false,
            method_exit: false,
            depth: 0,
            has_code: false,
            opening_line: String::new(),
            opening_line_number: 0,
        }
    }

    /// Creates the rule from its configuration section.
    #[must_use]
    pub fn from_config(config: &RuleConfig) -> Self {
        Self::new().max_lines(config.get_usize("max_lines", DEFAULT_MAX_LINES))
    }

    /// Sets the maximum number of counted lines in a body.
    #[must_use]
    pub fn max_lines(mut self, max: usize) -> Self {
        self.max_lines = max;
        self
    }

    fn close_brace(&mut self, ctx: &mut ScanContext) {
        self.reentrance -= 1;
        if !self.in_method || self.reentrance >= self.method_start {
            return;
        }

        if self.method_length > self.max_lines {
            ctx.report(
                Violation::new(
                    self.kind(),
                    Some(self.opening_line_number),
                    format!(
                        "Method is {} lines long (max: {})",
                        self.method_length, self.max_lines
                    ),
                    self.opening_line.as_str(),
                )
                .with_suggestion(Suggestion::new("Extract parts of the body into methods")),
            );
        }
        self.in_method = false;
        self.method_length = 0;
        self.method_start = 0;
    }

    fn end_line(&mut self, ctx: &ScanContext) {
        if self.in_method {
            if ctx.is_blank_line() || self.has_code {
                self.method_length += 1;
            }
        } else if ctx.last_significant() == '{'
            && self.method_enter
            && self.method_exit
            && self.depth == 0
        {
            self.in_method = true;
            self.method_start = self.reentrance;
            self.opening_line = ctx.current_line().to_string();
            self.opening_line_number = ctx.line_number();
        }

        self.method_enter = false;
        self.method_exit = false;
        self.has_code = false;
        self.depth = 0;
    }
}

impl Rule for MethodHeightRule {
    fn kind(&self) -> ViolationKind {
        ViolationKind::MethodTooLong
    }

    fn description(&self) -> &'static str {
        "Limits the number of lines in a method body"
    }

    fn check(&mut self, ch: char, ctx: &mut ScanContext) {
        match ctx.step() {
            Step::LineEnd => self.end_line(ctx),
            Step::Code if !ch.is_whitespace() => {
                self.has_code = true;
                if ctx.in_literal() {
                    return;
                }
                match ch {
                    '(' => {
                        self.method_enter |= !self.in_method;
                        self.depth += 1;
                    }
                    ')' => {
                        self.method_exit |= !self.in_method;
                        self.depth -= 1;
                    }
                    '{' => self.reentrance += 1,
                    '}' => self.close_brace(ctx),
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, ctx: &mut ScanContext) {
        if !ctx.current_line().is_empty() {
            self.end_line(ctx);
        }
    }

    fn fresh(&self) -> RuleBox {
        Box::new(Self::new().max_lines(self.max_lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manifesto_core::Scanner;

    fn check(code: &str) -> Vec<Violation> {
        Scanner::new(vec![Box::new(MethodHeightRule::new())])
            .scan_str(code, "Test.cs")
            .violations
    }

    fn method(body_lines: usize) -> String {
        let mut code = String::from("class Foo {\n    public void Run(int count) {\n");
        for _ in 0..body_lines {
            code.push_str("        count++;\n");
        }
        code.push_str("    }\n}\n");
        code
    }

    #[test]
    fn twenty_lines_pass() {
        assert!(check(&method(20)).is_empty());
    }

    #[test]
    fn twenty_one_lines_fail() {
        let violations = check(&method(21));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, Some(2));
        assert_eq!(violations[0].message, "Method is 21 lines long (max: 20)");
        assert_eq!(
            violations[0].source_line,
            "    public void Run(int count) {"
        );
    }

    #[test]
    fn blank_lines_count_and_comment_lines_do_not() {
        let mut code = String::from("void Run() {\n");
        for _ in 0..15 {
            code.push_str("    x++;\n");
        }
        for _ in 0..5 {
            code.push_str("\n    // note\n");
        }
        code.push_str("}\n");
        assert!(check(&code).is_empty());

        let code = code.replacen("\n}\n", "\n\n}\n", 1);
        assert_eq!(check(&code).len(), 1);
    }

    #[test]
    fn nested_blocks_stay_inside_the_method() {
        let mut code = String::from("void Run() {\n    if (ready) {\n");
        for _ in 0..20 {
            code.push_str("        x++;\n");
        }
        code.push_str("    }\n}\n");
        let violations = check(&code);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.starts_with("Method is 22 lines"));
    }

    #[test]
    fn brace_on_its_own_line_is_not_detected() {
        let mut code = String::from("void Run()\n{\n");
        for _ in 0..30 {
            code.push_str("    x++;\n");
        }
        code.push_str("}\n");
        assert!(check(&code).is_empty());
    }

    #[test]
    fn braces_in_literals_are_ignored() {
        let mut code = String::from("void Run() {\n    s = \"}\";\n");
        for _ in 0..20 {
            code.push_str("    x++;\n");
        }
        code.push_str("}\n");
        assert_eq!(check(&code).len(), 1);
    }

    #[test]
    fn configured_limit() {
        let config: RuleConfig = toml::from_str("max_lines = 1").unwrap();
        let rule = MethodHeightRule::from_config(&config);
        let result = Scanner::new(vec![Box::new(rule)])
            .scan_str("void Run() {\n a();\n b();\n}\n", "Test.cs");
        assert_eq!(result.violations.len(), 1);
    }
}
