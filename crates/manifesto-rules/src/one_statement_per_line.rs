//! Rule forbidding more than one statement on a line.
//!
//! Semicolons and commas are only counted outside `(`, `<` and `{` nesting.
//! A line fails when it holds more than one semicolon, or a comma that is not
//! its last significant character. Once a `:` appears (base lists, labels)
//! commas on that line are ignored.

use manifesto_core::{Rule, RuleBox, ScanContext, Step, Violation, ViolationKind};

/// Flags lines holding more than one statement.
#[derive(Debug, Clone, Default)]
pub struct OneStatementPerLine {
    commas: usize,
    semicolons: usize,
    depth: isize,
    interface_member: bool,
}

impl OneStatementPerLine {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn end_line(&mut self, ctx: &mut ScanContext) {
        let trailing = usize::from(ctx.last_significant() == ',');
        if self.commas.saturating_sub(trailing) > 0 || self.semicolons > 1 {
            let line = ctx.current_line().to_string();
            ctx.report(Violation::new(
                self.kind(),
                Some(ctx.line_number()),
                "Line holds more than one statement",
                line,
            ));
        }
        *self = Self::default();
    }
}

impl Rule for OneStatementPerLine {
    fn kind(&self) -> ViolationKind {
        ViolationKind::OneStatementPerLine
    }

    fn description(&self) -> &'static str {
        "Forbids more than one statement on a line"
    }

    fn check(&mut self, ch: char, ctx: &mut ScanContext) {
        match ctx.step() {
            Step::LineEnd => self.end_line(ctx),
            Step::Code if !ctx.in_literal() => match ch {
                ',' if self.depth < 1 && !self.interface_member => self.commas += 1,
                ';' if self.depth < 1 => self.semicolons += 1,
                '{' | '<' | '(' => self.depth += 1,
                '}' | '>' | ')' => self.depth -= 1,
                ':' => self.interface_member = true,
                _ => {}
            },
            _ => {}
        }
    }

    fn close(&mut self, ctx: &mut ScanContext) {
        self.end_line(ctx);
    }

    fn fresh(&self) -> RuleBox {
        Box::new(Self::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manifesto_core::Scanner;

    fn check(code: &str) -> Vec<Violation> {
        Scanner::new(vec![Box::new(OneStatementPerLine::new())])
            .scan_str(code, "Test.cs")
            .violations
    }

    #[test]
    fn single_statement_passes() {
        assert!(check("a = 1;\n").is_empty());
    }

    #[test]
    fn two_statements_fail() {
        let violations = check("a = 1; b = 2;\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, Some(1));
        assert_eq!(violations[0].source_line, "a = 1; b = 2;");
    }

    #[test]
    fn nested_separators_are_ignored() {
        assert!(check("f(a, b);\n").is_empty());
        assert!(check("for (i = 0; i < n; i++) {\n").is_empty());
        assert!(check("var map = new Dictionary<string, int>();\n").is_empty());
        assert!(check("int Value { get; set; }\n").is_empty());
    }

    #[test]
    fn trailing_comma_is_allowed_once() {
        assert!(check("First,\n").is_empty());
        assert_eq!(check("First, Second,\n").len(), 1);
        assert_eq!(check("int a, b;\n").len(), 1);
    }

    #[test]
    fn base_list_commas_are_ignored() {
        assert!(check("class Foo : Bar, IBaz, IQux {\n").is_empty());
    }

    #[test]
    fn separators_in_literals_and_comments_are_ignored() {
        assert!(check("s = \"a; b, c\";\n").is_empty());
        assert!(check("c = ';';\n").is_empty());
        assert!(check("a = 1; // b = 2;\n").is_empty());
        assert!(check("a = 1; /* b; */\n").is_empty());
    }

    #[test]
    fn each_line_is_judged_on_its_own() {
        let violations = check("a; b;\nc;\nd; e;");
        let lines: Vec<_> = violations.iter().map(|v| v.line).collect();
        assert_eq!(lines, [Some(1), Some(3)]);
    }
}
