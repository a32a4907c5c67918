//! Rule forbidding statements that span several lines.
//!
//! A line closes its statement when parentheses are balanced and its last
//! significant character is one of `;`, `,`, `{` or `}`, when it holds no code
//! at all, or when it is an attribute (`[...]`).
//!
//! A line ending in `)` may still be fine: a constructor header followed by
//! a `: base(...)` or `: this(...)` initializer on the next line. Its
//! violation is held back for one line and dropped if that line turns out to
//! be such an initializer.

use manifesto_core::{Rule, RuleBox, ScanContext, Step, Violation, ViolationKind, LINE_START};

/// Characters that close a statement at the end of a line.
const TAIL_CHARS: [char; 5] = [';', ',', '{', '}', LINE_START];

/// Flags statements that do not end on the line they start on.
#[derive(Debug, Clone)]
pub struct OneLinePerStatement {
    depth: isize,
    first: char,
    pending: Option<Violation>,
}

impl Default for OneLinePerStatement {
    fn default() -> Self {
        Self::new()
    }
}

impl OneLinePerStatement {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self {
            depth: 0,
            first: LINE_START,
            pending: None,
        }
    }

    fn is_closed(&self, last: char) -> bool {
        let attribute = self.first == '[' && last == ']';
        self.depth <= 0 && (TAIL_CHARS.contains(&last) || attribute)
    }

    fn end_line(&mut self, ctx: &mut ScanContext) {
        if let Some(pending) = self.pending.take() {
            if !ctx.is_constructor_initializer(self.first) {
                ctx.report(pending);
            }
        }

        let last = ctx.last_significant();
        if !self.is_closed(last) {
            let violation = Violation::new(
                self.kind(),
                Some(ctx.line_number()),
                "Statement does not end on this line",
                ctx.current_line(),
            );
            if last == ')' {
                self.pending = Some(violation);
            } else {
                ctx.report(violation);
            }
        }

        self.depth = 0;
        self.first = LINE_START;
    }
}

impl Rule for OneLinePerStatement {
    fn kind(&self) -> ViolationKind {
        ViolationKind::OneLinePerStatement
    }

    fn description(&self) -> &'static str {
        "Requires every statement to end on the line it starts on"
    }

    fn check(&mut self, ch: char, ctx: &mut ScanContext) {
        match ctx.step() {
            Step::LineEnd => self.end_line(ctx),
            Step::Code if !ch.is_whitespace() && !ctx.in_literal() => {
                match ch {
                    '(' => self.depth += 1,
                    ')' => self.depth -= 1,
                    _ => {}
                }
                if self.first == LINE_START {
                    self.first = ch;
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, ctx: &mut ScanContext) {
        self.end_line(ctx);
        if let Some(pending) = self.pending.take() {
            ctx.report(pending);
        }
    }

    fn fresh(&self) -> RuleBox {
        Box::new(Self::new())
    }
}
