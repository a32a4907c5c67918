//! The rule lifecycle contract.

use crate::context::ScanContext;
use crate::types::{Severity, ViolationKind};

/// A streaming style rule.
///
/// A rule sees every character of a file, in order, right after the
/// [`ScanContext`] has updated its lexical state for that character. It keeps
/// its own counters and reports violations through [`ScanContext::report`].
/// At end of stream [`Rule::close`] is called once so the rule can judge the
/// trailing line and the file as a whole.
///
/// # Example
///
/// ```ignore
/// use manifesto_core::{Rule, RuleBox, ScanContext, Step, Violation, ViolationKind};
///
/// #[derive(Default)]
/// pub struct NoTabs { seen: bool }
///
/// impl Rule for NoTabs {
///     fn kind(&self) -> ViolationKind { ViolationKind::LineTooWide }
///
///     fn check(&mut self, ch: char, ctx: &mut ScanContext) {
///         if ch == '\t' && !self.seen {
///             self.seen = true;
///             let line = ctx.current_line().to_string();
///             ctx.report(Violation::new(self.kind(), Some(ctx.line_number()), "tab", line));
///         }
///     }
///
///     fn close(&mut self, _ctx: &mut ScanContext) {}
///
///     fn fresh(&self) -> RuleBox { Box::new(Self::default()) }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// The kind of violation this rule reports.
    fn kind(&self) -> ViolationKind;

    /// Returns the kebab-case name of this rule (e.g., "line-too-wide").
    fn name(&self) -> &'static str {
        self.kind().rule_name()
    }

    /// Returns the rule code (e.g., "MF002").
    fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Observes one character.
    fn check(&mut self, ch: char, ctx: &mut ScanContext);

    /// Finalizes the trailing line and the file.
    fn close(&mut self, ctx: &mut ScanContext);

    /// Returns an instance with the same options and no scan state.
    fn fresh(&self) -> RuleBox;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
