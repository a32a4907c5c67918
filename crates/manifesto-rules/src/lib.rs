//! # manifesto-rules
//!
//! Built-in style rules for manifesto.
//!
//! Every rule is a small state machine fed one character at a time through a
//! shared [`manifesto_core::ScanContext`]. Together they enforce the
//! 700 by 128 style:
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | MF001 | `file-too-long` | At most 700 lines of code per file; comment-only lines are free |
//! | MF002 | `line-too-wide` | At most 128 columns per line, indentation counted from brace depth |
//! | MF003 | `one-statement-per-line` | No two statements on one line |
//! | MF004 | `one-line-per-statement` | No statement spanning several lines |
//! | MF005 | `method-too-long` | At most 20 lines per method body |
//! | MF006 | `identifier-too-short` | Identifiers of at least 3 characters |
//!
//! ## Usage
//!
//! ```ignore
//! use manifesto_core::Scanner;
//! use manifesto_rules::default_rules;
//!
//! let result = Scanner::new(default_rules()).scan_str("var ab = 1;\n", "Demo.cs");
//! assert!(!result.is_clean());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod height;
mod method_height;
mod one_line_per_statement;
mod one_statement_per_line;
mod presets;
mod variable_length;
mod width;

pub use height::HeightRule;
pub use method_height::MethodHeightRule;
pub use one_line_per_statement::OneLinePerStatement;
pub use one_statement_per_line::OneStatementPerLine;
pub use presets::{default_rules, rules_from_config, RULE_NAMES};
pub use variable_length::VariableLengthRule;
pub use width::WidthRule;

/// Re-export core types for convenience.
pub use manifesto_core::{Rule, Severity, Violation};
