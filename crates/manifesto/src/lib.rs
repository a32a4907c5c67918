//! # manifesto
//!
//! Streaming style linter for C-family sources, enforcing the 700 by 128
//! manifesto:
//!
//! 1. No compilation unit longer than 700 lines of code.
//! 2. No line wider than 128 characters.
//! 3. One statement per line, and one line per statement.
//! 4. No method longer than 20 lines.
//! 5. No identifier shorter than 3 characters.
//!
//! This is the facade crate re-exporting the core framework and the rules.
//!
//! ## Single Files
//!
//! ```rust,ignore
//! let result = manifesto::scan_file("src/Program.cs")?;
//! for violation in &result.violations {
//!     println!("{violation}");
//! }
//! ```
//!
//! ## Whole Trees
//!
//! ```rust,ignore
//! use manifesto::{Analyzer, Config};
//!
//! let config = Config::from_file("manifesto.toml".as_ref())?;
//! let mut builder = Analyzer::builder().root("./src");
//! for rule in manifesto::rules::rules_from_config(&config) {
//!     builder = builder.rule_box(rule);
//! }
//! let result = builder.config(config).build()?.analyze()?;
//! ```

#![forbid(unsafe_code)]

use std::path::Path;

// Re-export core types and traits
pub use manifesto_core::*;

/// Built-in rules and rule sets.
pub mod rules {
    pub use manifesto_rules::*;
}

/// Creates a scanner running the default rule set.
#[must_use]
pub fn scanner() -> Scanner {
    Scanner::new(rules::default_rules())
}

/// Scans one file with the default rule set.
///
/// A missing file yields a result holding a single file-not-found violation.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn scan_file(path: impl AsRef<Path>) -> Result<ScanResult, ScanError> {
    scanner().scan_file(path.as_ref())
}

/// Scans files in the given order with the default rule set.
///
/// # Errors
///
/// Returns the first error hit while reading a file.
pub fn scan_files<I, P>(paths: I) -> Result<LintResult, ScanError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let scanner = scanner();
    let mut result = LintResult::new();
    for path in paths {
        result.push(scanner.scan_file(path.as_ref())?);
    }
    Ok(result)
}
