//! # manifesto-core
//!
//! Core framework for streaming style linting of C-family sources.
//!
//! Sources are never parsed. A [`Scanner`] decodes the input byte stream and
//! feeds it, one character at a time, through a shared [`ScanContext`] that
//! tracks comments, literals and directives, and then through an ordered set
//! of [`Rule`]s that each run their own small state machine.
//!
//! - [`ScanContext`] for the lexical automaton shared by all rules
//! - [`Rule`] trait for per-character style rules
//! - [`Scanner`] for scanning one stream or file
//! - [`Analyzer`] for scanning a whole tree in parallel
//! - [`ProjectFile`] for reading the file list of an MSBuild project
//! - [`Violation`] for representing findings
//!
//! ## Example
//!
//! ```ignore
//! use manifesto_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .rule(MyRule::default())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! println!("clean: {}", result.is_clean());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod project;
mod rule;
mod scanner;
mod types;

pub mod encoding;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::{ScanContext, Step, LINE_START};
pub use project::{ProjectError, ProjectFile, OVERLAY_EXTENSION};
pub use rule::{Rule, RuleBox};
pub use scanner::{ScanError, Scanner, CHUNK_SIZE};
pub use types::{
    LintResult, ScanResult, Severity, Suggestion, Violation, ViolationDiagnostic, ViolationKind,
};
