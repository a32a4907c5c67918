//! Batch analyzer: discovers files and scans them in parallel.

use crate::config::Config;
use crate::encoding::fallback_for_label;
use crate::rule::{Rule, RuleBox};
use crate::scanner::{ScanError, Scanner};
use crate::types::{LintResult, ScanResult};

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A file could not be scanned.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Directory walk error.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Worker pool could not be created.
    #[error("Failed to start scan workers: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    files: Vec<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    extensions: Option<Vec<String>>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds an explicit file to scan. When any file is given, the root is
    /// not walked.
    #[must_use]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Adds explicit files to scan.
    #[must_use]
    pub fn files<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.files.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Restricts discovery to the given extensions (without the dot).
    #[must_use]
    pub fn extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be resolved or an
    /// exclude pattern is invalid.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        let excludes = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        let extensions = self
            .extensions
            .unwrap_or_else(|| config.analyzer.extensions.clone());

        let rules = self
            .rules
            .into_iter()
            .filter(|rule| {
                let enabled = config.is_rule_enabled(rule.name());
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.name());
                }
                enabled
            })
            .collect();
        let scanner = Scanner::new(rules)
            .with_fallback_encoding(fallback_for_label(&config.analyzer.fallback_encoding));

        Ok(Analyzer {
            root,
            files: self.files,
            scanner,
            excludes,
            extensions,
            config,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    files: Vec<PathBuf>,
    scanner: Scanner,
    excludes: Vec<glob::Pattern>,
    extensions: Vec<String>,
    config: Config,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of enabled rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.scanner.rules().len()
    }

    /// Scans every file and returns the results in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery fails or a file cannot be read.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        let files = if self.files.is_empty() {
            info!("Starting analysis at {}", self.root.display());
            self.discover_files()?
        } else {
            self.files.clone()
        };

        info!("Found {} files to analyze", files.len());

        let scanned = match self.config.analyzer.parallelism {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(|| self.scan_all(&files)),
            None => self.scan_all(&files),
        }?;

        let mut result = LintResult::new();
        for file_result in scanned {
            result.push(file_result);
        }

        info!(
            "Analysis complete: {} violations in {} files",
            result.violation_count(),
            result.files_checked
        );

        Ok(result)
    }

    fn scan_all(&self, files: &[PathBuf]) -> Result<Vec<ScanResult>, AnalyzerError> {
        files
            .par_iter()
            .map(|path| -> Result<ScanResult, AnalyzerError> {
                debug!("Analyzing: {}", path.display());
                let mut result = self.scanner.scan_file(path)?;
                self.apply_severity_overrides(&mut result);
                Ok(result)
            })
            .collect()
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_overrides(&self, result: &mut ScanResult) {
        for v in &mut result.violations {
            if let Some(severity) = self.config.rule_severity(v.rule()) {
                v.severity = severity;
            }
        }
    }

    /// Walks the root for files with a scanned extension.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.config.analyzer.respect_gitignore)
            .require_git(false);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) || !self.has_extension(path) {
                continue;
            }
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }
            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    fn has_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.excludes
            .iter()
            .any(|pattern| pattern.matches_path(path) || pattern.matches_path(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ScanContext, Step};
    use crate::types::{Severity, Violation, ViolationKind};
    use std::fs;

    /// Flags every line holding a `!`.
    #[derive(Default, Clone)]
    struct Bang {
        found: bool,
    }

    impl Rule for Bang {
        fn kind(&self) -> ViolationKind {
            ViolationKind::OneStatementPerLine
        }

        fn check(&mut self, ch: char, ctx: &mut ScanContext) {
            match ctx.step() {
                Step::Code if ch == '!' => self.found = true,
                Step::LineEnd if self.found => {
                    self.found = false;
                    let line = ctx.current_line().to_string();
                    ctx.report(Violation::new(self.kind(), Some(ctx.line_number()), "bang", line));
                }
                _ => {}
            }
        }

        fn close(&mut self, _ctx: &mut ScanContext) {}

        fn fresh(&self) -> RuleBox {
            Box::new(Self::default())
        }
    }

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join("obj")).unwrap();
        fs::write(dir.path().join("src/B.cs"), "ok\nnot!\n").unwrap();
        fs::write(dir.path().join("src/A.cs"), "fine!\n").unwrap();
        fs::write(dir.path().join("src/notes.txt"), "!!!\n").unwrap();
        fs::write(dir.path().join("obj/Gen.cs"), "gen!\n").unwrap();
        dir
    }

    #[test]
    fn test_builder() {
        let analyzer = Analyzer::builder()
            .root(".")
            .exclude("**/bin/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.root().exists());
        assert_eq!(analyzer.rule_count(), 0);
    }

    #[test]
    fn invalid_exclude_pattern_is_rejected() {
        let err = Analyzer::builder().exclude("[").build().err();
        assert!(matches!(err, Some(AnalyzerError::Glob(_))));
    }

    #[test]
    fn test_exclude_patterns() {
        let analyzer = Analyzer::builder()
            .root("/foo")
            .exclude("**/bin/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.should_exclude(Path::new("/foo/bin/Debug/Gen.cs")));
        assert!(analyzer.should_exclude(Path::new("/foo/obj/Gen.cs")));
        assert!(!analyzer.should_exclude(Path::new("/foo/src/Main.cs")));
    }

    #[test]
    fn discovers_sorted_source_files_only() {
        let dir = project();
        let result = Analyzer::builder()
            .root(dir.path())
            .rule(Bang::default())
            .build()
            .unwrap()
            .analyze()
            .unwrap();

        let names: Vec<_> = result
            .results
            .iter()
            .filter_map(|r| r.file.file_name())
            .collect();
        assert_eq!(names, ["A.cs", "B.cs"]);
        assert_eq!(result.violation_count(), 2);
        assert_eq!(result.results[1].violations[0].line, Some(2));
    }

    #[test]
    fn explicit_files_keep_their_order() {
        let dir = project();
        let b = dir.path().join("src/B.cs");
        let a = dir.path().join("src/A.cs");
        let missing = dir.path().join("src/Missing.cs");
        let result = Analyzer::builder()
            .files([&b, &missing, &a])
            .rule(Bang::default())
            .build()
            .unwrap()
            .analyze()
            .unwrap();

        assert_eq!(result.files_checked, 3);
        assert_eq!(result.results[0].file, b);
        assert_eq!(
            result.results[1].violations[0].kind,
            ViolationKind::FileNotFound
        );
        assert_eq!(result.results[2].file, a);
    }

    #[test]
    fn config_overrides_severity_and_parallelism() {
        let dir = project();
        let config = Config::parse(
            r#"
[analyzer]
parallelism = 2

[rules.one-statement-per-line]
severity = "warning"
"#,
        )
        .unwrap();

        let result = Analyzer::builder()
            .root(dir.path())
            .config(config)
            .rule(Bang::default())
            .build()
            .unwrap()
            .analyze()
            .unwrap();

        assert!(result
            .violations()
            .all(|(_, v)| v.severity == Severity::Warning));
        assert!(!result.has_errors());
    }

    #[test]
    fn disabled_rules_are_not_run() {
        let dir = project();
        let config = Config::parse("[rules.one-statement-per-line]\nenabled = false\n").unwrap();
        let analyzer = Analyzer::builder()
            .root(dir.path())
            .config(config)
            .rule(Bang::default())
            .build()
            .unwrap();

        assert_eq!(analyzer.rule_count(), 0);
        assert!(analyzer.analyze().unwrap().is_clean());
    }
}
