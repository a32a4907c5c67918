//! Check command implementation.

use anyhow::{Context, Result};
use manifesto_core::{
    Analyzer, AnalyzerBuilder, Config, LintResult, ProjectFile, RuleBox, ViolationKind,
};
use manifesto_rules::{rules_from_config, RULE_NAMES};
use std::path::PathBuf;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
///
/// Directories are walked. Plain files and the files listed by each project
/// are scanned in the order given.
pub fn run(
    paths: &[PathBuf],
    projects: &[PathBuf],
    format: OutputFormat,
    rules_filter: Option<String>,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<()> {
    let config = load_config(source)?;
    let names: Option<Vec<String>> =
        rules_filter.map(|filter| filter.split(',').map(|s| s.trim().to_string()).collect());
    if let Some(names) = &names {
        warn_unknown(names);
    }

    let (dirs, mut files): (Vec<PathBuf>, Vec<PathBuf>) =
        paths.iter().cloned().partition(|p| p.is_dir());
    files.extend(project_files(projects)?);

    let mut result = LintResult::new();
    for dir in dirs {
        let analyzer = Analyzer::builder()
            .root(dir.as_path())
            .excludes(exclude.iter().cloned());
        let analyzer = with_rules(analyzer, &config, names.as_deref())
            .config(config.clone())
            .build()
            .with_context(|| format!("Failed to build analyzer for {}", dir.display()))?;

        tracing::info!(
            "Analyzing {} with {} rules",
            dir.display(),
            analyzer.rule_count()
        );
        result.extend(
            analyzer
                .analyze()
                .with_context(|| format!("Analysis of {} failed", dir.display()))?,
        );
    }

    if !files.is_empty() {
        let analyzer = Analyzer::builder().files(files.iter().cloned());
        let analyzer = with_rules(analyzer, &config, names.as_deref())
            .config(config.clone())
            .build()
            .context("Failed to build analyzer")?;

        tracing::info!(
            "Analyzing {} file(s) with {} rules",
            files.len(),
            analyzer.rule_count()
        );
        result.extend(analyzer.analyze().context("Analysis failed")?);
    }

    super::output::print(&result, format)?;

    // Exit with error code if there are errors
    if result.has_errors() {
        std::process::exit(1);
    }

    Ok(())
}

/// Collects the files of every project, in project order.
fn project_files(projects: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in projects {
        let project = ProjectFile::open(path)
            .with_context(|| format!("Failed to read project {}", path.display()))?;
        let listed = project
            .files_to_include()
            .with_context(|| format!("Failed to resolve imports of {}", path.display()))?;
        tracing::debug!("{} lists {} file(s)", path.display(), listed.len());
        files.extend(listed);
    }
    Ok(files)
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(path) = source.path() else {
        return Ok(Config::default());
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", path.display());
    }
    Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
}

fn with_rules(
    mut builder: AnalyzerBuilder,
    config: &Config,
    names: Option<&[String]>,
) -> AnalyzerBuilder {
    for rule in select_rules(config, names) {
        builder = builder.rule_box(rule);
    }
    builder
}

/// Returns the configured rules, narrowed to `names` (rule names or codes)
/// when given. Execution order is kept.
fn select_rules(config: &Config, names: Option<&[String]>) -> Vec<RuleBox> {
    let rules = rules_from_config(config);
    match names {
        None => rules,
        Some(names) => rules
            .into_iter()
            .filter(|rule| {
                names
                    .iter()
                    .any(|n| n == rule.name() || n.eq_ignore_ascii_case(rule.code()))
            })
            .collect(),
    }
}

fn warn_unknown(names: &[String]) {
    for name in names {
        if !is_known(name) {
            tracing::warn!("Unknown rule: {}", name);
        }
    }
}

fn is_known(name: &str) -> bool {
    RULE_NAMES.contains(&name)
        || ViolationKind::ALL
            .iter()
            .any(|kind| kind.code().eq_ignore_ascii_case(name))
}
