//! Shared output formatting for lint results.

use anyhow::Result;
use manifesto_core::{LintResult, ViolationDiagnostic};
use miette::GraphicalReportHandler;
use std::fmt::Write;

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Text => text(result),
        OutputFormat::Json => json(result)?,
        OutputFormat::Compact => compact(result),
        OutputFormat::Pretty => pretty(result, &GraphicalReportHandler::new())?,
    };
    print!("{rendered}");
    Ok(())
}

fn text(result: &LintResult) -> String {
    let (errors, warnings, infos) = result.count_by_severity();
    let mut out = String::new();

    for (file, violation) in result.violations() {
        out.push_str(&violation.format(file));
        out.push('\n');
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    let _ = writeln!(
        out,
        "{summary_color}Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} file(s)\x1b[0m",
        result.files_checked
    );
    out
}

fn json(result: &LintResult) -> Result<String> {
    let mut json = serde_json::to_string_pretty(result)?;
    json.push('\n');
    Ok(json)
}

fn compact(result: &LintResult) -> String {
    let mut out = String::new();
    for (file, violation) in result.violations() {
        let _ = writeln!(out, "{}:{violation}", file.display());
    }
    out
}

fn pretty(result: &LintResult, handler: &GraphicalReportHandler) -> Result<String> {
    let mut out = String::new();
    for (file, violation) in result.violations() {
        let diagnostic = ViolationDiagnostic::new(file, violation);
        handler.render_report(&mut out, &diagnostic)?;
        out.push('\n');
    }
    Ok(out)
}
