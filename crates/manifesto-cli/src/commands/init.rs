//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const CONFIG_FILE: &str = "manifesto.toml";

const DEFAULT_CONFIG: &str = r#"# manifesto configuration

[analyzer]
# Root directory to scan (default: current directory)
# root = "./src"

# Glob patterns to exclude from scanning
exclude = [
    "**/bin/**",
    "**/obj/**",
]

# File extensions to scan
extensions = ["cs"]

# Respect .gitignore files
respect_gitignore = true

# Worker threads (default: one per core)
# parallelism = 4

# Encoding used for files without a byte order mark
fallback_encoding = "windows-1252"

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.file-too-long]
enabled = true
# severity = "warning"  # Override default severity
max_lines = 700

[rules.line-too-wide]
max_width = 128
tab_width = 4
indent_width = 4

[rules.one-statement-per-line]
enabled = true

[rules.one-line-per-statement]
enabled = true

[rules.method-too-long]
max_lines = 20

[rules.identifier-too-short]
min_length = 3
allowed = ["if", "in", "as", "T"]
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new(CONFIG_FILE), force)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: manifesto check");

    Ok(())
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    std::fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", path.display()))
}
