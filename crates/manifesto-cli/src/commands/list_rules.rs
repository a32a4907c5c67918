//! List rules command implementation.

use manifesto_rules::default_rules;

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules, in execution order:\n");
    println!("{:<8} {:<25} {:<9} Description", "Code", "Name", "Severity");
    println!("{}", "-".repeat(90));

    for rule in default_rules() {
        println!(
            "{:<8} {:<25} {:<9} {}",
            rule.code(),
            rule.name(),
            rule.default_severity().to_string(),
            rule.description()
        );
    }

    println!("\nUse --rules to run a subset, e.g.:");
    println!("  manifesto check --rules line-too-wide,method-too-long");
    println!("  manifesto check --rules MF002,MF005");
}
