//! Ordered rule sets.

use crate::{
    HeightRule, MethodHeightRule, OneLinePerStatement, OneStatementPerLine, VariableLengthRule,
    WidthRule,
};
use manifesto_core::{Config, RuleBox};
use tracing::warn;

/// Names of the built-in rules, in execution order.
pub const RULE_NAMES: [&str; 6] = [
    "file-too-long",
    "line-too-wide",
    "one-statement-per-line",
    "one-line-per-statement",
    "method-too-long",
    "identifier-too-short",
];

/// Returns every rule with default settings, in execution order.
///
/// The order is fixed: height, width, one statement per line, one line per
/// statement, method height, identifier length.
#[must_use]
pub fn default_rules() -> Vec<RuleBox> {
    vec![
        Box::new(HeightRule::new()),
        Box::new(WidthRule::new()),
        Box::new(OneStatementPerLine::new()),
        Box::new(OneLinePerStatement::new()),
        Box::new(MethodHeightRule::new()),
        Box::new(VariableLengthRule::new()),
    ]
}

/// Returns every rule with options read from `config`, in execution order.
///
/// Disabled rules are left out. Configuration sections naming unknown rules
/// are reported and ignored.
#[must_use]
pub fn rules_from_config(config: &Config) -> Vec<RuleBox> {
    for name in config.rules.keys() {
        if !RULE_NAMES.contains(&name.as_str()) {
            warn!("Unknown rule in configuration: {name}");
        }
    }

    let rules: [RuleBox; 6] = [
        Box::new(HeightRule::from_config(&config.rule("file-too-long"))),
        Box::new(WidthRule::from_config(&config.rule("line-too-wide"))),
        Box::new(OneStatementPerLine::new()),
        Box::new(OneLinePerStatement::new()),
        Box::new(MethodHeightRule::from_config(&config.rule("method-too-long"))),
        Box::new(VariableLengthRule::from_config(
            &config.rule("identifier-too-short"),
        )),
    ];
    rules
        .into_iter()
        .filter(|rule| config.is_rule_enabled(rule.name()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_order_matches_rule_names() {
        let names: Vec<_> = default_rules().iter().map(|r| r.name()).collect();
        assert_eq!(names, RULE_NAMES);
    }

    #[test]
    fn codes_follow_rule_order() {
        let codes: Vec<_> = default_rules().iter().map(|r| r.code()).collect();
        assert_eq!(codes, ["MF001", "MF002", "MF003", "MF004", "MF005", "MF006"]);
    }

    #[test]
    fn config_disables_rules() {
        let config = Config::parse(
            r#"
[rules.line-too-wide]
enabled = false

[rules.identifier-too-short]
enabled = false
"#,
        )
        .unwrap();
        let names: Vec<_> = rules_from_config(&config).iter().map(|r| r.name()).collect();
        assert_eq!(
            names,
            [
                "file-too-long",
                "one-statement-per-line",
                "one-line-per-statement",
                "method-too-long"
            ]
        );
    }

    #[test]
    fn empty_config_gives_every_rule() {
        assert_eq!(rules_from_config(&Config::default()).len(), 6);
    }
}
