//! Environment configuration.

/// Settings read from `TETCON_*` variables. Unset or empty variables stay
/// `None`; command line flags take precedence over all of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub rule: Option<String>,
    pub view: Option<String>,
    pub report: Option<String>,
    pub seed: Option<u32>,
    pub log_path: Option<String>,
}

fn non_empty(value: String) -> Option<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let rule = lookup("TETCON_RULE").and_then(non_empty);
        let view = lookup("TETCON_VIEW").and_then(non_empty);
        let report = lookup("TETCON_REPORT").and_then(non_empty);
        let seed = lookup("TETCON_SEED")
            .and_then(non_empty)
            .and_then(|s| s.parse().ok());
        let log_path = lookup("TETCON_LOG_PATH").and_then(non_empty);

        Self {
            rule,
            view,
            report,
            seed,
            log_path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> EnvConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_empty_environment() {
        assert_eq!(lookup(&[]), EnvConfig::default());
    }

    #[test]
    fn test_reads_every_variable() {
        let cfg = lookup(&[
            ("TETCON_RULE", "RULE=LONGRUN&W=8&H=16&G=20&R=3"),
            ("TETCON_VIEW", "W=60&H=20&S=4"),
            ("TETCON_REPORT", "out.log"),
            ("TETCON_SEED", "1234"),
            ("TETCON_LOG_PATH", " journal.jsonl "),
        ]);
        assert_eq!(cfg.rule.as_deref(), Some("RULE=LONGRUN&W=8&H=16&G=20&R=3"));
        assert_eq!(cfg.view.as_deref(), Some("W=60&H=20&S=4"));
        assert_eq!(cfg.report.as_deref(), Some("out.log"));
        assert_eq!(cfg.seed, Some(1234));
        assert_eq!(cfg.log_path.as_deref(), Some("journal.jsonl"));
    }

    #[test]
    fn test_blank_and_bad_values_are_ignored() {
        let cfg = lookup(&[("TETCON_SEED", "abc"), ("TETCON_LOG_PATH", "   ")]);
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.log_path, None);
    }
}
