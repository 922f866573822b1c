//! Global configuration types for Scrollback.
//!
//! `GlobalConfig` represents the top-level `config.toml` that controls the
//! retriever's attempt budget, settle delay, limit policy and container
//! lookup chain.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scroll::LookupStrategy;

/// Top-level configuration for Scrollback.
///
/// Loaded from `~/.scrollback/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalConfig {
    #[serde(default)]
    pub retriever: RetrieverConfig,
}

/// How the retriever treats `SearchOptions::limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitPolicy {
    /// Accept the limit but return every message (observed legacy behavior).
    #[default]
    Ignore,
    /// Truncate to the most recent `n` messages.
    KeepLatest,
}

impl fmt::Display for LimitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LimitPolicy::Ignore => write!(f, "ignore"),
            LimitPolicy::KeepLatest => write!(f, "keep_latest"),
        }
    }
}

impl FromStr for LimitPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "ignore" => Ok(LimitPolicy::Ignore),
            "keep_latest" => Ok(LimitPolicy::KeepLatest),
            other => Err(ConfigError::InvalidLimitPolicy(other.to_string())),
        }
    }
}

/// Settings for the convergence scroller and extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieverConfig {
    /// Upper bound on growing scroll attempts.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between attempts so the surface can render older messages.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    #[serde(default)]
    pub limit_policy: LimitPolicy,

    /// Container lookup chain, highest priority first.
    #[serde(default = "default_lookup_chain")]
    pub lookup: Vec<LookupStrategy>,
}

fn default_max_attempts() -> u32 {
    100
}

fn default_settle_delay_ms() -> u64 {
    500
}

/// Built-in container lookup chain for the web messaging client.
pub fn default_lookup_chain() -> Vec<LookupStrategy> {
    vec![
        LookupStrategy::new(
            "conversation-panel",
            r#"[data-testid="conversation-panel-messages"]"#,
        ),
        LookupStrategy::new(
            "copyable-area",
            r#"#main div.copyable-area > div[tabindex="0"]"#,
        ),
        LookupStrategy::new("application-role", r#"#main [role="application"]"#),
    ]
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            settle_delay_ms: default_settle_delay_ms(),
            limit_policy: LimitPolicy::default(),
            lookup: default_lookup_chain(),
        }
    }
}

impl RetrieverConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Reject configurations the scroller cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == 0 {
            return Err(ConfigError::InvalidRetriever(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.lookup.is_empty() {
            return Err(ConfigError::InvalidRetriever(
                "lookup chain must contain at least one strategy".to_string(),
            ));
        }
        if let Some(blank) = self.lookup.iter().find(|s| s.selector.trim().is_empty()) {
            return Err(ConfigError::InvalidRetriever(format!(
                "lookup strategy '{}' has an empty selector",
                blank.name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_config_default_values() {
        let config = GlobalConfig::default();
        assert_eq!(config.retriever.max_attempts, 100);
        assert_eq!(config.retriever.settle_delay(), Duration::from_millis(500));
        assert_eq!(config.retriever.limit_policy, LimitPolicy::Ignore);
        assert_eq!(config.retriever.lookup.len(), 3);
        assert!(config.retriever.validate().is_ok());
    }

    #[test]
    fn test_global_config_deserialize_with_defaults() {
        let config: GlobalConfig = toml::from_str("").unwrap();
        assert_eq!(config.retriever, RetrieverConfig::default());
    }

    #[test]
    fn test_global_config_deserialize_with_values() {
        let toml_str = r#"
[retriever]
max_attempts = 20
settle_delay_ms = 250
limit_policy = "keep_latest"

[[retriever.lookup]]
name = "custom"
selector = "div.messages"
"#;
        let config: GlobalConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.retriever.max_attempts, 20);
        assert_eq!(config.retriever.settle_delay_ms, 250);
        assert_eq!(config.retriever.limit_policy, LimitPolicy::KeepLatest);
        assert_eq!(config.retriever.lookup.len(), 1);
        assert_eq!(config.retriever.lookup[0].name, "custom");
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let config = RetrieverConfig {
            max_attempts: 0,
            ..RetrieverConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_chain() {
        let config = RetrieverConfig {
            lookup: Vec::new(),
            ..RetrieverConfig::default()
        };
        assert!(config.validate().is_err());

        let config = RetrieverConfig {
            lookup: vec![LookupStrategy::new("blank", "  ")],
            ..RetrieverConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("blank"));
    }

    #[test]
    fn test_limit_policy_parse() {
        assert_eq!("ignore".parse::<LimitPolicy>().unwrap(), LimitPolicy::Ignore);
        assert_eq!(
            "keep-latest".parse::<LimitPolicy>().unwrap(),
            LimitPolicy::KeepLatest
        );
        assert!("truncate".parse::<LimitPolicy>().is_err());
        assert_eq!(LimitPolicy::KeepLatest.to_string(), "keep_latest");
    }
}
