//! Convergence scrolling types.
//!
//! The scroller repeatedly scrolls a conversation container to its origin and
//! watches the container's extent until it stops growing. These types carry
//! the per-attempt measurements and the final outcome.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A named way of locating the scrollable message container.
///
/// Strategies are tried in configuration order; the first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupStrategy {
    pub name: String,
    pub selector: String,
}

impl LookupStrategy {
    pub fn new(name: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            selector: selector.into(),
        }
    }
}

/// A container located on the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRef {
    /// Surface-specific node reference.
    pub node_id: String,
    /// Name of the lookup strategy that found it.
    pub strategy: String,
}

/// One attempt's measurement. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollProbe {
    pub found: bool,
    pub before_extent: u64,
    pub after_extent: u64,
}

/// Why the scroller stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceOutcome {
    /// Extent did not change since the previous attempt.
    Stable,
    /// No lookup strategy matched a container.
    ContainerNotFound,
    /// The attempt budget ran out before the extent stabilized.
    AttemptsExhausted,
}

impl fmt::Display for ConvergenceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvergenceOutcome::Stable => write!(f, "stable"),
            ConvergenceOutcome::ContainerNotFound => write!(f, "container_not_found"),
            ConvergenceOutcome::AttemptsExhausted => write!(f, "attempts_exhausted"),
        }
    }
}

/// Result of one convergence run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvergenceReport {
    pub outcome: ConvergenceOutcome,
    /// Attempts that observed growth.
    pub attempts: u32,
    /// Extent recorded by the last growing attempt (0 when none grew).
    pub last_extent: u64,
    /// Lookup strategy that matched on the last attempt, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
}

impl ConvergenceReport {
    pub fn is_stable(&self) -> bool {
        self.outcome == ConvergenceOutcome::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_display_matches_serde() {
        for outcome in [
            ConvergenceOutcome::Stable,
            ConvergenceOutcome::ContainerNotFound,
            ConvergenceOutcome::AttemptsExhausted,
        ] {
            let json = serde_json::to_string(&outcome).unwrap();
            assert_eq!(json, format!("\"{outcome}\""));
        }
    }

    #[test]
    fn test_report_strategy_omitted_when_none() {
        let report = ConvergenceReport {
            outcome: ConvergenceOutcome::ContainerNotFound,
            attempts: 0,
            last_extent: 0,
            strategy: None,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("strategy"));
        assert!(!report.is_stable());
    }
}
