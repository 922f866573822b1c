//! Search options accepted by a message retrieval.

use serde::{Deserialize, Serialize};

/// Cap on the number of returned messages.
///
/// Serialized as a number (`Count`) or `null` (`Unbounded`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<usize>", into = "Option<usize>")]
pub enum MessageLimit {
    #[default]
    Unbounded,
    Count(usize),
}

impl MessageLimit {
    pub fn count(self) -> Option<usize> {
        match self {
            MessageLimit::Unbounded => None,
            MessageLimit::Count(n) => Some(n),
        }
    }
}

impl From<Option<usize>> for MessageLimit {
    fn from(value: Option<usize>) -> Self {
        value.map_or(MessageLimit::Unbounded, MessageLimit::Count)
    }
}

impl From<MessageLimit> for Option<usize> {
    fn from(limit: MessageLimit) -> Self {
        limit.count()
    }
}

/// Caller-supplied filter for one retrieval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Desired cap on returned messages. Whether it truncates is decided by
    /// the retriever's `LimitPolicy`.
    #[serde(default)]
    pub limit: MessageLimit,
    /// Keep only messages whose authorship flag equals this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_me: Option<bool>,
}

impl SearchOptions {
    pub fn from_me(from_me: bool) -> Self {
        Self {
            from_me: Some(from_me),
            ..Self::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = MessageLimit::Count(limit);
        self
    }

    /// Whether a model with the given authorship flag passes the filter.
    pub fn accepts(&self, from_me: bool) -> bool {
        self.from_me.is_none_or(|wanted| wanted == from_me)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_without_filter() {
        let opts = SearchOptions::default();
        assert!(opts.accepts(true));
        assert!(opts.accepts(false));
    }

    #[test]
    fn test_accepts_with_filter() {
        let opts = SearchOptions::from_me(true);
        assert!(opts.accepts(true));
        assert!(!opts.accepts(false));

        let opts = SearchOptions::from_me(false);
        assert!(!opts.accepts(true));
        assert!(opts.accepts(false));
    }

    #[test]
    fn test_deserialize_defaults() {
        let opts: SearchOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts.limit, MessageLimit::Unbounded);
        assert!(opts.from_me.is_none());
    }

    #[test]
    fn test_limit_serde() {
        let opts: SearchOptions =
            serde_json::from_str(r#"{"limit": 50, "from_me": false}"#).unwrap();
        assert_eq!(opts.limit, MessageLimit::Count(50));
        assert_eq!(opts.from_me, Some(false));

        let opts: SearchOptions = serde_json::from_str(r#"{"limit": null}"#).unwrap();
        assert_eq!(opts.limit, MessageLimit::Unbounded);

        let json = serde_json::to_string(&SearchOptions::default().with_limit(3)).unwrap();
        assert_eq!(json, r#"{"limit":3}"#);
    }
}
