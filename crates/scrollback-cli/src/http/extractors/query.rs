//! Query parameter extractors.

use serde::Deserialize;

use scrollback_types::search::SearchOptions;

use crate::http::error::AppError;

/// Query parameters for the chat messages endpoint.
#[derive(Debug, Deserialize, Default)]
pub struct MessageQuery {
    /// Keep only messages sent (true) or received (false) by the session.
    pub from_me: Option<bool>,
    /// Requested maximum number of messages.
    pub limit: Option<usize>,
}

impl MessageQuery {
    pub fn into_options(self) -> Result<SearchOptions, AppError> {
        let mut options = SearchOptions {
            from_me: self.from_me,
            ..SearchOptions::default()
        };
        match self.limit {
            Some(0) => {
                return Err(AppError::Validation(
                    "limit must be at least 1".to_string(),
                ));
            }
            Some(limit) => options = options.with_limit(limit),
            None => {}
        }
        Ok(options)
    }
}
