//! Global configuration loader for Scrollback.
//!
//! Reads `config.toml` from the data directory (`~/.scrollback/` in
//! production) and deserializes it into [`GlobalConfig`]. Falls back to
//! sensible defaults when the file is missing, malformed, or invalid.

use std::path::Path;

use scrollback_types::config::{GlobalConfig, RetrieverConfig, default_lookup_chain};

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the retriever section is invalid, logs a warning and repairs it
///   (see [`sanitize_retriever`]).
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(mut config) => {
            config.retriever = sanitize_retriever(config.retriever);
            config
        }
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Repair a retriever section that would fail validation.
///
/// - `max_attempts = 0` becomes the default budget.
/// - An empty lookup chain becomes the built-in chain.
/// - Strategies with blank selectors are dropped.
pub fn sanitize_retriever(mut config: RetrieverConfig) -> RetrieverConfig {
    if config.max_attempts == 0 {
        tracing::warn!("retriever.max_attempts must be at least 1; using default");
        config.max_attempts = RetrieverConfig::default().max_attempts;
    }

    let before = config.lookup.len();
    config.lookup.retain(|s| !s.selector.trim().is_empty());
    if config.lookup.len() != before {
        tracing::warn!(
            dropped = before - config.lookup.len(),
            "Ignoring lookup strategies with empty selectors"
        );
    }

    if config.lookup.is_empty() {
        tracing::warn!("retriever.lookup is empty; using built-in lookup chain");
        config.lookup = default_lookup_chain();
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollback_types::config::LimitPolicy;
    use scrollback_types::scroll::LookupStrategy;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_global_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.retriever, RetrieverConfig::default());
    }

    #[tokio::test]
    async fn load_global_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(
            &config_path,
            r##"
[retriever]
max_attempts = 12
settle_delay_ms = 100
limit_policy = "keep_latest"

[[retriever.lookup]]
name = "panel"
selector = "#panel"
"##,
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.retriever.max_attempts, 12);
        assert_eq!(config.retriever.settle_delay_ms, 100);
        assert_eq!(config.retriever.limit_policy, LimitPolicy::KeepLatest);
        assert_eq!(config.retriever.lookup, vec![LookupStrategy::new("panel", "#panel")]);
    }

    #[tokio::test]
    async fn load_global_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.retriever, RetrieverConfig::default());
    }

    #[tokio::test]
    async fn load_global_config_repairs_invalid_values() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            "[retriever]\nmax_attempts = 0\nlookup = []\n",
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.retriever.max_attempts, 100);
        assert_eq!(config.retriever.lookup, default_lookup_chain());
        assert!(config.retriever.validate().is_ok());
    }

    #[test]
    fn sanitize_retriever_drops_blank_selectors() {
        let config = RetrieverConfig {
            lookup: vec![
                LookupStrategy::new("blank", " "),
                LookupStrategy::new("panel", "#panel"),
            ],
            ..RetrieverConfig::default()
        };
        let config = sanitize_retriever(config);
        assert_eq!(config.lookup.len(), 1);
        assert_eq!(config.lookup[0].name, "panel");
    }
}
