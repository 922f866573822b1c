//! Application state shared by CLI commands and REST API handlers.
//!
//! Pins the retriever to the snapshot surface and holds the per-chat locks
//! that keep concurrent retrievals of the same chat from interleaving.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use dashmap::DashMap;
use tokio::sync::Mutex;

use scrollback_core::cache::ConvergenceCache;
use scrollback_core::retriever::MessageRetriever;
use scrollback_infra::config::load_global_config;
use scrollback_infra::filesystem::resolve_data_dir;
use scrollback_infra::snapshot::SnapshotSurface;
use scrollback_types::chat::ChatHandle;
use scrollback_types::config::GlobalConfig;

/// Default snapshot file name inside the data directory.
const DEFAULT_SNAPSHOT: &str = "session.json";

pub type ConcreteRetriever = MessageRetriever<SnapshotSurface>;

#[derive(Clone)]
pub struct AppState {
    pub retriever: Arc<ConcreteRetriever>,
    pub config: Arc<GlobalConfig>,
    chat_locks: Arc<DashMap<ChatHandle, Arc<Mutex<()>>>>,
}

impl AppState {
    /// Resolve the data directory, load config, and open the snapshot.
    ///
    /// `snapshot` overrides `{data_dir}/session.json`.
    pub async fn init(snapshot: Option<&Path>) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir)
            .await
            .with_context(|| format!("failed to create data dir {}", data_dir.display()))?;

        let config = load_global_config(&data_dir).await;
        tracing::debug!(data_dir = %data_dir.display(), "Loaded configuration");

        let snapshot_path = snapshot
            .map(Path::to_path_buf)
            .unwrap_or_else(|| data_dir.join(DEFAULT_SNAPSHOT));
        let surface = SnapshotSurface::load(&snapshot_path)
            .await
            .context("failed to open session snapshot (pass --snapshot <file>)")?;

        Self::from_parts(surface, config)
    }

    pub fn from_parts(surface: SnapshotSurface, config: GlobalConfig) -> anyhow::Result<Self> {
        let retriever = MessageRetriever::new(surface, &config.retriever)
            .context("invalid retriever configuration")?
            .with_cache(Arc::new(ConvergenceCache::new()));

        Ok(Self {
            retriever: Arc::new(retriever),
            config: Arc::new(config),
            chat_locks: Arc::new(DashMap::new()),
        })
    }

    pub fn surface(&self) -> &SnapshotSurface {
        self.retriever.surface()
    }

    /// Lock serializing retrievals of one chat.
    pub fn chat_lock(&self, chat: &ChatHandle) -> Arc<Mutex<()>> {
        self.chat_locks.entry(chat.clone()).or_default().clone()
    }
}
