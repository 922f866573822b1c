//! Ordered container lookup chain.
//!
//! Strategies are tried in priority order and the first one that yields an
//! element wins. A strategy the surface rejects (evaluation error) counts as
//! a miss; a broken command channel aborts the lookup.

use scrollback_types::chat::ChatHandle;
use scrollback_types::error::SurfaceError;
use scrollback_types::scroll::{ContainerRef, LookupStrategy};

use crate::surface::rendering::RenderingSurface;

/// Priority-ordered list of container lookup strategies.
#[derive(Debug, Clone)]
pub struct LookupChain {
    strategies: Vec<LookupStrategy>,
}

impl LookupChain {
    pub fn new(strategies: Vec<LookupStrategy>) -> Self {
        Self { strategies }
    }

    pub fn strategies(&self) -> &[LookupStrategy] {
        &self.strategies
    }

    /// Locate the chat's scrollable message container.
    pub async fn locate<S: RenderingSurface>(
        &self,
        surface: &S,
        chat: &ChatHandle,
    ) -> Result<Option<ContainerRef>, SurfaceError> {
        for strategy in &self.strategies {
            match surface.find_container(chat, &strategy.selector).await {
                Ok(Some(node_id)) => {
                    return Ok(Some(ContainerRef {
                        node_id,
                        strategy: strategy.name.clone(),
                    }));
                }
                Ok(None) => {
                    tracing::trace!(chat = %chat, strategy = %strategy.name, "Lookup strategy missed");
                }
                Err(err) if !err.is_channel_failure() => {
                    tracing::debug!(
                        chat = %chat,
                        strategy = %strategy.name,
                        error = %err,
                        "Lookup strategy rejected by surface; trying next"
                    );
                }
                Err(err) => return Err(err),
            }
        }
        Ok(None)
    }
}
