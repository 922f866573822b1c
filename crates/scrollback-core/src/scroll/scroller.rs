//! Convergence scroller.
//!
//! Repeatedly scrolls the chat's message container to its origin and stops
//! when the container's extent no longer grows, when no container can be
//! found, or when the attempt budget runs out. None of these outcomes is an
//! error: the extractor runs afterwards regardless, so partial history is
//! still returned.

use std::time::Duration;

use scrollback_types::chat::ChatHandle;
use scrollback_types::config::RetrieverConfig;
use scrollback_types::error::SurfaceError;
use scrollback_types::scroll::{ConvergenceOutcome, ConvergenceReport, ScrollProbe};

use crate::observer::RetrievalObserver;
use crate::scroll::lookup::LookupChain;
use crate::surface::rendering::RenderingSurface;

/// Bounded convergence loop over a rendering surface.
///
/// Holds configuration only. All loop state (`previous_extent`, `attempts`)
/// lives inside a single `run` call.
#[derive(Debug, Clone)]
pub struct ConvergenceScroller {
    chain: LookupChain,
    max_attempts: u32,
    settle_delay: Duration,
}

impl ConvergenceScroller {
    pub fn new(chain: LookupChain, max_attempts: u32, settle_delay: Duration) -> Self {
        Self {
            chain,
            max_attempts,
            settle_delay,
        }
    }

    pub fn from_config(config: &RetrieverConfig) -> Self {
        Self::new(
            LookupChain::new(config.lookup.clone()),
            config.max_attempts,
            config.settle_delay(),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Scroll until the chat's history stops growing.
    ///
    /// Only a broken command channel is returned as an error.
    pub async fn run<S, O>(
        &self,
        surface: &S,
        observer: &O,
        chat: &ChatHandle,
    ) -> Result<ConvergenceReport, SurfaceError>
    where
        S: RenderingSurface,
        O: RetrievalObserver,
    {
        let mut previous_extent: u64 = 0;
        let mut attempts: u32 = 0;
        let mut strategy: Option<String> = None;

        let outcome = loop {
            if attempts >= self.max_attempts {
                break ConvergenceOutcome::AttemptsExhausted;
            }

            let Some(container) = self.chain.locate(surface, chat).await? else {
                observer.container_missing(chat, self.chain.strategies());
                break ConvergenceOutcome::ContainerNotFound;
            };
            strategy = Some(container.strategy.clone());

            let before_extent = surface.scroll_extent(&container).await?;
            surface.scroll_to_origin(&container).await?;
            let after_extent = surface.scroll_extent(&container).await?;

            let probe = ScrollProbe {
                found: true,
                before_extent,
                after_extent,
            };
            observer.attempt(chat, attempts + 1, &probe);

            if after_extent == previous_extent {
                break ConvergenceOutcome::Stable;
            }

            previous_extent = after_extent;
            attempts += 1;

            if attempts < self.max_attempts && !self.settle_delay.is_zero() {
                tokio::time::sleep(self.settle_delay).await;
            }
        };

        let report = ConvergenceReport {
            outcome,
            attempts,
            last_extent: previous_extent,
            strategy,
        };
        observer.converged(chat, &report);
        Ok(report)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
