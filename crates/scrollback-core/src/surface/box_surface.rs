//! BoxRenderingSurface -- object-safe dynamic dispatch wrapper for RenderingSurface.
//!
//! 1. Define an object-safe `RenderingSurfaceDyn` trait with boxed futures
//! 2. Blanket-impl `RenderingSurfaceDyn` for all `T: RenderingSurface`
//! 3. `BoxRenderingSurface` wraps `Box<dyn RenderingSurfaceDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use scrollback_types::chat::{ChatHandle, SessionInfo};
use scrollback_types::error::{RecordError, SurfaceError};
use scrollback_types::message::{MessageModel, RawMessageRecord};
use scrollback_types::scroll::ContainerRef;

use super::rendering::RenderingSurface;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

type SerializedBatch = Vec<Result<RawMessageRecord, RecordError>>;

/// Object-safe version of [`RenderingSurface`] with boxed futures.
pub trait RenderingSurfaceDyn: Send + Sync {
    fn name(&self) -> &str;

    fn session(&self) -> &SessionInfo;

    fn find_container_boxed<'a>(
        &'a self,
        chat: &'a ChatHandle,
        selector: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, SurfaceError>>;

    fn scroll_extent_boxed<'a>(
        &'a self,
        container: &'a ContainerRef,
    ) -> BoxFuture<'a, Result<u64, SurfaceError>>;

    fn scroll_to_origin_boxed<'a>(
        &'a self,
        container: &'a ContainerRef,
    ) -> BoxFuture<'a, Result<(), SurfaceError>>;

    fn message_models_boxed<'a>(
        &'a self,
        chat: &'a ChatHandle,
    ) -> BoxFuture<'a, Result<Option<Vec<MessageModel>>, SurfaceError>>;

    fn serialize_models_boxed<'a>(
        &'a self,
        chat: &'a ChatHandle,
        models: &'a [MessageModel],
    ) -> BoxFuture<'a, Result<SerializedBatch, SurfaceError>>;
}

/// Blanket implementation: any `RenderingSurface` automatically implements `RenderingSurfaceDyn`.
impl<T: RenderingSurface> RenderingSurfaceDyn for T {
    fn name(&self) -> &str {
        RenderingSurface::name(self)
    }

    fn session(&self) -> &SessionInfo {
        RenderingSurface::session(self)
    }

    fn find_container_boxed<'a>(
        &'a self,
        chat: &'a ChatHandle,
        selector: &'a str,
    ) -> BoxFuture<'a, Result<Option<String>, SurfaceError>> {
        Box::pin(self.find_container(chat, selector))
    }

    fn scroll_extent_boxed<'a>(
        &'a self,
        container: &'a ContainerRef,
    ) -> BoxFuture<'a, Result<u64, SurfaceError>> {
        Box::pin(self.scroll_extent(container))
    }

    fn scroll_to_origin_boxed<'a>(
        &'a self,
        container: &'a ContainerRef,
    ) -> BoxFuture<'a, Result<(), SurfaceError>> {
        Box::pin(self.scroll_to_origin(container))
    }

    fn message_models_boxed<'a>(
        &'a self,
        chat: &'a ChatHandle,
    ) -> BoxFuture<'a, Result<Option<Vec<MessageModel>>, SurfaceError>> {
        Box::pin(self.message_models(chat))
    }

    fn serialize_models_boxed<'a>(
        &'a self,
        chat: &'a ChatHandle,
        models: &'a [MessageModel],
    ) -> BoxFuture<'a, Result<SerializedBatch, SurfaceError>> {
        Box::pin(self.serialize_models(chat, models))
    }
}

/// Type-erased rendering surface for runtime surface selection.
///
/// Implements [`RenderingSurface`] itself, so a `MessageRetriever` can be
/// built over it without knowing the concrete surface type.
pub struct BoxRenderingSurface {
    inner: Box<dyn RenderingSurfaceDyn + Send + Sync>,
}

impl BoxRenderingSurface {
    /// Wrap a concrete `RenderingSurface` in a type-erased box.
    pub fn new<T: RenderingSurface + 'static>(surface: T) -> Self {
        Self {
            inner: Box::new(surface),
        }
    }
}

impl RenderingSurface for BoxRenderingSurface {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn session(&self) -> &SessionInfo {
        self.inner.session()
    }

    async fn find_container(
        &self,
        chat: &ChatHandle,
        selector: &str,
    ) -> Result<Option<String>, SurfaceError> {
        self.inner.find_container_boxed(chat, selector).await
    }

    async fn scroll_extent(&self, container: &ContainerRef) -> Result<u64, SurfaceError> {
        self.inner.scroll_extent_boxed(container).await
    }

    async fn scroll_to_origin(&self, container: &ContainerRef) -> Result<(), SurfaceError> {
        self.inner.scroll_to_origin_boxed(container).await
    }

    async fn message_models(
        &self,
        chat: &ChatHandle,
    ) -> Result<Option<Vec<MessageModel>>, SurfaceError> {
        self.inner.message_models_boxed(chat).await
    }

    async fn serialize_models(
        &self,
        chat: &ChatHandle,
        models: &[MessageModel],
    ) -> Result<SerializedBatch, SurfaceError> {
        self.inner.serialize_models_boxed(chat, models).await
    }
}
