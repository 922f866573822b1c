//! RenderingSurface trait definition.
//!
//! Uses RPITIT for every command. Object-safe dispatch goes through
//! `BoxRenderingSurface`.

use std::future::Future;

use scrollback_types::chat::{ChatHandle, SessionInfo};
use scrollback_types::error::{RecordError, SurfaceError};
use scrollback_types::message::{MessageModel, RawMessageRecord};
use scrollback_types::scroll::ContainerRef;

/// Commands and queries the retriever issues against a live session UI.
///
/// Every method that talks to the surface returns `SurfaceError` only when
/// the command channel fails. Absence (no container, no store) is expressed
/// through `Option`, and per-record serialization failures through the inner
/// `Result` of `serialize_models`.
pub trait RenderingSurface: Send + Sync {
    /// Human-readable surface name (e.g. "snapshot", "cdp").
    fn name(&self) -> &str;

    /// The session every retrieved message is bound to.
    fn session(&self) -> &SessionInfo;

    /// Query the chat's view for an element matching `selector`.
    ///
    /// Returns the surface's node reference for the first match.
    fn find_container(
        &self,
        chat: &ChatHandle,
        selector: &str,
    ) -> impl Future<Output = Result<Option<String>, SurfaceError>> + Send;

    /// Full scrollable height of the container.
    fn scroll_extent(
        &self,
        container: &ContainerRef,
    ) -> impl Future<Output = Result<u64, SurfaceError>> + Send;

    /// Scroll the container to its origin (oldest messages).
    ///
    /// Resolves once the surface acknowledges the command; older messages
    /// may keep materializing asynchronously afterwards.
    fn scroll_to_origin(
        &self,
        container: &ContainerRef,
    ) -> impl Future<Output = Result<(), SurfaceError>> + Send;

    /// Read the chat's in-memory message collection, earliest first.
    ///
    /// `Ok(None)` means the surface does not expose a message store.
    fn message_models(
        &self,
        chat: &ChatHandle,
    ) -> impl Future<Output = Result<Option<Vec<MessageModel>>, SurfaceError>> + Send;

    /// Serialize models with the surface's own serializer in one batch.
    ///
    /// The returned vector is index-aligned with `models`.
    fn serialize_models(
        &self,
        chat: &ChatHandle,
        models: &[MessageModel],
    ) -> impl Future<Output = Result<Vec<Result<RawMessageRecord, RecordError>>, SurfaceError>> + Send;
}
