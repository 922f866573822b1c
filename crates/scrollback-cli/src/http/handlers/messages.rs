//! Chat message retrieval endpoint.

use axum::Json;
use axum::extract::{Path, Query, State};

use scrollback_core::retriever::Retrieval;
use scrollback_types::chat::ChatHandle;

use crate::http::error::AppError;
use crate::http::extractors::query::MessageQuery;
use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

/// GET /api/v1/chats/{chat}/messages - Scroll the chat to its origin and
/// return every message, earliest first.
///
/// Retrievals of the same chat are serialized; different chats run
/// concurrently.
pub async fn get_messages(
    State(state): State<AppState>,
    Path(chat): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Result<Json<ApiResponse<Retrieval>>, AppError> {
    let timer = RequestTimer::start();

    let handle: ChatHandle = chat.parse()?;
    let options = query.into_options()?;

    if !state.surface().contains(&handle) {
        return Err(AppError::ChatNotFound(handle.to_string()));
    }

    let lock = state.chat_lock(&handle);
    let _guard = lock.lock().await;

    let retrieval = state.retriever.retrieve(&handle, &options).await?;

    let resp = ApiResponse::success(retrieval, &timer)
        .with_link("self", &format!("/api/v1/chats/{handle}/messages"));

    Ok(Json(resp))
}
