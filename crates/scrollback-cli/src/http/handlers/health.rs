//! Health endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use uuid::Uuid;

use scrollback_core::surface::rendering::RenderingSurface;

use crate::http::response::{ApiResponse, RequestTimer};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub surface: String,
    pub session_id: Uuid,
    pub chats: usize,
    pub limit_policy: String,
}

/// GET /api/v1/health - Report whether the surface still accepts commands.
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<Health>> {
    let timer = RequestTimer::start();
    let surface = state.surface();

    let health = Health {
        status: if surface.is_closed() { "disconnected" } else { "ok" },
        surface: surface.name().to_string(),
        session_id: surface.session().id,
        chats: surface.chats().len(),
        limit_policy: state.config.retriever.limit_policy.to_string(),
    };

    Json(ApiResponse::success(health, &timer).with_link("self", "/api/v1/health"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::handlers::testing::state;

    #[tokio::test]
    async fn reports_surface_state() {
        let state = state();
        let Json(resp) = health(State(state.clone())).await;
        let body = resp.data.unwrap();
        assert_eq!(body.status, "ok");
        assert_eq!(body.surface, "snapshot");
        assert_eq!(body.chats, 1);
        assert_eq!(body.limit_policy, "ignore");

        state.surface().close();
        let Json(resp) = health(State(state)).await;
        assert_eq!(resp.data.unwrap().status, "disconnected");
    }
}
