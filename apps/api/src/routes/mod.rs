pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::editor::handlers as editor;
use crate::generation::handlers as generation;
use crate::session::handlers as sessions;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(sessions::handle_get_session).delete(sessions::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/back-to-form",
            post(sessions::handle_back_to_form),
        )
        .route(
            "/api/v1/sessions/:id/back-to-draft",
            post(sessions::handle_back_to_draft),
        )
        .route("/api/v1/sessions/:id/reset", post(sessions::handle_reset))
        // Generation workflow
        .route(
            "/api/v1/sessions/:id/draft",
            post(generation::handle_request_draft),
        )
        .route(
            "/api/v1/sessions/:id/draft/sections/:index/toggle",
            post(generation::handle_toggle_section),
        )
        .route("/api/v1/sessions/:id/fill", post(generation::handle_fill))
        .route(
            "/api/v1/sessions/:id/quick-generate",
            post(generation::handle_quick_generate),
        )
        .route(
            "/api/v1/sessions/:id/sections/:index/image",
            post(generation::handle_section_image),
        )
        // Editor
        .route("/api/v1/themes", get(editor::handle_list_themes))
        .route(
            "/api/v1/sessions/:id/editor",
            post(editor::handle_editor_action),
        )
        .route(
            "/api/v1/sessions/:id/theme/custom",
            post(editor::handle_custom_theme),
        )
        .route(
            "/api/v1/sessions/:id/text-replace",
            post(editor::handle_text_replace),
        )
        .route(
            "/api/v1/sessions/:id/text-search",
            post(editor::handle_text_search),
        )
        .with_state(state)
}
