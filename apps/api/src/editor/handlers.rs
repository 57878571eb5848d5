use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::editor::state::{EditorAction, EditorState};
use crate::editor::theme::{custom_theme, preset_themes, ColorTheme};
use crate::errors::AppError;
use crate::session::{self, ReplaceResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextReplaceRequest {
    pub search: String,
    #[serde(default)]
    pub replacement: String,
    #[serde(default)]
    pub replace_all: bool,
}

#[derive(Debug, Deserialize)]
pub struct CustomThemeRequest {
    pub primary: String,
    pub secondary: String,
}

#[derive(Debug, Deserialize)]
pub struct TextSearchRequest {
    pub search: String,
}

#[derive(Debug, Serialize)]
pub struct TextSearchResponse {
    pub matches: usize,
}

/// POST /api/v1/sessions/:id/editor
pub async fn handle_editor_action(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(action): Json<EditorAction>,
) -> Result<Json<EditorState>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(session::dispatch_editor(&session, action).await?))
}

/// GET /api/v1/themes
pub async fn handle_list_themes() -> Json<Vec<ColorTheme>> {
    Json(preset_themes())
}

/// POST /api/v1/sessions/:id/theme/custom
///
/// Applies user-picked colors as the active theme.
pub async fn handle_custom_theme(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CustomThemeRequest>,
) -> Result<Json<EditorState>, AppError> {
    let theme = custom_theme(&req.primary, &req.secondary)?;
    let session = state.sessions.get(id).await?;
    let editor = session::dispatch_editor(&session, EditorAction::UpdateTheme(theme)).await?;
    Ok(Json(editor))
}

/// POST /api/v1/sessions/:id/text-replace
pub async fn handle_text_replace(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TextReplaceRequest>,
) -> Result<Json<ReplaceResult>, AppError> {
    let session = state.sessions.get(id).await?;
    let result =
        session::replace_page_text(&session, &req.search, &req.replacement, req.replace_all)
            .await?;
    Ok(Json(result))
}

/// POST /api/v1/sessions/:id/text-search
///
/// Match count preview before replacing.
pub async fn handle_text_search(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<TextSearchRequest>,
) -> Result<Json<TextSearchResponse>, AppError> {
    let session = state.sessions.get(id).await?;
    let matches = session::search_page_text(&session, &req.search).await?;
    Ok(Json(TextSearchResponse { matches }))
}
