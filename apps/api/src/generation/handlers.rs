//! Axum route handlers for the generation workflow.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::images::ImageSlot;
use crate::generation::models::{DetailPage, DraftOutline, ProductInput};
use crate::session;
use crate::state::AppState;

/// POST /api/v1/sessions/:id/draft
///
/// Stage 1: validates the product input and returns the outline for review.
pub async fn handle_request_draft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProductInput>,
) -> Result<Json<DraftOutline>, AppError> {
    let session = state.sessions.get(id).await?;
    let outline = session::request_draft(&session, state.generator.as_ref(), input).await?;
    Ok(Json(outline))
}

/// POST /api/v1/sessions/:id/draft/sections/:index/toggle
pub async fn handle_toggle_section(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<DraftOutline>, AppError> {
    let session = state.sessions.get(id).await?;
    Ok(Json(session::toggle_section(&session, index).await?))
}

/// POST /api/v1/sessions/:id/fill
///
/// Stage 2: expands every approved section. Either the whole page comes back or
/// nothing does.
pub async fn handle_fill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DetailPage>, AppError> {
    let session = state.sessions.get(id).await?;
    let page = session::approve_and_fill(&session, state.generator.as_ref()).await?;
    Ok(Json(page))
}

/// POST /api/v1/sessions/:id/quick-generate
pub async fn handle_quick_generate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<ProductInput>,
) -> Result<Json<DetailPage>, AppError> {
    let session = state.sessions.get(id).await?;
    let page = session::quick_generate(&session, state.generator.as_ref(), input).await?;
    Ok(Json(page))
}

/// POST /api/v1/sessions/:id/sections/:index/image
pub async fn handle_section_image(
    State(state): State<AppState>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Json<ImageSlot>, AppError> {
    let session = state.sessions.get(id).await?;
    let slot = session::generate_section_image(&session, state.generator.as_ref(), index).await?;
    Ok(Json(slot))
}
