//! Draft workflow: the two-stage state machine behind a session.
//!
//! idle → draft_loading → reviewing → filling → complete
//!
//! Provider failures are transient: the error is recorded in `last_error` and the
//! workflow falls back to the last stable stage (idle after a failed draft,
//! reviewing after a failed fill). Network-bound steps come in `begin_*` /
//! `finish_*` pairs so callers sharing the workflow behind a lock can release
//! it while the provider call runs.

use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::client::OutlineResponse;
use crate::generation::generator::outline_from_response;
use crate::generation::models::{DetailPage, DraftOutline, ProductInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Idle,
    DraftLoading,
    Reviewing,
    Filling,
    Complete,
}

impl Stage {
    pub fn is_busy(&self) -> bool {
        matches!(self, Stage::DraftLoading | Stage::Filling)
    }
}

/// Owned inputs for a fill call, taken while the workflow is locked.
#[derive(Debug, Clone)]
pub struct FillRequest {
    pub input: ProductInput,
    pub outline: DraftOutline,
}

#[derive(Debug, Clone, Serialize)]
pub struct DraftWorkflow {
    stage: Stage,
    input: Option<ProductInput>,
    outline: Option<DraftOutline>,
    page: Option<DetailPage>,
    last_error: Option<String>,
}

impl Default for DraftWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl DraftWorkflow {
    pub fn new() -> Self {
        DraftWorkflow {
            stage: Stage::Idle,
            input: None,
            outline: None,
            page: None,
            last_error: None,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn input(&self) -> Option<&ProductInput> {
        self.input.as_ref()
    }

    pub fn outline(&self) -> Option<&DraftOutline> {
        self.outline.as_ref()
    }

    pub fn page(&self) -> Option<&DetailPage> {
        self.page.as_ref()
    }

    /// Mutable page access for editing (text replace, image URLs).
    pub fn page_mut(&mut self) -> Option<&mut DetailPage> {
        self.page.as_mut()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    fn ensure_not_busy(&self, action: &str) -> Result<(), AppError> {
        if self.stage.is_busy() {
            return Err(AppError::Conflict(format!(
                "cannot {action} while a generation request is in progress"
            )));
        }
        Ok(())
    }

    // ── Stage 1 ─────────────────────────────────────────────────────────────

    /// Validates the input and moves to `draft_loading`.
    /// Returns the input to send to the provider.
    pub fn begin_draft(&mut self, input: ProductInput) -> Result<ProductInput, AppError> {
        input.validate()?;
        self.ensure_not_busy("request a draft")?;
        if self.stage != Stage::Idle {
            return Err(AppError::Conflict(
                "go back to the product form before requesting a new draft".to_string(),
            ));
        }

        self.stage = Stage::DraftLoading;
        self.input = Some(input.clone());
        self.outline = None;
        self.page = None;
        self.last_error = None;
        Ok(input)
    }

    pub fn finish_draft(
        &mut self,
        outcome: Result<OutlineResponse, AppError>,
    ) -> Result<&DraftOutline, AppError> {
        if self.stage != Stage::DraftLoading {
            return Err(AppError::Conflict("no draft request is in progress".to_string()));
        }

        match outcome {
            Ok(response) => {
                let outline = outline_from_response(response);
                info!("Draft outline ready with {} sections", outline.sections.len());
                self.stage = Stage::Reviewing;
                Ok(self.outline.insert(outline))
            }
            Err(e) => {
                warn!("Draft request failed: {e}");
                self.stage = Stage::Idle;
                self.last_error = Some(e.message());
                Err(e)
            }
        }
    }

    /// Flips the approval flag of one outline section. Only during review.
    pub fn toggle(&mut self, index: usize) -> Result<&DraftOutline, AppError> {
        if self.stage != Stage::Reviewing {
            return Err(AppError::Conflict(
                "sections can only be toggled while reviewing the draft".to_string(),
            ));
        }
        let outline = self
            .outline
            .as_ref()
            .ok_or_else(|| AppError::Conflict("no draft outline to review".to_string()))?;
        let toggled = toggle_approval(outline, index)?;
        Ok(self.outline.insert(toggled))
    }

    // ── Stage 2 ─────────────────────────────────────────────────────────────

    /// Checks that at least one section is approved and moves to `filling`.
    pub fn begin_fill(&mut self) -> Result<FillRequest, AppError> {
        self.ensure_not_busy("fill the page")?;
        if self.stage != Stage::Reviewing {
            return Err(AppError::Conflict(
                "the draft must be under review before filling the page".to_string(),
            ));
        }

        let (Some(input), Some(outline)) = (self.input.clone(), self.outline.clone()) else {
            return Err(AppError::Conflict("no draft outline to fill".to_string()));
        };

        if outline.approved_count() == 0 {
            return Err(AppError::Validation(
                "approve at least one section before generating the page".to_string(),
            ));
        }

        self.stage = Stage::Filling;
        self.last_error = None;
        Ok(FillRequest { input, outline })
    }

    /// Applies a fill (or quick generate) outcome. A failure never leaves a
    /// partial page behind; the outline and its approval flags stay as they were.
    pub fn finish_fill(
        &mut self,
        outcome: Result<DetailPage, AppError>,
    ) -> Result<&DetailPage, AppError> {
        if self.stage != Stage::Filling {
            return Err(AppError::Conflict("no fill request is in progress".to_string()));
        }

        match outcome {
            Ok(page) => {
                info!("Detail page complete with {} sections", page.sections.len());
                self.stage = Stage::Complete;
                Ok(self.page.insert(page))
            }
            Err(e) => {
                self.stage = if self.outline.is_some() {
                    Stage::Reviewing
                } else {
                    Stage::Idle
                };
                warn!("Fill request failed, back to {:?}: {e}", self.stage);
                self.last_error = Some(e.message());
                Err(e)
            }
        }
    }

    // ── One-shot ────────────────────────────────────────────────────────────

    /// Skips review: idle → filling. Completion goes through `finish_fill`.
    pub fn begin_quick(&mut self, input: ProductInput) -> Result<ProductInput, AppError> {
        input.validate()?;
        self.ensure_not_busy("generate a page")?;
        if self.stage != Stage::Idle {
            return Err(AppError::Conflict(
                "go back to the product form before generating a new page".to_string(),
            ));
        }

        self.stage = Stage::Filling;
        self.input = Some(input.clone());
        self.outline = None;
        self.page = None;
        self.last_error = None;
        Ok(input)
    }

    // ── Navigation ──────────────────────────────────────────────────────────

    /// Discards the outline and page. The product input is kept so the form
    /// can be re-submitted.
    pub fn back_to_form(&mut self) -> Result<(), AppError> {
        self.ensure_not_busy("go back to the form")?;
        self.outline = None;
        self.page = None;
        self.last_error = None;
        self.stage = Stage::Idle;
        Ok(())
    }

    /// Discards the page and returns to the reviewed outline.
    pub fn back_to_draft(&mut self) -> Result<(), AppError> {
        self.ensure_not_busy("go back to the draft")?;
        if self.outline.is_none() {
            return Err(AppError::Conflict("there is no draft to go back to".to_string()));
        }
        self.page = None;
        self.last_error = None;
        self.stage = Stage::Reviewing;
        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), AppError> {
        self.ensure_not_busy("reset")?;
        *self = DraftWorkflow::new();
        Ok(())
    }
}

/// Returns a copy of `outline` with the flag at `index` flipped.
/// Other sections and the suggested colors are untouched.
pub fn toggle_approval(outline: &DraftOutline, index: usize) -> Result<DraftOutline, AppError> {
    if index >= outline.sections.len() {
        warn!(
            "Toggle index {index} out of range for outline with {} sections",
            outline.sections.len()
        );
        return Err(AppError::Validation(format!(
            "section index {index} is out of range"
        )));
    }

    let mut toggled = outline.clone();
    toggled.sections[index].is_approved = !toggled.sections[index].is_approved;
    Ok(toggled)
}
