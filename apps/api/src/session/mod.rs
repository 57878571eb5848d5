//! In-memory sessions: one draft workflow, editor state and set of image slots
//! per browser session.
//!
//! Each session sits behind its own `tokio::sync::Mutex`. Provider calls run
//! with the lock released: the `begin_*` step runs under the lock, the call is
//! awaited unlocked, and the `finish_*` step re-acquires it.

pub mod handlers;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::editor::state::{reduce, EditorAction, EditorState};
use crate::editor::text_replace::{count_matches, replace_text};
use crate::editor::theme::validate_theme;
use crate::errors::AppError;
use crate::generation::client::ContentGenerationClient;
use crate::generation::generator::{fill_approved_sections, generate_quick_page};
use crate::generation::images::{ImageJob, ImageSlot, ImageSlots};
use crate::generation::models::{DetailPage, DraftOutline, ProductInput};
use crate::generation::workflow::{DraftWorkflow, Stage};

/// DOM id of the rendered page root that export targets.
pub const EXPORT_ROOT_ID: &str = "preview-content";

/// Upper bound between two idle-session sweeps.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub workflow: DraftWorkflow,
    pub editor: EditorState,
    pub images: ImageSlots,
    last_active: Instant,
}

impl Session {
    fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Session {
            id,
            created_at: now,
            updated_at: now,
            workflow: DraftWorkflow::new(),
            editor: EditorState::default(),
            images: ImageSlots::default(),
            last_active: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.last_active = Instant::now();
    }

    /// A provider call is outstanding for the workflow or one of the images.
    fn is_busy(&self) -> bool {
        self.workflow.stage().is_busy() || !self.images.is_settled()
    }

    /// Export is possible once the page is complete and no image is still loading.
    pub fn export_ready(&self) -> bool {
        self.workflow.stage() == Stage::Complete && self.images.is_settled()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            stage: self.workflow.stage(),
            input: self.workflow.input().cloned(),
            outline: self.workflow.outline().cloned(),
            page: self.workflow.page().cloned(),
            last_error: self.workflow.last_error().map(str::to_string),
            editor: self.editor.clone(),
            images: self.images.clone(),
            export_root_id: EXPORT_ROOT_ID,
            export_ready: self.export_ready(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// The page was replaced or discarded: image slots belong to the old one.
    fn reset_page_state(&mut self) {
        self.images.clear();
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub stage: Stage,
    pub input: Option<ProductInput>,
    pub outline: Option<DraftOutline>,
    pub page: Option<DetailPage>,
    pub last_error: Option<String>,
    pub editor: EditorState,
    pub images: ImageSlots,
    pub export_root_id: &'static str,
    pub export_ready: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub type SharedSession = Arc<Mutex<Session>>;

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SharedSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(Session::new(id))));
        info!("Session {id} created");
        id
    }

    pub async fn get(&self, id: Uuid) -> Result<SharedSession, AppError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        match self.sessions.write().await.remove(&id) {
            Some(_) => {
                info!("Session {id} deleted");
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Session {id} not found"))),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drops sessions untouched for at least `ttl`. Sessions that are locked or
    /// waiting on the provider are kept. Returns how many were dropped.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, session| {
            let keep = match session.try_lock() {
                Ok(guard) => guard.is_busy() || guard.last_active.elapsed() < ttl,
                Err(_) => true,
            };
            if !keep {
                debug!("Session {id} idle for {ttl:?}, evicting");
            }
            keep
        });
        before - sessions.len()
    }
}

/// Background task: evicts idle sessions for the life of the process.
pub async fn sweep_idle_sessions(store: SessionStore, ttl: Duration) {
    let period = SWEEP_INTERVAL.min(ttl);
    loop {
        tokio::time::sleep(period).await;
        let evicted = store.evict_idle(ttl).await;
        if evicted > 0 {
            info!(
                "Evicted {evicted} idle session(s), {} remaining",
                store.len().await
            );
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Workflow operations
// ────────────────────────────────────────────────────────────────────────────

pub async fn request_draft(
    session: &SharedSession,
    client: &dyn ContentGenerationClient,
    input: ProductInput,
) -> Result<DraftOutline, AppError> {
    let input = session.lock().await.workflow.begin_draft(input)?;

    let outcome = client.generate_outline(&input).await;

    let mut guard = session.lock().await;
    guard.touch();
    guard.workflow.finish_draft(outcome).cloned()
}

pub async fn toggle_section(
    session: &SharedSession,
    index: usize,
) -> Result<DraftOutline, AppError> {
    let mut guard = session.lock().await;
    guard.touch();
    guard.workflow.toggle(index).cloned()
}

pub async fn approve_and_fill(
    session: &SharedSession,
    client: &dyn ContentGenerationClient,
) -> Result<DetailPage, AppError> {
    let request = session.lock().await.workflow.begin_fill()?;

    let outcome = fill_approved_sections(client, &request.input, &request.outline).await;

    let mut guard = session.lock().await;
    guard.touch();
    let page = guard.workflow.finish_fill(outcome).cloned()?;
    complete_page(&mut guard, page.sections.len());
    Ok(page)
}

pub async fn quick_generate(
    session: &SharedSession,
    client: &dyn ContentGenerationClient,
    input: ProductInput,
) -> Result<DetailPage, AppError> {
    let input = session.lock().await.workflow.begin_quick(input)?;

    let outcome = generate_quick_page(client, &input).await;

    let mut guard = session.lock().await;
    guard.touch();
    let page = guard.workflow.finish_fill(outcome).cloned()?;
    complete_page(&mut guard, page.sections.len());
    Ok(page)
}

/// A fresh page gets one editor block per section and no image state.
fn complete_page(session: &mut Session, section_count: usize) {
    session.reset_page_state();
    let editor = std::mem::take(&mut session.editor);
    session.editor = reduce(editor, EditorAction::InitializeBlocks(section_count));
}

pub async fn back_to_form(session: &SharedSession) -> Result<SessionSnapshot, AppError> {
    let mut guard = session.lock().await;
    guard.workflow.back_to_form()?;
    guard.reset_page_state();
    guard.touch();
    Ok(guard.snapshot())
}

pub async fn back_to_draft(session: &SharedSession) -> Result<SessionSnapshot, AppError> {
    let mut guard = session.lock().await;
    guard.workflow.back_to_draft()?;
    guard.reset_page_state();
    guard.touch();
    Ok(guard.snapshot())
}

pub async fn reset(session: &SharedSession) -> Result<SessionSnapshot, AppError> {
    let mut guard = session.lock().await;
    guard.workflow.reset()?;
    guard.reset_page_state();
    guard.editor = EditorState::default();
    guard.touch();
    Ok(guard.snapshot())
}

// ────────────────────────────────────────────────────────────────────────────
// Section images
// ────────────────────────────────────────────────────────────────────────────

fn begin_image(session: &mut Session, index: usize) -> Result<ImageJob, AppError> {
    if session.workflow.stage() != Stage::Complete {
        return Err(AppError::Conflict(
            "images can only be generated for a completed page".to_string(),
        ));
    }
    let is_daily_life = session
        .workflow
        .input()
        .map(ProductInput::is_daily_life)
        .unwrap_or(false);
    let page = session
        .workflow
        .page()
        .ok_or_else(|| AppError::Conflict("no page has been generated".to_string()))?;
    let section = page.sections.get(index).ok_or_else(|| {
        AppError::Validation(format!("section index {index} is out of range"))
    })?;
    let prompt = section
        .image_prompt
        .clone()
        .ok_or_else(|| AppError::Validation(format!("section {index} has no image prompt")))?;

    Ok(ImageJob {
        index,
        prompt,
        section_type: section.section_type(),
        base_image: page.base_image.clone(),
        is_daily_life,
        generation: session.images.begin(index)?,
    })
}

/// Applies an image outcome if its slot still belongs to the current page.
fn finish_image(
    session: &mut Session,
    job: &ImageJob,
    outcome: Result<String, AppError>,
) -> Result<ImageSlot, AppError> {
    session.touch();
    let Some(slot) = session.images.finish(job.index, job.generation, &outcome) else {
        warn!(
            "Dropping image for section {} of a discarded page in session {}",
            job.index, session.id
        );
        return Err(AppError::Conflict(
            "the page was discarded while its image was generating".to_string(),
        ));
    };

    let url = outcome?;
    if let Some(section) = session
        .workflow
        .page_mut()
        .and_then(|page| page.sections.get_mut(job.index))
    {
        section.image_url = Some(url);
    }
    Ok(slot)
}

/// Generates (or regenerates) the image for one section. Other sections' slots
/// are never touched. On failure the slot records the message and the error is
/// returned.
pub async fn generate_section_image(
    session: &SharedSession,
    client: &dyn ContentGenerationClient,
    index: usize,
) -> Result<ImageSlot, AppError> {
    let job = begin_image(&mut *session.lock().await, index)?;
    debug!("Generating {} image for section {}", job.section_type, job.index);

    let outcome = client
        .generate_section_image(
            &job.prompt,
            job.section_type,
            job.base_image.as_deref(),
            job.is_daily_life,
        )
        .await;

    finish_image(&mut *session.lock().await, &job, outcome)
}

// ────────────────────────────────────────────────────────────────────────────
// Editor
// ────────────────────────────────────────────────────────────────────────────

pub async fn dispatch_editor(
    session: &SharedSession,
    action: EditorAction,
) -> Result<EditorState, AppError> {
    if let EditorAction::UpdateTheme(theme) = &action {
        validate_theme(theme)?;
    }

    let mut guard = session.lock().await;
    let editor = std::mem::take(&mut guard.editor);
    guard.editor = reduce(editor, action);
    guard.touch();
    Ok(guard.editor.clone())
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplaceResult {
    pub replaced: usize,
    pub page: DetailPage,
}

fn editable_page(session: &mut Session) -> Result<&mut DetailPage, AppError> {
    if session.workflow.stage() != Stage::Complete {
        return Err(AppError::Conflict("there is no completed page to edit".to_string()));
    }
    session
        .workflow
        .page_mut()
        .ok_or_else(|| AppError::Conflict("there is no completed page to edit".to_string()))
}

pub async fn replace_page_text(
    session: &SharedSession,
    search: &str,
    replacement: &str,
    replace_all: bool,
) -> Result<ReplaceResult, AppError> {
    let mut guard = session.lock().await;
    let page = editable_page(&mut guard)?;
    let replaced = replace_text(page, search, replacement, replace_all)?;
    let page = page.clone();

    if replaced > 0 {
        let editor = std::mem::take(&mut guard.editor);
        guard.editor = reduce(editor, EditorAction::SetDirty(true));
        guard.touch();
    }
    info!("Replaced {replaced} occurrence(s) in session {}", guard.id);
    Ok(ReplaceResult { replaced, page })
}

pub async fn search_page_text(session: &SharedSession, search: &str) -> Result<usize, AppError> {
    let mut guard = session.lock().await;
    let page = editable_page(&mut guard)?;
    count_matches(page, search)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::editor::state::EditorMode;
    use crate::editor::theme::ColorTheme;
    use crate::generation::client::testing::ScriptedClient;
    use crate::generation::models::{Purpose, SectionType, Tone};

    fn input() -> ProductInput {
        ProductInput {
            name: "Collagen Peptide".to_string(),
            category: "Health Food".to_string(),
            features: String::new(),
            target_audience: String::new(),
            tone: Tone::Professional,
            base_image: Some("data:image/png;base64,AAAA".to_string()),
            purpose: Purpose::Nutrition,
            purpose_details: None,
        }
    }

    fn full_client() -> ScriptedClient {
        ScriptedClient::new()
            .with_canonical_outline()
            .with_echo_detail()
            .with_auto_content()
    }

    async fn completed(client: &ScriptedClient) -> SharedSession {
        let store = SessionStore::new();
        let id = store.create().await;
        let session = store.get(id).await.unwrap();
        request_draft(&session, client, input()).await.unwrap();
        approve_and_fill(&session, client).await.unwrap();
        session
    }

    #[tokio::test]
    async fn test_store_create_get_remove() {
        let store = SessionStore::new();
        let id = store.create().await;
        assert_eq!(store.len().await, 1);
        assert!(store.get(id).await.is_ok());

        store.remove(id).await.unwrap();
        assert!(matches!(store.get(id).await, Err(AppError::NotFound(_))));
        assert!(matches!(store.remove(id).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_completed_page_initializes_editor_and_export() {
        let client = full_client();
        let session = completed(&client).await;

        let snapshot = session.lock().await.snapshot();
        assert_eq!(snapshot.stage, Stage::Complete);
        assert_eq!(snapshot.editor.blocks.len(), 10);
        assert!(!snapshot.editor.is_dirty);
        assert_eq!(snapshot.export_root_id, "preview-content");
        assert!(snapshot.export_ready);
    }

    #[tokio::test]
    async fn test_image_success_sets_url_on_section() {
        let client = full_client().with_image("data:image/png;base64,IMG");
        let session = completed(&client).await;

        let slot = generate_section_image(&session, &client, 0).await.unwrap();

        assert_eq!(
            slot,
            ImageSlot::Ready {
                url: "data:image/png;base64,IMG".to_string()
            }
        );
        let guard = session.lock().await;
        let page = guard.workflow.page().unwrap();
        assert_eq!(page.sections[0].image_url.as_deref(), Some("data:image/png;base64,IMG"));
        assert!(page.sections[1].image_url.is_none());
    }

    #[tokio::test]
    async fn test_image_failure_is_isolated_and_retryable() {
        let client = full_client();
        let session = completed(&client).await;

        let result = generate_section_image(&session, &client, 1).await;
        assert!(matches!(result, Err(AppError::ImageGeneration(_))));
        {
            let guard = session.lock().await;
            assert!(matches!(guard.images.get(1), Some(ImageSlot::Failed { .. })));
            assert!(guard.images.get(0).is_none());
            assert!(guard.export_ready());
        }

        *client.image.lock().unwrap() = Some("data:image/png;base64,OK".to_string());
        let retried = generate_section_image(&session, &client, 1).await.unwrap();
        assert!(matches!(retried, ImageSlot::Ready { .. }));
        assert_eq!(client.image_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_image_requires_prompt_and_valid_index() {
        let client = full_client().with_image("url");
        let session = completed(&client).await;

        // FAQ sections carry no image prompt
        let faq_index = {
            let guard = session.lock().await;
            guard
                .workflow
                .page()
                .unwrap()
                .sections
                .iter()
                .position(|s| s.section_type() == SectionType::Faq)
                .unwrap()
        };
        assert!(matches!(
            generate_section_image(&session, &client, faq_index).await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            generate_section_image(&session, &client, 99).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(client.image_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_back_to_draft_clears_image_slots() {
        let client = full_client().with_image("url");
        let session = completed(&client).await;
        generate_section_image(&session, &client, 0).await.unwrap();

        let snapshot = back_to_draft(&session).await.unwrap();

        assert_eq!(snapshot.stage, Stage::Reviewing);
        assert!(snapshot.page.is_none());
        assert!(session.lock().await.images.get(0).is_none());
        assert!(!snapshot.export_ready);
    }

    #[tokio::test]
    async fn test_image_from_discarded_page_never_reaches_new_page() {
        let client = full_client();
        let session = completed(&client).await;
        let stale = begin_image(&mut *session.lock().await, 0).unwrap();

        back_to_draft(&session).await.unwrap();
        approve_and_fill(&session, &client).await.unwrap();
        let current = begin_image(&mut *session.lock().await, 0).unwrap();

        let late = finish_image(
            &mut *session.lock().await,
            &stale,
            Ok("data:image/png;base64,OLD".to_string()),
        );
        assert!(matches!(late, Err(AppError::Conflict(_))));
        {
            let guard = session.lock().await;
            assert_eq!(guard.images.get(0), Some(&ImageSlot::Loading));
            assert!(guard.workflow.page().unwrap().sections[0].image_url.is_none());
            assert!(!guard.export_ready());
        }

        let slot = finish_image(
            &mut *session.lock().await,
            &current,
            Ok("data:image/png;base64,NEW".to_string()),
        )
        .unwrap();
        assert_eq!(
            slot,
            ImageSlot::Ready {
                url: "data:image/png;base64,NEW".to_string()
            }
        );
        let guard = session.lock().await;
        assert_eq!(
            guard.workflow.page().unwrap().sections[0].image_url.as_deref(),
            Some("data:image/png;base64,NEW")
        );
        assert!(guard.export_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_idle_keeps_recent_and_busy_sessions() {
        let store = SessionStore::new();
        let idle = store.create().await;
        let recent = store.create().await;
        let busy = store.create().await;
        store
            .get(busy)
            .await
            .unwrap()
            .lock()
            .await
            .workflow
            .begin_draft(input())
            .unwrap();

        tokio::time::advance(Duration::from_secs(40 * 60)).await;
        let session = store.get(recent).await.unwrap();
        dispatch_editor(&session, EditorAction::SetMode(EditorMode::Edit))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(30 * 60)).await;

        let evicted = store.evict_idle(Duration::from_secs(60 * 60)).await;

        assert_eq!(evicted, 1);
        assert!(matches!(store.get(idle).await, Err(AppError::NotFound(_))));
        assert!(store.get(recent).await.is_ok());
        assert!(store.get(busy).await.is_ok());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_task_evicts_abandoned_sessions() {
        let store = SessionStore::new();
        let id = store.create().await;
        let sweeper = tokio::spawn(sweep_idle_sessions(store.clone(), Duration::from_secs(120)));

        tokio::time::sleep(Duration::from_secs(90)).await;
        assert!(store.get(id).await.is_ok());

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(matches!(store.get(id).await, Err(AppError::NotFound(_))));
        sweeper.abort();
    }

    #[tokio::test]
    async fn test_replace_marks_editor_dirty() {
        let client = full_client();
        let session = completed(&client).await;

        let result = replace_page_text(&session, "HERO HEADLINE", "Glow from within", false)
            .await
            .unwrap();

        assert_eq!(result.replaced, 1);
        assert_eq!(result.page.sections[0].title, "Glow from within");
        let guard = session.lock().await;
        assert!(guard.editor.is_dirty);
        assert_eq!(guard.workflow.page().unwrap().sections[0].title, "Glow from within");
    }

    #[tokio::test]
    async fn test_replace_without_page_conflicts() {
        let store = SessionStore::new();
        let session = store.get(store.create().await).await.unwrap();
        assert!(matches!(
            replace_page_text(&session, "a", "b", true).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_editor_dispatch_validates_theme_colors() {
        let store = SessionStore::new();
        let session = store.get(store.create().await).await.unwrap();

        let bad = ColorTheme {
            id: "custom".to_string(),
            name: "Custom".to_string(),
            primary: "green".to_string(),
            secondary: "#81C784".to_string(),
            accent: None,
        };
        assert!(matches!(
            dispatch_editor(&session, EditorAction::UpdateTheme(bad)).await,
            Err(AppError::Validation(_))
        ));

        let state = dispatch_editor(&session, EditorAction::SetMode(EditorMode::Edit))
            .await
            .unwrap();
        assert_eq!(state.mode, EditorMode::Edit);
    }

    #[tokio::test]
    async fn test_reset_restores_fresh_session() {
        let client = full_client();
        let session = completed(&client).await;

        let snapshot = reset(&session).await.unwrap();

        assert_eq!(snapshot.stage, Stage::Idle);
        assert!(snapshot.outline.is_none());
        assert!(snapshot.editor.blocks.is_empty());
    }
}
