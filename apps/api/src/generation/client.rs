//! Content generation client: the narrow boundary between the workflow and the provider.
//!
//! Default: `GeminiContentClient` (prompt assembly + `LlmClient`).
//! `AppState` holds an `Arc<dyn ContentGenerationClient>`; tests swap in a scripted client.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

use crate::errors::AppError;
use crate::generation::images::build_image_prompt;
use crate::generation::models::{
    BrandColors, DetailSection, DraftSection, FaqItem, ProductInput, Purpose, SectionKind,
    SectionType,
};
use crate::generation::templates::{
    build_auto_content_prompt, build_detail_prompt, build_outline_prompt, build_page_prompt,
    PromptFamily,
};
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{LlmClient, DETAIL_MODEL, IMAGE_MODEL, OUTLINE_MODEL};

// ────────────────────────────────────────────────────────────────────────────
// Contract types
// ────────────────────────────────────────────────────────────────────────────

/// Stage 1 response. May be empty; the workflow substitutes the fallback outline.
#[derive(Debug, Clone, Default)]
pub struct OutlineResponse {
    pub sections: Vec<DraftSection>,
    pub suggested_colors: Option<BrandColors>,
}

/// Guide content as generated, before it becomes a section payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedGuide {
    #[serde(default)]
    pub title: String,
    pub expert_name: String,
    pub expert_title: String,
    #[serde(default)]
    pub tips: Vec<String>,
    pub recommendation: String,
}

/// Comparison row with raw cell values (`"O"`, `"X"` or free text).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComparisonItem {
    pub feature: String,
    pub our_product: String,
    pub competitor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedComparison {
    #[serde(default)]
    pub title: String,
    pub our_product_name: String,
    pub competitor_name: String,
    #[serde(default)]
    pub items: Vec<RawComparisonItem>,
}

/// FAQ, guide and comparison content, generated from name/category/purpose only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AutoContent {
    #[serde(default)]
    pub faq: Vec<FaqItem>,
    pub guide: GeneratedGuide,
    pub comparison: GeneratedComparison,
}

/// One-shot page response.
#[derive(Debug, Clone)]
pub struct GeneratedPage {
    pub sections: Vec<DetailSection>,
    pub brand_colors: Option<BrandColors>,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Every call is fallible and single-attempt. Errors are `AppError::Generation`
/// (or `AppError::ImageGeneration` for images) carrying the provider's message.
#[async_trait]
pub trait ContentGenerationClient: Send + Sync {
    async fn generate_outline(&self, input: &ProductInput) -> Result<OutlineResponse, AppError>;

    /// Expands the approved basic sections into full copy.
    async fn generate_detail(
        &self,
        input: &ProductInput,
        sections: &[DraftSection],
    ) -> Result<Vec<DetailSection>, AppError>;

    async fn generate_auto_content(
        &self,
        name: &str,
        category: &str,
        purpose: Purpose,
    ) -> Result<AutoContent, AppError>;

    /// Returns the image as a URL (a `data:` URL for the Gemini backend).
    async fn generate_section_image(
        &self,
        prompt: &str,
        section_type: SectionType,
        base_image: Option<&str>,
        is_daily_life: bool,
    ) -> Result<String, AppError>;

    /// Single-call page without the review step.
    async fn generate_page(&self, input: &ProductInput) -> Result<GeneratedPage, AppError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Raw provider shapes (lenient on section type tags)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDraftSection {
    #[serde(rename = "type")]
    section_type: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    outline: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOutline {
    #[serde(default)]
    sections: Vec<RawDraftSection>,
    #[serde(default)]
    suggested_colors: Option<BrandColors>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDetailSection {
    #[serde(rename = "type")]
    section_type: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    sub_content: Vec<String>,
    #[serde(default)]
    image_prompt: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDetail {
    #[serde(default)]
    sections: Vec<RawDetailSection>,
    #[serde(default)]
    brand_colors: Option<BrandColors>,
}

/// Converts provider outline sections, dropping tags outside the fixed set.
fn convert_outline(raw: RawOutline) -> OutlineResponse {
    let sections = raw
        .sections
        .into_iter()
        .filter_map(|s| match s.section_type.parse::<SectionType>() {
            Ok(section_type) => Some(DraftSection::new(section_type, &s.title, &s.outline)),
            Err(e) => {
                warn!("Dropping outline section: {e}");
                None
            }
        })
        .collect();

    OutlineResponse {
        sections,
        suggested_colors: raw.suggested_colors,
    }
}

/// Converts provider detail sections. Only basic types can be expressed without
/// a payload; anything else is dropped.
fn convert_detail_sections(raw: Vec<RawDetailSection>) -> Vec<DetailSection> {
    raw.into_iter()
        .filter_map(|s| {
            let kind = s
                .section_type
                .parse::<SectionType>()
                .ok()
                .and_then(SectionKind::basic);
            match kind {
                Some(kind) => Some(DetailSection {
                    title: s.title,
                    content: s.content,
                    sub_content: s.sub_content,
                    image_prompt: s.image_prompt.filter(|p| !p.trim().is_empty()),
                    image_url: None,
                    kind,
                }),
                None => {
                    warn!(
                        "Dropping detail section with unsupported type '{}'",
                        s.section_type
                    );
                    None
                }
            }
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// GeminiContentClient, the default implementation
// ────────────────────────────────────────────────────────────────────────────

pub struct GeminiContentClient {
    llm: LlmClient,
}

impl GeminiContentClient {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ContentGenerationClient for GeminiContentClient {
    async fn generate_outline(&self, input: &ProductInput) -> Result<OutlineResponse, AppError> {
        let family = PromptFamily::for_input(input);
        let prompt = build_outline_prompt(input);
        let raw: RawOutline = self
            .llm
            .call_json(OUTLINE_MODEL, &prompt, &family.system())
            .await
            .map_err(|e| AppError::Generation(format!("Draft outline generation failed: {e}")))?;
        Ok(convert_outline(raw))
    }

    async fn generate_detail(
        &self,
        input: &ProductInput,
        sections: &[DraftSection],
    ) -> Result<Vec<DetailSection>, AppError> {
        let family = PromptFamily::for_input(input);
        let prompt = build_detail_prompt(input, sections);
        let raw: RawDetail = self
            .llm
            .call_json(DETAIL_MODEL, &prompt, &family.system())
            .await
            .map_err(|e| AppError::Generation(format!("Detail generation failed: {e}")))?;
        Ok(convert_detail_sections(raw.sections))
    }

    async fn generate_auto_content(
        &self,
        name: &str,
        category: &str,
        purpose: Purpose,
    ) -> Result<AutoContent, AppError> {
        let prompt = build_auto_content_prompt(name, category, purpose);
        self.llm
            .call_json(DETAIL_MODEL, &prompt, JSON_ONLY_SYSTEM)
            .await
            .map_err(|e| AppError::Generation(format!("Auto content generation failed: {e}")))
    }

    async fn generate_section_image(
        &self,
        prompt: &str,
        section_type: SectionType,
        base_image: Option<&str>,
        is_daily_life: bool,
    ) -> Result<String, AppError> {
        let full_prompt =
            build_image_prompt(prompt, section_type, base_image.is_some(), is_daily_life);
        self.llm
            .call_image(IMAGE_MODEL, &full_prompt, base_image)
            .await
            .map_err(|e| AppError::ImageGeneration(format!("{section_type} image failed: {e}")))
    }

    async fn generate_page(&self, input: &ProductInput) -> Result<GeneratedPage, AppError> {
        let family = PromptFamily::for_input(input);
        let prompt = build_page_prompt(input);
        let raw: RawDetail = self
            .llm
            .call_json(DETAIL_MODEL, &prompt, &family.system())
            .await
            .map_err(|e| AppError::Generation(format!("Page generation failed: {e}")))?;
        Ok(GeneratedPage {
            sections: convert_detail_sections(raw.sections),
            brand_colors: raw.brand_colors,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scripted client for tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// Scripted responses plus call counters. `None` responses fail with a
    /// generation error carrying `failure_message`.
    pub struct ScriptedClient {
        pub outline: Mutex<Option<OutlineResponse>>,
        pub detail: Mutex<Option<Vec<DetailSection>>>,
        pub auto_content: Mutex<Option<AutoContent>>,
        pub image: Mutex<Option<String>>,
        pub page: Mutex<Option<GeneratedPage>>,
        pub failure_message: String,
        pub outline_calls: AtomicUsize,
        pub detail_calls: AtomicUsize,
        pub auto_calls: AtomicUsize,
        pub image_calls: AtomicUsize,
        pub page_calls: AtomicUsize,
        /// Section types passed to the last `generate_detail` call.
        pub last_detail_request: Mutex<Vec<SectionType>>,
    }

    impl ScriptedClient {
        pub fn new() -> Self {
            ScriptedClient {
                outline: Mutex::new(None),
                detail: Mutex::new(None),
                auto_content: Mutex::new(None),
                image: Mutex::new(None),
                page: Mutex::new(None),
                failure_message: "provider unavailable".to_string(),
                outline_calls: AtomicUsize::new(0),
                detail_calls: AtomicUsize::new(0),
                auto_calls: AtomicUsize::new(0),
                image_calls: AtomicUsize::new(0),
                page_calls: AtomicUsize::new(0),
                last_detail_request: Mutex::new(Vec::new()),
            }
        }

        /// Outline with all ten canonical section types.
        pub fn with_canonical_outline(self) -> Self {
            *self.outline.lock().unwrap() = Some(canonical_outline());
            self
        }

        /// Detail call echoes every requested section with filled copy.
        pub fn with_echo_detail(self) -> Self {
            *self.detail.lock().unwrap() = Some(Vec::new());
            self
        }

        pub fn with_auto_content(self) -> Self {
            *self.auto_content.lock().unwrap() = Some(sample_auto_content());
            self
        }

        pub fn with_image(self, url: &str) -> Self {
            *self.image.lock().unwrap() = Some(url.to_string());
            self
        }

        fn fail(&self) -> AppError {
            AppError::Generation(self.failure_message.clone())
        }
    }

    pub fn canonical_outline() -> OutlineResponse {
        OutlineResponse {
            sections: SectionType::ALL
                .into_iter()
                .map(|t| {
                    DraftSection::new(t, &format!("{t} title"), &format!("{t} outline"))
                })
                .collect(),
            suggested_colors: Some(BrandColors {
                primary: "#2196F3".to_string(),
                secondary: "#64B5F6".to_string(),
            }),
        }
    }

    pub fn filled_section(section_type: SectionType) -> DetailSection {
        DetailSection {
            title: format!("{section_type} headline"),
            content: format!("{section_type} body copy"),
            sub_content: vec![format!("{section_type} bullet")],
            image_prompt: Some(format!("{section_type} scene")),
            image_url: None,
            kind: SectionKind::basic(section_type).expect("basic section type"),
        }
    }

    pub fn sample_auto_content() -> AutoContent {
        AutoContent {
            faq: vec![
                FaqItem {
                    id: "faq-1".to_string(),
                    question: "How do I take it?".to_string(),
                    answer: "One stick a day.".to_string(),
                },
                FaqItem {
                    id: "faq-2".to_string(),
                    question: "Any side effects?".to_string(),
                    answer: "None reported.".to_string(),
                },
            ],
            guide: GeneratedGuide {
                title: "Coach's tips".to_string(),
                expert_name: "S. Park".to_string(),
                expert_title: "Certified health coach".to_string(),
                tips: vec!["Take it after breakfast".to_string()],
                recommendation: "Stick with it for four weeks.".to_string(),
            },
            comparison: GeneratedComparison {
                title: "Why ours".to_string(),
                our_product_name: "Collagen Peptide".to_string(),
                competitor_name: "Other brands".to_string(),
                items: vec![
                    RawComparisonItem {
                        feature: "Low molecular weight".to_string(),
                        our_product: "O".to_string(),
                        competitor: "X".to_string(),
                    },
                    RawComparisonItem {
                        feature: "Daily dose".to_string(),
                        our_product: "2,000mg".to_string(),
                        competitor: "500mg".to_string(),
                    },
                ],
            },
        }
    }

    #[async_trait]
    impl ContentGenerationClient for ScriptedClient {
        async fn generate_outline(
            &self,
            _input: &ProductInput,
        ) -> Result<OutlineResponse, AppError> {
            self.outline_calls.fetch_add(1, Ordering::SeqCst);
            self.outline.lock().unwrap().clone().ok_or_else(|| self.fail())
        }

        async fn generate_detail(
            &self,
            _input: &ProductInput,
            sections: &[DraftSection],
        ) -> Result<Vec<DetailSection>, AppError> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_detail_request.lock().unwrap() =
                sections.iter().map(|s| s.section_type).collect();
            let scripted = self.detail.lock().unwrap().clone().ok_or_else(|| self.fail())?;
            if scripted.is_empty() {
                return Ok(sections
                    .iter()
                    .map(|s| filled_section(s.section_type))
                    .collect());
            }
            Ok(scripted)
        }

        async fn generate_auto_content(
            &self,
            _name: &str,
            _category: &str,
            _purpose: Purpose,
        ) -> Result<AutoContent, AppError> {
            self.auto_calls.fetch_add(1, Ordering::SeqCst);
            self.auto_content
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| self.fail())
        }

        async fn generate_section_image(
            &self,
            _prompt: &str,
            section_type: SectionType,
            _base_image: Option<&str>,
            _is_daily_life: bool,
        ) -> Result<String, AppError> {
            self.image_calls.fetch_add(1, Ordering::SeqCst);
            self.image.lock().unwrap().clone().ok_or_else(|| {
                AppError::ImageGeneration(format!("{section_type} image failed"))
            })
        }

        async fn generate_page(&self, _input: &ProductInput) -> Result<GeneratedPage, AppError> {
            self.page_calls.fetch_add(1, Ordering::SeqCst);
            self.page.lock().unwrap().clone().ok_or_else(|| self.fail())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_outline_drops_unknown_types() {
        let raw: RawOutline = serde_json::from_value(serde_json::json!({
            "sections": [
                {"type": "hero", "title": "Hook", "outline": "Open", "isApproved": false},
                {"type": "banner", "title": "?", "outline": "?"},
                {"type": "CTA", "title": "Buy", "outline": "Close"}
            ],
            "suggestedColors": {"primary": "#FF9800", "secondary": "#FFB74D"}
        }))
        .unwrap();

        let outline = convert_outline(raw);
        let types: Vec<_> = outline.sections.iter().map(|s| s.section_type).collect();
        assert_eq!(types, vec![SectionType::Hero, SectionType::Cta]);
        // Review always starts fully approved
        assert!(outline.sections.iter().all(|s| s.is_approved));
        assert_eq!(outline.suggested_colors.unwrap().primary, "#FF9800");
    }

    #[test]
    fn test_convert_outline_tolerates_missing_fields() {
        let raw: RawOutline = serde_json::from_value(serde_json::json!({})).unwrap();
        let outline = convert_outline(raw);
        assert!(outline.sections.is_empty());
        assert!(outline.suggested_colors.is_none());
    }

    #[test]
    fn test_convert_detail_keeps_only_basic_types() {
        let raw: RawDetail = serde_json::from_value(serde_json::json!({
            "sections": [
                {"type": "hero", "title": "T", "content": "C", "subContent": ["a", "b"], "imagePrompt": "sunrise"},
                {"type": "faq", "title": "FAQ", "content": "..."},
                {"type": "reviews", "title": "R", "content": "C", "imagePrompt": "  "}
            ]
        }))
        .unwrap();

        let sections = convert_detail_sections(raw.sections);
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].kind, SectionKind::Hero);
        assert_eq!(sections[0].sub_content, vec!["a", "b"]);
        assert_eq!(sections[1].kind, SectionKind::Reviews);
        assert!(sections[1].image_prompt.is_none(), "blank prompts are dropped");
    }

    #[test]
    fn test_auto_content_deserializes_from_provider_json() {
        let content: AutoContent = serde_json::from_value(serde_json::json!({
            "faq": [{"id": "faq-1", "question": "Q", "answer": "A"}],
            "guide": {
                "title": "Tips", "expertName": "Kim", "expertTitle": "Consultant",
                "tips": ["one"], "recommendation": "Use daily"
            },
            "comparison": {
                "title": "Compare", "ourProductName": "Ours", "competitorName": "Other brands",
                "items": [{"feature": "Weight", "ourProduct": "O", "competitor": "1.2kg"}]
            }
        }))
        .unwrap();
        assert_eq!(content.faq.len(), 1);
        assert_eq!(content.comparison.items[0].competitor, "1.2kg");
    }
}
