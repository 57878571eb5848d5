//! Data model shared by the generation workflow, the editor and the HTTP layer.
//!
//! Wire format is camelCase to match the browser client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

// ────────────────────────────────────────────────────────────────────────────
// Enumerations
// ────────────────────────────────────────────────────────────────────────────

/// The fixed set of page sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionType {
    Hero,
    Problem,
    Solution,
    Features,
    Trust,
    Reviews,
    Faq,
    Guide,
    Comparison,
    Cta,
}

impl SectionType {
    /// Canonical page order, as offered in the draft outline.
    pub const ALL: [SectionType; 10] = [
        SectionType::Hero,
        SectionType::Problem,
        SectionType::Solution,
        SectionType::Features,
        SectionType::Trust,
        SectionType::Reviews,
        SectionType::Faq,
        SectionType::Guide,
        SectionType::Comparison,
        SectionType::Cta,
    ];

    /// Specialized types are produced by the auto-content generator and always
    /// appended after the basic sections, in this order.
    pub const SPECIALIZED: [SectionType; 3] =
        [SectionType::Faq, SectionType::Guide, SectionType::Comparison];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Hero => "hero",
            SectionType::Problem => "problem",
            SectionType::Solution => "solution",
            SectionType::Features => "features",
            SectionType::Trust => "trust",
            SectionType::Reviews => "reviews",
            SectionType::Faq => "faq",
            SectionType::Guide => "guide",
            SectionType::Comparison => "comparison",
            SectionType::Cta => "cta",
        }
    }

    pub fn is_specialized(&self) -> bool {
        Self::SPECIALIZED.contains(self)
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        SectionType::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| format!("unknown section type '{s}'"))
    }
}

/// Brand voice selected by the seller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[default]
    Professional,
    Friendly,
    Luxurious,
    Energetic,
}

/// Product goal classifier. Selects the prompt template family and the image keyword set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Purpose {
    #[default]
    WeightLoss,
    MuscleGain,
    BodyCorrection,
    MentalCare,
    Nutrition,
    DailyLife,
}

impl Purpose {
    pub fn label(&self) -> &'static str {
        match self {
            Purpose::WeightLoss => "weight loss / diet",
            Purpose::MuscleGain => "muscle gain",
            Purpose::BodyCorrection => "posture and body correction",
            Purpose::MentalCare => "mental care / meditation",
            Purpose::Nutrition => "nutrition supply",
            Purpose::DailyLife => "household / daily life",
        }
    }

    pub fn is_daily_life(&self) -> bool {
        matches!(self, Purpose::DailyLife)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Seller input
// ────────────────────────────────────────────────────────────────────────────

/// Optional structured answers that sharpen the purpose-specific prompts.
/// Every field may be left blank; prompts substitute a "not provided" hint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PurposeDetails {
    pub biggest_change: String,
    pub expertise_proof: String,
    pub core_technology: String,
    pub customer_obstacle: String,
    pub obstacle_solution: String,
    pub data_proof: String,
}

/// Seller-provided product facts. Copied into the session on submission and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub features: String,
    #[serde(default)]
    pub target_audience: String,
    #[serde(default)]
    pub tone: Tone,
    /// Reference product shot as a `data:` URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_image: Option<String>,
    #[serde(default)]
    pub purpose: Purpose,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose_details: Option<PurposeDetails>,
}

impl ProductInput {
    /// Name and category are required before any generation call.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("product name is required".to_string()));
        }
        if self.category.trim().is_empty() {
            return Err(AppError::Validation("product category is required".to_string()));
        }
        Ok(())
    }

    pub fn is_daily_life(&self) -> bool {
        self.purpose.is_daily_life()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stage 1: draft outline
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrandColors {
    pub primary: String,
    pub secondary: String,
}

impl BrandColors {
    pub const FALLBACK_PRIMARY: &'static str = "#4CAF50";
    pub const FALLBACK_SECONDARY: &'static str = "#81C784";

    pub fn fallback() -> Self {
        BrandColors {
            primary: Self::FALLBACK_PRIMARY.to_string(),
            secondary: Self::FALLBACK_SECONDARY.to_string(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.primary.trim().is_empty() && !self.secondary.trim().is_empty()
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftSection {
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub title: String,
    pub outline: String,
    #[serde(default = "default_true")]
    pub is_approved: bool,
}

impl DraftSection {
    pub fn new(section_type: SectionType, title: &str, outline: &str) -> Self {
        DraftSection {
            section_type,
            title: title.to_string(),
            outline: outline.to_string(),
            is_approved: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftOutline {
    pub sections: Vec<DraftSection>,
    pub suggested_colors: BrandColors,
}

impl DraftOutline {
    pub fn approved(&self) -> impl Iterator<Item = &DraftSection> {
        self.sections.iter().filter(|s| s.is_approved)
    }

    pub fn approved_count(&self) -> usize {
        self.approved().count()
    }

    pub fn is_approved(&self, section_type: SectionType) -> bool {
        self.approved().any(|s| s.section_type == section_type)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stage 2: detail page
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqItem {
    pub id: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideData {
    pub expert_name: String,
    pub expert_title: String,
    #[serde(default)]
    pub tips: Vec<String>,
    pub recommendation: String,
}

/// A comparison cell: a check/cross mark or free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ComparisonValue {
    Flag(bool),
    Text(String),
}

impl ComparisonValue {
    /// `"O"` is a check mark, `"X"` a cross; anything else stays as text.
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "O" => ComparisonValue::Flag(true),
            "X" => ComparisonValue::Flag(false),
            other => ComparisonValue::Text(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonItem {
    pub feature: String,
    pub our_product: ComparisonValue,
    pub competitor: ComparisonValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonData {
    pub our_product_name: String,
    pub competitor_name: String,
    #[serde(rename = "comparisonItems")]
    pub items: Vec<ComparisonItem>,
}

/// Type-specific payload of a section, keyed by the section type tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SectionKind {
    Hero,
    Problem,
    Solution,
    Features,
    Trust,
    Reviews,
    Cta,
    Faq {
        #[serde(rename = "faqItems")]
        items: Vec<FaqItem>,
    },
    Guide(GuideData),
    Comparison(ComparisonData),
}

impl SectionKind {
    pub fn section_type(&self) -> SectionType {
        match self {
            SectionKind::Hero => SectionType::Hero,
            SectionKind::Problem => SectionType::Problem,
            SectionKind::Solution => SectionType::Solution,
            SectionKind::Features => SectionType::Features,
            SectionKind::Trust => SectionType::Trust,
            SectionKind::Reviews => SectionType::Reviews,
            SectionKind::Cta => SectionType::Cta,
            SectionKind::Faq { .. } => SectionType::Faq,
            SectionKind::Guide(_) => SectionType::Guide,
            SectionKind::Comparison(_) => SectionType::Comparison,
        }
    }

    /// Payload-free kind for a basic section type. `None` for specialized types,
    /// which cannot exist without their payload.
    pub fn basic(section_type: SectionType) -> Option<Self> {
        match section_type {
            SectionType::Hero => Some(SectionKind::Hero),
            SectionType::Problem => Some(SectionKind::Problem),
            SectionType::Solution => Some(SectionKind::Solution),
            SectionType::Features => Some(SectionKind::Features),
            SectionType::Trust => Some(SectionKind::Trust),
            SectionType::Reviews => Some(SectionKind::Reviews),
            SectionType::Cta => Some(SectionKind::Cta),
            SectionType::Faq | SectionType::Guide | SectionType::Comparison => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailSection {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_content: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub kind: SectionKind,
}

impl DetailSection {
    pub fn section_type(&self) -> SectionType {
        self.kind.section_type()
    }

    /// Every user-visible text field, in rendering order: title, body, bullets,
    /// then the payload text.
    pub fn text_fields_mut(&mut self) -> Vec<&mut String> {
        let DetailSection {
            title,
            content,
            sub_content,
            kind,
            ..
        } = self;

        let mut fields = vec![title, content];
        fields.extend(sub_content.iter_mut());

        match kind {
            SectionKind::Faq { items } => {
                for item in items.iter_mut() {
                    fields.push(&mut item.question);
                    fields.push(&mut item.answer);
                }
            }
            SectionKind::Guide(guide) => {
                fields.push(&mut guide.expert_name);
                fields.push(&mut guide.expert_title);
                fields.extend(guide.tips.iter_mut());
                fields.push(&mut guide.recommendation);
            }
            SectionKind::Comparison(comparison) => {
                fields.push(&mut comparison.our_product_name);
                fields.push(&mut comparison.competitor_name);
                for item in comparison.items.iter_mut() {
                    fields.push(&mut item.feature);
                    if let ComparisonValue::Text(text) = &mut item.our_product {
                        fields.push(text);
                    }
                    if let ComparisonValue::Text(text) = &mut item.competitor {
                        fields.push(text);
                    }
                }
            }
            _ => {}
        }

        fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailPage {
    pub sections: Vec<DetailSection>,
    pub brand_colors: BrandColors,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_image: Option<String>,
}
