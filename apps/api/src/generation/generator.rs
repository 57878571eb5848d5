//! Page generation: the provider-facing half of the two-stage workflow.
//!
//! Flow: generate_outline → (user review) → fill_approved_sections
//!       = generate_detail ‖ generate_auto_content → merge.
//!
//! These functions own no state; `workflow::DraftWorkflow` decides when they run
//! and what happens to their results.

use std::collections::HashSet;

use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::generation::client::{AutoContent, ContentGenerationClient, OutlineResponse};
use crate::generation::models::{
    BrandColors, ComparisonData, ComparisonItem, ComparisonValue, DetailPage, DetailSection,
    DraftOutline, DraftSection, FaqItem, GuideData, ProductInput, SectionKind, SectionType,
};

// ────────────────────────────────────────────────────────────────────────────
// Stage 1: outline
// ────────────────────────────────────────────────────────────────────────────

/// Placeholder outline used when the provider returns no sections.
pub fn fallback_sections() -> Vec<DraftSection> {
    vec![
        DraftSection::new(
            SectionType::Hero,
            "Hook headline",
            "A striking first impression that stops the scroll.",
        ),
        DraftSection::new(
            SectionType::Problem,
            "The problem",
            "Empathise with the discomfort and worries the customer lives with.",
        ),
        DraftSection::new(
            SectionType::Solution,
            "The solution",
            "The core way this product solves it.",
        ),
        DraftSection::new(
            SectionType::Features,
            "Product features",
            "Key functions and what sets them apart.",
        ),
        DraftSection::new(
            SectionType::Trust,
            "Why trust us",
            "Certifications, reviews and expert endorsements.",
        ),
        DraftSection::new(
            SectionType::Cta,
            "Call to action",
            "Why now is the moment to buy.",
        ),
    ]
}

/// Turns the provider response into the outline shown for review.
///
/// Review never starts empty: zero sections yields the six-section fallback
/// together with the fallback theme. Every section starts approved.
pub fn outline_from_response(response: OutlineResponse) -> DraftOutline {
    if response.sections.is_empty() {
        warn!("Outline response had no sections; using fallback outline");
        return DraftOutline {
            sections: fallback_sections(),
            suggested_colors: BrandColors::fallback(),
        };
    }

    let sections = response
        .sections
        .into_iter()
        .map(|s| DraftSection {
            is_approved: true,
            ..s
        })
        .collect();

    let suggested_colors = response
        .suggested_colors
        .filter(BrandColors::is_complete)
        .unwrap_or_else(BrandColors::fallback);

    DraftOutline {
        sections,
        suggested_colors,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stage 2: fill-in
// ────────────────────────────────────────────────────────────────────────────

/// Approved sections split by which generator fills them.
#[derive(Debug, Clone)]
pub struct ApprovedPartition {
    pub basic: Vec<DraftSection>,
    /// Approved specialized types in append order (FAQ, Guide, Comparison).
    pub specialized: Vec<SectionType>,
}

pub fn partition_approved(outline: &DraftOutline) -> ApprovedPartition {
    let basic = outline
        .approved()
        .filter(|s| !s.section_type.is_specialized())
        .cloned()
        .collect();

    let specialized = SectionType::SPECIALIZED
        .into_iter()
        .filter(|t| outline.is_approved(*t))
        .collect();

    ApprovedPartition { basic, specialized }
}

/// Expands every approved section of `outline` into a `DetailPage`.
///
/// Issues at most two provider calls, concurrently: one detail call for the
/// basic subset and, only when a specialized type is approved, one auto-content
/// call. Both must succeed; no partial page is ever returned.
pub async fn fill_approved_sections(
    client: &dyn ContentGenerationClient,
    input: &ProductInput,
    outline: &DraftOutline,
) -> Result<DetailPage, AppError> {
    let partition = partition_approved(outline);

    if partition.basic.is_empty() && partition.specialized.is_empty() {
        return Err(AppError::Validation(
            "approve at least one section before generating the page".to_string(),
        ));
    }

    info!(
        "Filling {} basic and {} specialized sections for '{}'",
        partition.basic.len(),
        partition.specialized.len(),
        input.name
    );

    let basic_call = async {
        if partition.basic.is_empty() {
            Ok(Vec::new())
        } else {
            client.generate_detail(input, &partition.basic).await
        }
    };

    let auto_call = async {
        if partition.specialized.is_empty() {
            Ok(None)
        } else {
            client
                .generate_auto_content(&input.name, &input.category, input.purpose)
                .await
                .map(Some)
        }
    };

    let (basic_result, auto_result) = tokio::join!(basic_call, auto_call);
    let basic_sections = basic_result?;
    let auto_content = auto_result?;

    let sections = merge_sections(
        &partition.basic,
        basic_sections,
        &partition.specialized,
        auto_content,
    );

    Ok(DetailPage {
        sections,
        brand_colors: outline.suggested_colors.clone(),
        base_image: input.base_image.clone(),
    })
}

/// Merges basic sections (provider order) with the specialized sections
/// (appended as FAQ, Guide, Comparison).
///
/// Sections the provider returned for types that were not approved are dropped.
/// Approved types the provider omitted are logged as a contract violation and
/// left out; they are never fabricated.
pub fn merge_sections(
    approved_basic: &[DraftSection],
    generated: Vec<DetailSection>,
    specialized: &[SectionType],
    auto_content: Option<AutoContent>,
) -> Vec<DetailSection> {
    let approved_types: HashSet<SectionType> =
        approved_basic.iter().map(|s| s.section_type).collect();

    let mut sections: Vec<DetailSection> = generated
        .into_iter()
        .filter(|s| {
            let keep = approved_types.contains(&s.section_type());
            if !keep {
                warn!(
                    "Dropping generated '{}' section that was not approved",
                    s.section_type()
                );
            }
            keep
        })
        .collect();

    let returned_types: HashSet<SectionType> = sections.iter().map(|s| s.section_type()).collect();
    for missing in approved_types.difference(&returned_types) {
        error!(
            "Generation contract violated: approved '{}' section missing from detail response",
            missing
        );
    }

    if let Some(content) = auto_content {
        for section_type in specialized {
            sections.push(specialized_section(*section_type, &content));
        }
    } else if !specialized.is_empty() {
        error!("Specialized sections approved but no auto content was generated");
    }

    sections
}

fn specialized_section(section_type: SectionType, content: &AutoContent) -> DetailSection {
    let (title, body, kind) = match section_type {
        SectionType::Guide => (
            non_blank_or(&content.guide.title, "Expert guide"),
            "How to get the most out of it, from an expert.",
            SectionKind::Guide(GuideData {
                expert_name: content.guide.expert_name.clone(),
                expert_title: content.guide.expert_title.clone(),
                tips: content.guide.tips.clone(),
                recommendation: content.guide.recommendation.clone(),
            }),
        ),
        SectionType::Comparison => (
            non_blank_or(&content.comparison.title, "How we compare"),
            "See how it stacks up against other products.",
            SectionKind::Comparison(normalize_comparison(content)),
        ),
        // Only the three specialized types reach this point.
        _ => (
            "Frequently asked questions".to_string(),
            "The questions customers ask us most.",
            SectionKind::Faq {
                items: with_stable_ids(&content.faq),
            },
        ),
    };

    DetailSection {
        title,
        content: body.to_string(),
        sub_content: Vec::new(),
        image_prompt: None,
        image_url: None,
        kind,
    }
}

fn non_blank_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Converts raw comparison cells: `"O"` → true, `"X"` → false, other text kept.
pub fn normalize_comparison(content: &AutoContent) -> ComparisonData {
    ComparisonData {
        our_product_name: content.comparison.our_product_name.clone(),
        competitor_name: content.comparison.competitor_name.clone(),
        items: content
            .comparison
            .items
            .iter()
            .map(|item| ComparisonItem {
                feature: item.feature.clone(),
                our_product: ComparisonValue::from_raw(&item.our_product),
                competitor: ComparisonValue::from_raw(&item.competitor),
            })
            .collect(),
    }
}

/// FAQ ids must be non-empty and unique; blank or repeated ids become `faq-N`.
fn with_stable_ids(items: &[FaqItem]) -> Vec<FaqItem> {
    let mut seen = HashSet::new();
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let id = item.id.trim();
            let id = if id.is_empty() || !seen.insert(id.to_string()) {
                let generated = format!("faq-{}", i + 1);
                seen.insert(generated.clone());
                generated
            } else {
                id.to_string()
            };
            FaqItem { id, ..item.clone() }
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// One-shot page
// ────────────────────────────────────────────────────────────────────────────

/// Generates a five-section page in a single call, skipping review.
pub async fn generate_quick_page(
    client: &dyn ContentGenerationClient,
    input: &ProductInput,
) -> Result<DetailPage, AppError> {
    let page = client.generate_page(input).await?;

    if page.sections.is_empty() {
        return Err(AppError::Generation(
            "Page generation returned no sections".to_string(),
        ));
    }

    Ok(DetailPage {
        sections: page.sections,
        brand_colors: page
            .brand_colors
            .filter(BrandColors::is_complete)
            .unwrap_or_else(BrandColors::fallback),
        base_image: input.base_image.clone(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
