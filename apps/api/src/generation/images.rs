//! Section images: prompt enrichment and per-section generation state.
//!
//! Each section owns an independent slot. A failure in one slot never touches
//! another, and retrying re-issues only that section's request.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::AppError;
use crate::generation::models::SectionType;
use crate::generation::prompts::BASE_IMAGE_SCENE_TEMPLATE;

/// Section and base keywords appended to every image prompt.
const SECTION_KEYWORDS_USED: usize = 3;
const BASE_KEYWORDS_USED: usize = 3;

fn wellness_keywords(section_type: SectionType) -> &'static [&'static str] {
    match section_type {
        SectionType::Hero => &[
            "natural sunlight streaming through large windows",
            "bright and airy interior space",
            "healthy person with confident posture",
            "morning wellness routine",
        ],
        SectionType::Problem => &[
            "soft natural lighting",
            "person looking contemplative",
            "subtle shadows suggesting struggle",
            "relatable everyday setting",
        ],
        SectionType::Features => &[
            "detailed product macro shot",
            "clean white background",
            "ingredients or components visualization",
            "professional studio lighting",
        ],
        SectionType::Trust => &[
            "professional medical or lab setting",
            "certification badges and documents",
            "data visualization aesthetic",
            "expert endorsement style",
        ],
        SectionType::Cta => &[
            "vibrant energetic atmosphere",
            "person celebrating achievement",
            "bright optimistic lighting",
            "healthy happy lifestyle",
        ],
        _ => &[
            "bright natural light interior",
            "clean product close-up shot",
            "healthy person actively using product",
            "modern fitness studio environment",
        ],
    }
}

fn daily_life_keywords(section_type: SectionType) -> &'static [&'static str] {
    match section_type {
        SectionType::Hero => &[
            "modern clean living room interior",
            "bright natural daylight",
            "minimalist scandinavian design",
            "product in lifestyle setting",
        ],
        SectionType::Problem => &[
            "cluttered messy space",
            "person looking frustrated",
            "everyday household challenge",
            "real life setting",
        ],
        SectionType::Features => &[
            "product detail close-up",
            "clean white studio background",
            "exploded view of components",
            "premium material texture",
        ],
        SectionType::Trust => &[
            "certification and quality badges",
            "professional testing environment",
            "warranty and guarantee visual",
            "quality assurance imagery",
        ],
        SectionType::Cta => &[
            "happy satisfied customer",
            "clean organized home",
            "lifestyle improvement result",
            "bright optimistic scene",
        ],
        _ => &[
            "clean product demonstration",
            "person using product happily",
            "organized tidy space",
            "modern kitchen or living room",
        ],
    }
}

const BASE_WELLNESS_KEYWORDS: &[&str] = &[
    "high-end wellness product photography",
    "bright healthy lifestyle aesthetic",
    "cinematic studio lighting",
    "8k commercial quality",
];

const BASE_DAILY_LIFE_KEYWORDS: &[&str] = &[
    "high-end product photography",
    "clean modern interior aesthetic",
    "bright natural lighting",
    "8k commercial quality",
];

/// Appends section-type and style keywords to the section's own prompt.
/// Types without a dedicated set (reviews and the specialized types) use the
/// solution keywords.
pub fn build_image_prompt(
    prompt: &str,
    section_type: SectionType,
    has_base_image: bool,
    is_daily_life: bool,
) -> String {
    let (section_keywords, base_keywords) = if is_daily_life {
        (daily_life_keywords(section_type), BASE_DAILY_LIFE_KEYWORDS)
    } else {
        (wellness_keywords(section_type), BASE_WELLNESS_KEYWORDS)
    };

    let scene = format!(
        "{}, {}, {}",
        prompt.trim(),
        section_keywords[..SECTION_KEYWORDS_USED].join(", "),
        base_keywords[..BASE_KEYWORDS_USED].join(", ")
    );

    if has_base_image {
        BASE_IMAGE_SCENE_TEMPLATE.replace("{scene}", &scene)
    } else {
        scene
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Per-section slots
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ImageSlot {
    Loading,
    Ready { url: String },
    Failed { message: String },
}

/// Everything needed to issue one section's image request without holding the session.
#[derive(Debug, Clone)]
pub struct ImageJob {
    pub index: usize,
    pub prompt: String,
    pub section_type: SectionType,
    pub base_image: Option<String>,
    pub is_daily_life: bool,
    /// Slot generation the request was issued under.
    pub generation: u64,
}

/// Image state keyed by section index. Absent means idle.
///
/// `generation` advances every time the slots are cleared, so an outcome for a
/// discarded page can never land on the page that replaced it.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ImageSlots {
    slots: BTreeMap<usize, ImageSlot>,
    #[serde(skip)]
    generation: u64,
}

impl ImageSlots {
    pub fn get(&self, index: usize) -> Option<&ImageSlot> {
        self.slots.get(&index)
    }

    /// Marks a slot as loading and returns the current generation. A slot that
    /// is already loading is a conflict.
    pub fn begin(&mut self, index: usize) -> Result<u64, AppError> {
        if matches!(self.get(index), Some(ImageSlot::Loading)) {
            return Err(AppError::Conflict(format!(
                "image for section {index} is already being generated"
            )));
        }
        self.slots.insert(index, ImageSlot::Loading);
        Ok(self.generation)
    }

    /// Records the outcome for a slot that is still loading under the same
    /// generation. Returns `None` when the page was discarded in the meantime.
    pub fn finish(
        &mut self,
        index: usize,
        generation: u64,
        outcome: &Result<String, AppError>,
    ) -> Option<ImageSlot> {
        if generation != self.generation {
            return None;
        }
        let slot = self.slots.get_mut(&index)?;
        if *slot != ImageSlot::Loading {
            return None;
        }
        *slot = match outcome {
            Ok(url) => ImageSlot::Ready { url: url.clone() },
            Err(e) => ImageSlot::Failed {
                message: e.message(),
            },
        };
        Some(slot.clone())
    }

    pub fn is_settled(&self) -> bool {
        !self.slots.values().any(|s| *s == ImageSlot::Loading)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_uses_three_section_and_three_base_keywords() {
        let prompt = build_image_prompt("woman stretching", SectionType::Hero, false, false);
        assert!(prompt.starts_with("woman stretching, natural sunlight"));
        assert!(!prompt.contains("morning wellness routine"));
        assert!(prompt.ends_with("cinematic studio lighting"));
    }

    #[test]
    fn test_unknown_section_types_fall_back_to_solution_keywords() {
        let faq = build_image_prompt("p", SectionType::Faq, false, false);
        let solution = build_image_prompt("p", SectionType::Solution, false, false);
        assert_eq!(faq, solution);
    }

    #[test]
    fn test_daily_life_uses_household_keywords() {
        let prompt = build_image_prompt("vacuum", SectionType::Problem, false, true);
        assert!(prompt.contains("cluttered messy space"));
        assert!(prompt.contains("high-end product photography"));
    }

    #[test]
    fn test_base_image_wraps_scene() {
        let prompt = build_image_prompt("kitchen", SectionType::Cta, true, true);
        assert!(prompt.starts_with("Keep the exact product"));
        assert!(prompt.contains("kitchen, happy satisfied customer"));
    }

    #[test]
    fn test_slots_are_independent() {
        let mut slots = ImageSlots::default();
        let generation = slots.begin(0).unwrap();
        slots.begin(1).unwrap();

        let no_image = Err(AppError::ImageGeneration("no image".to_string()));
        let failed = slots.finish(0, generation, &no_image);
        assert!(matches!(failed, Some(ImageSlot::Failed { .. })));
        assert_eq!(slots.get(1), Some(&ImageSlot::Loading));
        assert!(!slots.is_settled());

        let ready = slots.finish(1, generation, &Ok("data:image/png;base64,AA".to_string()));
        assert!(matches!(ready, Some(ImageSlot::Ready { .. })));
        assert!(slots.is_settled());
    }

    #[test]
    fn test_second_begin_while_loading_conflicts_but_retry_after_failure_is_allowed() {
        let mut slots = ImageSlots::default();
        let generation = slots.begin(2).unwrap();
        assert!(matches!(slots.begin(2), Err(AppError::Conflict(_))));

        let no_image = Err(AppError::ImageGeneration("no image".to_string()));
        slots.finish(2, generation, &no_image);
        assert!(slots.begin(2).is_ok());
    }

    #[test]
    fn test_finish_after_clear_is_ignored() {
        let mut slots = ImageSlots::default();
        let generation = slots.begin(0).unwrap();
        slots.clear();
        assert!(slots.finish(0, generation, &Ok("url".to_string())).is_none());
        assert!(slots.get(0).is_none());
    }

    #[test]
    fn test_outcome_from_cleared_generation_skips_new_request() {
        let mut slots = ImageSlots::default();
        let old = slots.begin(0).unwrap();
        slots.clear();
        let current = slots.begin(0).unwrap();
        assert_ne!(old, current);

        assert!(slots.finish(0, old, &Ok("old-page".to_string())).is_none());
        assert_eq!(slots.get(0), Some(&ImageSlot::Loading));

        let ready = slots.finish(0, current, &Ok("new-page".to_string()));
        assert_eq!(
            ready,
            Some(ImageSlot::Ready {
                url: "new-page".to_string()
            })
        );
    }

    #[test]
    fn test_serializes_slots_only() {
        let mut slots = ImageSlots::default();
        slots.clear();
        slots.begin(1).unwrap();
        let json = serde_json::to_value(&slots).unwrap();
        assert_eq!(json, serde_json::json!({"1": {"status": "loading"}}));
    }
}
