//! Tone calibration: maps the seller's brand tone to voice guidance for the copy prompts.
//!
//! The daily-life family never gets clinical wellness vocabulary, whatever tone is picked.

use crate::generation::models::Tone;

/// Voice guidance calibrated to a specific brand tone.
#[derive(Debug, Clone)]
pub struct ToneGuide {
    pub label: &'static str,
    pub voice: &'static str,
    pub preferred_phrasing: Vec<&'static str>,
    pub avoid_phrasing: Vec<&'static str>,
}

/// Returns tone-calibrated phrasing for the seller's brand tone.
pub fn get_tone_guide(tone: Tone) -> ToneGuide {
    match tone {
        Tone::Professional => ToneGuide {
            label: "professional / trustworthy",
            voice: "calm, precise and evidence-led; confident without hype",
            preferred_phrasing: vec!["proven", "designed by experts", "measured", "certified"],
            avoid_phrasing: vec!["OMG", "insane", "crazy deal"],
        },
        Tone::Friendly => ToneGuide {
            label: "friendly / warm",
            voice: "warm, conversational and encouraging, like advice from a close friend",
            preferred_phrasing: vec!["you deserve", "made easy", "every day", "together"],
            avoid_phrasing: vec!["clinically superior", "state-of-the-art"],
        },
        Tone::Luxurious => ToneGuide {
            label: "luxurious / premium",
            voice: "refined and understated; emphasise craft, rarity and sensory detail",
            preferred_phrasing: vec!["crafted", "signature", "exceptional", "curated"],
            avoid_phrasing: vec!["cheap", "bargain", "budget"],
        },
        Tone::Energetic => ToneGuide {
            label: "energetic / vibrant",
            voice: "punchy and upbeat with short imperative sentences",
            preferred_phrasing: vec!["start now", "level up", "feel the difference", "go"],
            avoid_phrasing: vec!["perhaps", "might consider", "somewhat"],
        },
    }
}

/// Vocabulary that only fits wellness products.
const WELLNESS_ONLY_PHRASING: &[&str] = &["clinically", "proven", "certified", "measured"];

/// Filters preferred phrasing for the daily-life family, where clinical
/// wellness claims read as overpromising.
pub fn phrasing_for_family<'a>(phrasing: &[&'a str], is_daily_life: bool) -> Vec<&'a str> {
    if !is_daily_life {
        return phrasing.to_vec();
    }
    phrasing
        .iter()
        .filter(|&&p| {
            !WELLNESS_ONLY_PHRASING
                .iter()
                .any(|&w| p.to_ascii_lowercase().contains(w))
        })
        .copied()
        .collect()
}

/// Renders the tone block inserted into the seller-data prompt.
pub fn render_tone_block(tone: Tone, is_daily_life: bool) -> String {
    let guide = get_tone_guide(tone);
    let preferred = phrasing_for_family(&guide.preferred_phrasing, is_daily_life);
    format!(
        "Brand tone: {}\nVoice: {}\nPreferred phrasing: {}\nAvoid: {}",
        guide.label,
        guide.voice,
        preferred.join(", "),
        guide.avoid_phrasing.join(", ")
    )
}
