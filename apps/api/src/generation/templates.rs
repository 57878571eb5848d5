//! Prompt template selection and assembly.
//!
//! Six purpose-specific variants (five wellness purposes plus daily-life) and a
//! generic variant used when the seller gave no structured purpose answers.

use crate::generation::models::{DraftSection, ProductInput, Purpose, PurposeDetails};
use crate::generation::prompts::{
    AUTO_CONTENT_PROMPT_TEMPLATE, DAILY_LIFE_SYSTEM, DETAIL_PROMPT_TEMPLATE, GENERAL_SYSTEM,
    NOT_PROVIDED, OUTLINE_PROMPT_TEMPLATE, PAGE_PROMPT_TEMPLATE, SELLER_DATA_TEMPLATE,
    WELLNESS_SYSTEM,
};
use crate::generation::tone::render_tone_block;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, MOBILE_COPY_INSTRUCTION};

/// Which template family a request uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptFamily {
    General,
    Wellness(Purpose),
    DailyLife,
}

impl PromptFamily {
    pub fn for_input(input: &ProductInput) -> Self {
        if input.purpose_details.is_none() {
            return PromptFamily::General;
        }
        match input.purpose {
            Purpose::DailyLife => PromptFamily::DailyLife,
            purpose => PromptFamily::Wellness(purpose),
        }
    }

    /// Full system instruction, including the JSON-only rule.
    pub fn system(&self) -> String {
        let base = match self {
            PromptFamily::General => GENERAL_SYSTEM,
            PromptFamily::Wellness(_) => WELLNESS_SYSTEM,
            PromptFamily::DailyLife => DAILY_LIFE_SYSTEM,
        };
        format!("{base}\n\n{JSON_ONLY_SYSTEM}")
    }

    /// What the copy should lean on for this purpose.
    pub fn focus(&self) -> &'static str {
        match self {
            PromptFamily::General => {
                "Lead with the strongest customer benefit, agitate the pain point it removes, \
                 then prove it with whatever evidence the seller supplied."
            }
            PromptFamily::Wellness(Purpose::WeightLoss) => {
                "Weight loss: sell a lighter, more confident everyday self. Acknowledge repeated \
                 diet failures without shame and show how the product makes consistency easy."
            }
            PromptFamily::Wellness(Purpose::MuscleGain) => {
                "Muscle gain: sell visible strength and recovery. Speak to plateaus and wasted \
                 workouts, and tie the product to measurable progress."
            }
            PromptFamily::Wellness(Purpose::BodyCorrection) => {
                "Body correction: sell upright posture and a pain-free day. Describe desk-bound \
                 slouching and stiffness vividly, then show gradual, guided correction."
            }
            PromptFamily::Wellness(Purpose::MentalCare) => {
                "Mental care: sell calm, sleep and focus. Use a gentle rhythm, avoid pressure, \
                 and frame the product as a small daily ritual."
            }
            PromptFamily::Wellness(Purpose::Nutrition) => {
                "Nutrition: sell steady energy and completeness. Highlight ingredient quality, \
                 absorption and the ease of fitting it into a busy routine."
            }
            // Wellness(DailyLife) cannot be produced by for_input; treat it as daily-life.
            PromptFamily::DailyLife | PromptFamily::Wellness(Purpose::DailyLife) => {
                "Daily life: sell time saved and effort removed. Compare against the product the \
                 customer uses today and quantify the improvement."
            }
        }
    }

    pub fn color_hint(&self) -> &'static str {
        match self {
            PromptFamily::General => "Pick colors that suit the category and the brand tone.",
            PromptFamily::Wellness(Purpose::WeightLoss) => "Weight loss pages suit green/mint.",
            PromptFamily::Wellness(Purpose::MuscleGain) => "Muscle gain pages suit red/orange.",
            PromptFamily::Wellness(Purpose::BodyCorrection) => {
                "Body correction pages suit blue/purple."
            }
            PromptFamily::Wellness(Purpose::MentalCare) => {
                "Mental care pages suit lavender/soft blue."
            }
            PromptFamily::Wellness(Purpose::Nutrition) => "Nutrition pages suit yellow/orange.",
            PromptFamily::DailyLife | PromptFamily::Wellness(Purpose::DailyLife) => {
                "Household products suit clean, trustworthy blue/gray or white/mint."
            }
        }
    }

    pub fn image_mood(&self) -> &'static str {
        match self {
            PromptFamily::DailyLife | PromptFamily::Wellness(Purpose::DailyLife) => {
                "a clean, organised living space with the product in real use"
            }
            _ => "a bright, healthy lifestyle scene in a clean professional studio",
        }
    }

    fn is_daily_life(&self) -> bool {
        matches!(
            self,
            PromptFamily::DailyLife | PromptFamily::Wellness(Purpose::DailyLife)
        )
    }
}

fn or_not_provided(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_PROVIDED
    } else {
        value
    }
}

fn render_details_block(details: &PurposeDetails, is_daily_life: bool) -> String {
    let (change, proof, tech, obstacle) = if is_daily_life {
        (
            "Biggest convenience for the user",
            "Differentiating technology",
            "Key function or material",
            "Frustration with existing products",
        )
    } else {
        (
            "Biggest change for the user",
            "Proof of expertise",
            "Core ingredient or technology",
            "Obstacle that makes customers give up",
        )
    };

    format!(
        "PURPOSE DETAILS\n\
         - {change}: {}\n\
         - {proof}: {}\n\
         - {tech}: {}\n\
         - {obstacle}: {}\n\
         - How the product removes it: {}\n\
         - Data-backed results: {}",
        or_not_provided(&details.biggest_change),
        or_not_provided(&details.expertise_proof),
        or_not_provided(&details.core_technology),
        or_not_provided(&details.customer_obstacle),
        or_not_provided(&details.obstacle_solution),
        or_not_provided(&details.data_proof),
    )
}

/// Seller data block shared by the outline, detail and one-shot prompts.
pub fn render_seller_data(input: &ProductInput) -> String {
    let family = PromptFamily::for_input(input);
    let details_block = input
        .purpose_details
        .as_ref()
        .map(|d| render_details_block(d, family.is_daily_life()))
        .unwrap_or_default();

    SELLER_DATA_TEMPLATE
        .replace("{name}", &input.name)
        .replace("{category}", &input.category)
        .replace("{purpose_label}", input.purpose.label())
        .replace("{features}", or_not_provided(&input.features))
        .replace("{target_audience}", or_not_provided(&input.target_audience))
        .replace(
            "{tone_block}",
            &render_tone_block(input.tone, input.is_daily_life()),
        )
        .replace("{details_block}", &details_block)
        .trim_end()
        .to_string()
}

pub fn build_outline_prompt(input: &ProductInput) -> String {
    let family = PromptFamily::for_input(input);
    OUTLINE_PROMPT_TEMPLATE
        .replace("{seller_data}", &render_seller_data(input))
        .replace("{focus}", family.focus())
        .replace("{color_hint}", family.color_hint())
}

pub fn build_detail_prompt(input: &ProductInput, sections: &[DraftSection]) -> String {
    let family = PromptFamily::for_input(input);
    let approved_sections = sections
        .iter()
        .enumerate()
        .map(|(i, s)| {
            format!(
                "[Section {}] type: \"{}\"\n- Draft title: {}\n- Outline: {}",
                i + 1,
                s.section_type,
                s.title,
                s.outline
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    DETAIL_PROMPT_TEMPLATE
        .replace("{seller_data}", &render_seller_data(input))
        .replace("{focus}", family.focus())
        .replace("{copy_instruction}", MOBILE_COPY_INSTRUCTION)
        .replace("{approved_sections}", &approved_sections)
        .replace("{image_mood}", family.image_mood())
}

pub fn build_page_prompt(input: &ProductInput) -> String {
    let family = PromptFamily::for_input(input);
    PAGE_PROMPT_TEMPLATE
        .replace("{seller_data}", &render_seller_data(input))
        .replace("{focus}", family.focus())
        .replace("{copy_instruction}", MOBILE_COPY_INSTRUCTION)
        .replace("{image_mood}", family.image_mood())
        .replace("{color_hint}", family.color_hint())
}

pub fn build_auto_content_prompt(name: &str, category: &str, purpose: Purpose) -> String {
    let (faq_topics, expert_example, comparison_topics) = if purpose.is_daily_life() {
        (
            "usage, cleaning, durability, after-sales service and compatibility",
            "\"J. Kim, product consultant\"",
            "convenience, durability, design, value for money and after-sales service",
        )
    } else {
        (
            "how to take or use it, expected effects, side effects, storage and certification",
            "\"S. Park, certified health coach\"",
            "ingredient content, absorption, value for money, certification and extra benefits",
        )
    };

    AUTO_CONTENT_PROMPT_TEMPLATE
        .replace("{name}", name)
        .replace("{category}", category)
        .replace("{purpose_label}", purpose.label())
        .replace("{faq_topics}", faq_topics)
        .replace("{expert_example}", expert_example)
        .replace("{comparison_topics}", comparison_topics)
}
