// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for sellers who gave no structured purpose answers.
pub const GENERAL_SYSTEM: &str = "You are a senior conversion-rate-optimisation consultant and \
    copywriter for e-commerce brands. You plan high-involvement product detail pages that turn \
    browsers into buyers. Sell the benefit, not the feature: translate every specification into \
    what it changes in the customer's day. Press on the customer's pain point, then resolve it \
    with the product.";

/// System prompt for the five wellness purposes (HASCT: hook, agitation, solution, trust, CTA).
pub const WELLNESS_SYSTEM: &str = "You are a wellness and fitness copywriter who has grown \
    supplement, fitness-equipment and health-food brands past nine-figure annual sales. Your job \
    is to awaken the customer's desire for a healthier version of themselves and carry them to a \
    purchase decision. Structure every page as HOOK (hero: the transformed future in one line), \
    AGITATION (problem: the frustration of failed attempts, with empathy), SOLUTION (how this \
    product removes the obstacle), TRUST (data, expertise, certification) and CTA (why start \
    today). Never promise medical outcomes.";

/// System prompt for household / daily-life products.
pub const DAILY_LIFE_SYSTEM: &str = "You are a copywriter for household and everyday-living \
    products. Focus on practical convenience: time saved, effort removed, weight, size and \
    durability expressed as concrete numbers. Structure every page as HOOK (hero: the easier \
    day), AGITATION (problem: the everyday annoyance), SOLUTION (how the product removes it), \
    TRUST (quality evidence, certifications, sales figures) and CTA (why switch now).";

/// Seller data block. Replace: {name}, {category}, {purpose_label}, {tone_block},
/// {features}, {target_audience}, {details_block}
pub const SELLER_DATA_TEMPLATE: &str = r#"SELLER INPUT
- Product name: {name}
- Category: {category}
- Product purpose: {purpose_label}
- Key features: {features}
- Target customer: {target_audience}

{tone_block}

{details_block}"#;

/// Placeholder used for any seller field left blank.
pub const NOT_PROVIDED: &str = "(not provided; infer something plausible and modest)";

/// Outline prompt. Replace: {seller_data}, {focus}, {color_hint}
pub const OUTLINE_PROMPT_TEMPLATE: &str = r##"{seller_data}

PURPOSE FOCUS:
{focus}

Create a DRAFT OUTLINE for the product detail page. Keep it short: a title and a one-to-two
sentence outline per section. Include exactly these section types, in this order:
1. hero - hook headline
2. problem - empathy with the customer's problem
3. solution - how the product solves it
4. features - key product features
5. trust - trust building
6. reviews - customer reviews
7. faq - frequently asked questions
8. guide - expert guide
9. comparison - comparison table
10. cta - call to action

Also suggest two brand colors as HEX codes. {color_hint}

Return a JSON object with this EXACT schema:
{
  "sections": [
    {"type": "hero", "title": "short title", "outline": "one or two sentences", "isApproved": true}
  ],
  "suggestedColors": {"primary": "#4CAF50", "secondary": "#81C784"}
}"##;

/// Detail fill-in prompt.
/// Replace: {seller_data}, {focus}, {copy_instruction}, {approved_sections}, {image_mood}
pub const DETAIL_PROMPT_TEMPLATE: &str = r#"{seller_data}

PURPOSE FOCUS:
{focus}

{copy_instruction}

Write the full copy for each of the APPROVED sections below. Keep the given type of every
section and return the sections in the same order. Do NOT add sections that are not listed.

APPROVED SECTIONS:
{approved_sections}

For every section return: title (the core message in one or two sentences), content (two to
four sentences mixing empathy and logic), subContent (three to five concrete bullet points),
imagePrompt (an English description of the photo for this section; {image_mood}).

Return a JSON object with this EXACT schema:
{
  "sections": [
    {"type": "hero", "title": "...", "content": "...", "subContent": ["..."], "imagePrompt": "..."}
  ]
}"#;

/// One-shot page prompt. Replace: {seller_data}, {focus}, {copy_instruction}, {image_mood}, {color_hint}
pub const PAGE_PROMPT_TEMPLATE: &str = r##"{seller_data}

PURPOSE FOCUS:
{focus}

{copy_instruction}

Plan a complete high-conversion detail page with EXACTLY five sections, in this order:
1. hero - HOOK
2. problem - AGITATION
3. solution - SOLUTION
4. trust - TRUST
5. cta - CTA

For every section return: title, content (two to four sentences), subContent (three to five
bullet points), imagePrompt (English; {image_mood}). Suggest brand colors. {color_hint}

Return a JSON object with this EXACT schema:
{
  "sections": [
    {"type": "hero", "title": "...", "content": "...", "subContent": ["..."], "imagePrompt": "..."}
  ],
  "brandColors": {"primary": "#4CAF50", "secondary": "#81C784"}
}"##;

/// Auto content prompt (FAQ, expert guide, comparison table).
/// Replace: {name}, {category}, {purpose_label}, {faq_topics}, {expert_example}, {comparison_topics}
pub const AUTO_CONTENT_PROMPT_TEMPLATE: &str = r#"Product name: {name}
Category: {category}
Product purpose: {purpose_label}

Create the following content for this product, in the same language as the product name:

1. FAQ: exactly five questions a real buyer would ask, with answers.
   Cover: {faq_topics}.
   Give each item a short unique id such as "faq-1".
2. Expert guide: an expert name and title (for example {expert_example}), three to five core
   tips, and a one-sentence recommendation. Also give the guide a section title.
3. Comparison table against a generic competitor ("Other brands"): five to seven rows about
   {comparison_topics}. Each cell is "O" (has it), "X" (does not) or a very short text value.
   Use the product name as ourProductName.

Return a JSON object with this EXACT schema:
{
  "faq": [{"id": "faq-1", "question": "...", "answer": "..."}],
  "guide": {
    "title": "...",
    "expertName": "...",
    "expertTitle": "...",
    "tips": ["..."],
    "recommendation": "..."
  },
  "comparison": {
    "title": "...",
    "ourProductName": "...",
    "competitorName": "Other brands",
    "items": [{"feature": "...", "ourProduct": "O", "competitor": "X"}]
  }
}"#;

/// Wrapper used when a base product photo is attached to an image request.
/// Replace: {scene}
pub const BASE_IMAGE_SCENE_TEMPLATE: &str = "Keep the exact product from the attached image. \
    Place it in this new environment: {scene}. Hyper-realistic commercial product photography.";
