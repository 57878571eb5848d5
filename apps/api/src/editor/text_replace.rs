//! Find/replace over a generated page.
//!
//! Edits go through the page's text fields, visited in document order, so the
//! structured page and anything rendered or exported from it stay in sync.
//! Matching is literal and case-insensitive; the replacement is inserted as-is.

use regex::{NoExpand, Regex, RegexBuilder};

use crate::errors::AppError;
use crate::generation::models::DetailPage;

fn literal_pattern(search: &str) -> Result<Regex, AppError> {
    if search.is_empty() {
        return Err(AppError::Validation("search text cannot be empty".to_string()));
    }
    RegexBuilder::new(&regex::escape(search))
        .case_insensitive(true)
        .build()
        .map_err(|e| AppError::Validation(format!("search text is too long to match: {e}")))
}

/// Replaces `search` with `replacement` and returns how many matches changed.
///
/// With `replace_all == false` only the first match of the first matching field
/// is replaced.
pub fn replace_text(
    page: &mut DetailPage,
    search: &str,
    replacement: &str,
    replace_all: bool,
) -> Result<usize, AppError> {
    let pattern = literal_pattern(search)?;
    let mut replaced = 0;

    for section in page.sections.iter_mut() {
        for field in section.text_fields_mut() {
            let matches = pattern.find_iter(field).count();
            if matches == 0 {
                continue;
            }

            if replace_all {
                *field = pattern
                    .replace_all(field, NoExpand(replacement))
                    .into_owned();
                replaced += matches;
            } else {
                *field = pattern.replacen(field, 1, NoExpand(replacement)).into_owned();
                return Ok(1);
            }
        }
    }

    Ok(replaced)
}

/// Counts matches across the page without changing it.
pub fn count_matches(page: &DetailPage, search: &str) -> Result<usize, AppError> {
    let pattern = literal_pattern(search)?;
    let mut scratch = page.clone();
    Ok(scratch
        .sections
        .iter_mut()
        .flat_map(|s| s.text_fields_mut())
        .map(|field| pattern.find_iter(field).count())
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::models::{
        BrandColors, ComparisonData, ComparisonItem, ComparisonValue, DetailSection, FaqItem,
        SectionKind,
    };

    fn section(title: &str, content: &str, kind: SectionKind) -> DetailSection {
        DetailSection {
            title: title.to_string(),
            content: content.to_string(),
            sub_content: vec![],
            image_prompt: None,
            image_url: None,
            kind,
        }
    }

    fn page() -> DetailPage {
        DetailPage {
            sections: vec![
                section("Collagen for you", "Daily collagen, made simple.", SectionKind::Hero),
                section(
                    "Questions",
                    "About COLLAGEN",
                    SectionKind::Faq {
                        items: vec![FaqItem {
                            id: "faq-1".to_string(),
                            question: "Is collagen safe?".to_string(),
                            answer: "Yes.".to_string(),
                        }],
                    },
                ),
                section(
                    "Compare",
                    "",
                    SectionKind::Comparison(ComparisonData {
                        our_product_name: "Collagen Peptide".to_string(),
                        competitor_name: "Other brands".to_string(),
                        items: vec![ComparisonItem {
                            feature: "Dose".to_string(),
                            our_product: ComparisonValue::Text("2,000mg collagen".to_string()),
                            competitor: ComparisonValue::Flag(false),
                        }],
                    }),
                ),
            ],
            brand_colors: BrandColors::fallback(),
            base_image: None,
        }
    }

    #[test]
    fn test_replace_all_is_case_insensitive_across_sections() {
        let mut page = page();
        let replaced = replace_text(&mut page, "collagen", "Elastin", true).unwrap();

        assert_eq!(replaced, 6);
        assert_eq!(page.sections[0].title, "Elastin for you");
        assert_eq!(page.sections[1].content, "About Elastin");
        let SectionKind::Faq { items } = &page.sections[1].kind else {
            panic!("expected faq");
        };
        assert_eq!(items[0].question, "Is Elastin safe?");
        let SectionKind::Comparison(data) = &page.sections[2].kind else {
            panic!("expected comparison");
        };
        assert_eq!(data.our_product_name, "Elastin Peptide");
        assert_eq!(
            data.items[0].our_product,
            ComparisonValue::Text("2,000mg Elastin".to_string())
        );
    }

    #[test]
    fn test_replace_first_touches_only_first_match() {
        let mut page = page();
        let replaced = replace_text(&mut page, "COLLAGEN", "Elastin", false).unwrap();

        assert_eq!(replaced, 1);
        assert_eq!(page.sections[0].title, "Elastin for you");
        assert_eq!(page.sections[0].content, "Daily collagen, made simple.");
    }

    #[test]
    fn test_search_is_literal_and_replacement_is_not_expanded() {
        let mut page = page();
        page.sections[0].title = "Price (USD) 1.5".to_string();

        let replaced = replace_text(&mut page, "(usd) 1.5", "$1 each", true).unwrap();
        assert_eq!(replaced, 1);
        assert_eq!(page.sections[0].title, "Price $1 each");

        assert_eq!(replace_text(&mut page, ".*", "x", true).unwrap(), 0);
    }

    #[test]
    fn test_empty_search_is_rejected() {
        let mut page = page();
        assert!(matches!(
            replace_text(&mut page, "", "x", true),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_no_match_leaves_page_unchanged() {
        let mut page = page();
        let before = page.clone();
        assert_eq!(replace_text(&mut page, "retinol", "x", true).unwrap(), 0);
        assert_eq!(page, before);
    }

    #[test]
    fn test_count_matches() {
        let page = page();
        assert_eq!(count_matches(&page, "collagen").unwrap(), 6);
        assert_eq!(count_matches(&page, "zzz").unwrap(), 0);
    }
}
