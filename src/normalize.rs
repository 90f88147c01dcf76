//! Field normalization: raw textual values to canonical form.
//!
//! Every function here is pure and total, and re-applying any of them to
//! its own output yields the same result. That idempotence is what lets a
//! freshly parsed record and a previously canonicalized record flow
//! through the same pipeline.

use anyhow::{anyhow, Result};
use unicode_normalization::UnicodeNormalization;

use crate::models::Rarity;
use crate::tables::{RARITY_REWRITES, SHORT_FORMS};

// ============================================================================
// Helpers
// ============================================================================

/// Trim a string, mapping whitespace-only input to `None`.
pub fn trim_to_null(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Check if a character is a Unicode combining mark (diacritical mark).
fn is_combining_mark(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0xFE20..=0xFE2F)
}

/// Fold accented letters to their ASCII base, preserving case.
/// e.g., "FLABÉBÉ" → "FLABEBE", "Porygon2" → "Porygon2"
pub fn fold_accents(s: &str) -> String {
    let stripped: String = s.nfkd().filter(|c| !is_combining_mark(*c)).collect();
    any_ascii::any_ascii(&stripped)
}

/// Capitalize the first letter of every whitespace-separated word and
/// lower-case the rest. e.g., "ultra RARE" → "Ultra Rare"
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// Normalization Functions
// ============================================================================

/// Normalize a source rarity into the closed canonical set.
///
/// Lower-cases, applies the ordered historical-spelling rewrites, then
/// title-cases. A result outside the canonical set is a configuration
/// error naming the source value: new rarities must be added to
/// `tables::RARITY_REWRITES`, never silently guessed.
pub fn normalize_rarity(raw: &str) -> Result<Rarity> {
    let mut value = raw.to_lowercase();
    for (from, to) in RARITY_REWRITES {
        value = value.replace(from, to);
    }
    let label = title_case(&value);
    Rarity::from_canonical(&label).ok_or_else(|| {
        anyhow!(
            "{:?} (from source rarity {:?}) cannot be accepted as a rarity, please extend the rarity table",
            label,
            raw
        )
    })
}

/// Replace energy-type display names and `{X}` symbol markers with
/// bracketed short codes, and fix up stray punctuation variants.
/// e.g., "{R} Energy" → "[R] Energy", "Water Pokemon" → "[W] Pokémon"
pub fn replace_short_forms(s: &str) -> String {
    let mut result = s.to_string();
    for (from, to) in SHORT_FORMS {
        result = result.replace(from, to);
    }
    result
}

/// Normalize the multiplication sign that appears in damage and
/// weakness/resistance values. e.g., "×2" → "x2"
pub fn sanitize_cross(s: &str) -> String {
    s.replace('\u{d7}', "x")
}

/// Normalize free-text lines: apply short forms, split on the literal
/// two-character `\n` marker embedded by the exporter, drop blank
/// segments, preserve order.
pub fn split_text_lines(lines: &[String]) -> Vec<String> {
    lines
        .iter()
        .map(|line| replace_short_forms(line))
        .flat_map(|line| {
            line.split("\\n")
                .filter(|segment| !segment.trim().is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rarity_maps_historical_spellings() {
        assert_eq!(normalize_rarity("Rare Holo EX").unwrap(), Rarity::UltraRare);
        assert_eq!(normalize_rarity("rare holo gx").unwrap(), Rarity::UltraRare);
        assert_eq!(normalize_rarity("Rare Secret").unwrap(), Rarity::Secret);
        assert_eq!(normalize_rarity("Rare ACE").unwrap(), Rarity::Rare);
        assert_eq!(normalize_rarity("LEGEND").unwrap(), Rarity::UltraRare);
        assert_eq!(normalize_rarity("Rare Holo Lv.X").unwrap(), Rarity::RareHolo);
        assert_eq!(normalize_rarity("common").unwrap(), Rarity::Common);
        assert_eq!(normalize_rarity("Rare Holo").unwrap(), Rarity::RareHolo);
    }

    #[test]
    fn rarity_rejects_unmapped_spellings_by_name() {
        let err = normalize_rarity("Amazing Rare").unwrap_err();
        assert!(err.to_string().contains("Amazing Rare"));
    }

    #[test]
    fn rarity_is_idempotent_on_canonical_labels() {
        for r in Rarity::ALL {
            assert_eq!(normalize_rarity(r.as_str()).unwrap(), r);
        }
    }

    #[test]
    fn short_forms_replace_symbols_and_names() {
        assert_eq!(replace_short_forms("{R} Energy"), "[R] Energy");
        assert_eq!(replace_short_forms("Fire Energy"), "[R] Energy");
        assert_eq!(
            replace_short_forms("Discard a Water Energy card"),
            "Discard a [W] Energy card"
        );
        assert_eq!(replace_short_forms("Water Pokemon"), "[W] Pok\u{e9}mon");
        assert_eq!(replace_short_forms("Colorless"), "[C]");
    }

    #[test]
    fn short_forms_are_idempotent() {
        let inputs = [
            "{R} Energy and Grass Pokemon",
            "Flip a coin \u{2013} if heads, draw a card",
            "Attach a {W} Energy from your hand",
        ];
        for input in inputs {
            let once = replace_short_forms(input);
            assert_eq!(replace_short_forms(&once), once);
        }
    }

    #[test]
    fn cross_is_normalized() {
        assert_eq!(sanitize_cross("\u{d7}2"), "x2");
        assert_eq!(sanitize_cross("30+"), "30+");
        assert_eq!(sanitize_cross(&sanitize_cross("\u{d7}2")), "x2");
    }

    #[test]
    fn text_lines_split_on_newline_marker() {
        let lines = vec!["First line.\\nSecond line.\\n\\n".to_string()];
        assert_eq!(
            split_text_lines(&lines),
            vec!["First line.".to_string(), "Second line.".to_string()]
        );
    }

    #[test]
    fn text_lines_preserve_order_and_drop_blanks() {
        let lines = vec![
            "Draw a card.".to_string(),
            "   ".to_string(),
            "{C} This attack does nothing.".to_string(),
        ];
        assert_eq!(
            split_text_lines(&lines),
            vec![
                "Draw a card.".to_string(),
                "[C] This attack does nothing.".to_string()
            ]
        );
    }

    #[test]
    fn accents_fold_to_ascii() {
        assert_eq!(fold_accents("FLAB\u{c9}B\u{c9}"), "FLABEBE");
        assert_eq!(fold_accents("POK\u{c9}MON"), "POKEMON");
        assert_eq!(fold_accents("MEWTWO"), "MEWTWO");
    }

    #[test]
    fn trim_to_null_handles_blank() {
        assert_eq!(trim_to_null("  "), None);
        assert_eq!(trim_to_null(" Alakazam "), Some("Alakazam".to_string()));
    }

    #[test]
    fn title_case_every_word() {
        assert_eq!(title_case("ultra RARE"), "Ultra Rare");
        assert_eq!(title_case("rare"), "Rare");
    }
}
