//! Supply catalog and free-text item key normalization.
//!
//! Families and staff type item names by hand ("Gloves - Large",
//! "adult briefs/XL", "Chux"). Every such string is reduced to a catalog key
//! before it is stored, so supply requests and deliveries for the same item
//! always share one key.

use serde::Serialize;

use crate::handler::{ErrorKind, Result};

const TRACING_TARGET: &str = "hospice_server::service::catalog";

/// Trailing words that only describe a size.
const SIZE_WORDS: &[&str] = &[
    "xs", "s", "m", "l", "xl", "xxl", "small", "medium", "large", "size",
];

/// One orderable supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogItem {
    pub key: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub aliases: &'static [&'static str],
}

impl CatalogItem {
    const fn new(
        key: &'static str,
        name: &'static str,
        category: &'static str,
        aliases: &'static [&'static str],
    ) -> Self {
        Self {
            key,
            name,
            category,
            aliases,
        }
    }

    /// Returns whether a normalized key names this item.
    pub fn matches(&self, normalized_key: &str) -> bool {
        self.key == normalized_key || self.aliases.contains(&normalized_key)
    }
}

const ITEMS: &[CatalogItem] = &[
    CatalogItem::new(
        "adult_briefs",
        "Adult briefs",
        "incontinence",
        &["briefs", "diapers", "adult_diapers", "incontinence_briefs", "depends"],
    ),
    CatalogItem::new(
        "underpads",
        "Disposable underpads",
        "incontinence",
        &["chux", "bed_pads", "underpad", "pads"],
    ),
    CatalogItem::new(
        "wipes",
        "Personal cleansing wipes",
        "incontinence",
        &["wet_wipes", "baby_wipes", "personal_wipes", "cleansing_wipes"],
    ),
    CatalogItem::new(
        "barrier_cream",
        "Skin barrier cream",
        "skin_care",
        &["diaper_cream", "skin_protectant", "zinc_cream"],
    ),
    CatalogItem::new(
        "lotion",
        "Moisturizing lotion",
        "skin_care",
        &["moisturizer", "body_lotion"],
    ),
    CatalogItem::new(
        "gloves",
        "Disposable gloves",
        "infection_control",
        &["exam_gloves", "nitrile_gloves", "latex_gloves", "glove"],
    ),
    CatalogItem::new(
        "hand_sanitizer",
        "Hand sanitizer",
        "infection_control",
        &["sanitizer", "hand_gel"],
    ),
    CatalogItem::new(
        "gauze",
        "Gauze pads",
        "wound_care",
        &["gauze_pads", "gauze_sponges"],
    ),
    CatalogItem::new(
        "wound_dressing",
        "Wound dressings",
        "wound_care",
        &["dressings", "dressing", "bandages", "foam_dressing"],
    ),
    CatalogItem::new(
        "medical_tape",
        "Medical tape",
        "wound_care",
        &["tape", "paper_tape"],
    ),
    CatalogItem::new(
        "mouth_swabs",
        "Oral care swabs",
        "comfort",
        &["oral_swabs", "toothettes", "mouth_care_swabs"],
    ),
    CatalogItem::new(
        "lip_balm",
        "Lip moisturizer",
        "comfort",
        &["chapstick", "lip_moisturizer"],
    ),
    CatalogItem::new(
        "oral_syringes",
        "Oral medication syringes",
        "medication",
        &["syringes", "medicine_syringes"],
    ),
    CatalogItem::new(
        "nutritional_supplement",
        "Nutritional supplement drinks",
        "nutrition",
        &["ensure", "boost", "supplement_drinks", "nutrition_shakes"],
    ),
    CatalogItem::new(
        "feeding_supplies",
        "Enteral feeding supplies",
        "nutrition",
        &["feeding_tube_supplies", "feeding_bags"],
    ),
    CatalogItem::new(
        "catheter_supplies",
        "Catheter supplies",
        "urology",
        &["catheter_kit", "foley_supplies", "drainage_bags"],
    ),
    CatalogItem::new(
        "ostomy_supplies",
        "Ostomy supplies",
        "urology",
        &["ostomy_bags", "colostomy_bags"],
    ),
    CatalogItem::new(
        "oxygen_tubing",
        "Oxygen tubing and cannulas",
        "respiratory",
        &["nasal_cannula", "cannula", "o2_tubing"],
    ),
    CatalogItem::new(
        "trash_bags",
        "Disposal bags",
        "household",
        &["disposal_bags", "garbage_bags"],
    ),
];

/// Reduces a free-text item name to the key format used by the catalog.
///
/// Lowercases and trims, maps spaces, hyphens and slashes to `_`, drops any
/// other punctuation, collapses repeated `_` and strips trailing size words
/// (`xs` .. `xxl`, `small` .. `extra_large`, `size_*`, bare numbers).
pub fn normalize_item_key(raw: &str) -> String {
    let mapped: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' | '-' | '/' | '_' => Some('_'),
            c if c.is_ascii_alphanumeric() => Some(c),
            c if c.is_whitespace() => Some('_'),
            _ => None,
        })
        .collect();

    let mut segments: Vec<&str> = mapped.split('_').filter(|s| !s.is_empty()).collect();

    while segments.len() > 1 {
        let last = segments[segments.len() - 1];
        let previous = segments[segments.len() - 2];

        if segments.len() > 2 && (previous == "size" || (previous == "extra" && last == "large")) {
            segments.truncate(segments.len() - 2);
        } else if SIZE_WORDS.contains(&last) || last.chars().all(|c| c.is_ascii_digit()) {
            segments.pop();
        } else {
            break;
        }
    }

    segments.join("_")
}

/// Read-only supply catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct SupplyCatalog;

impl SupplyCatalog {
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Returns every catalog item.
    #[inline]
    pub fn items(&self) -> &'static [CatalogItem] {
        ITEMS
    }

    /// Returns every catalog key.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        ITEMS.iter().map(|item| item.key)
    }

    /// Looks up an item by an already normalized key or alias.
    pub fn find(&self, normalized_key: &str) -> Option<&'static CatalogItem> {
        ITEMS.iter().find(|item| item.matches(normalized_key))
    }

    /// Normalizes `raw` and resolves it to a catalog item.
    ///
    /// Unknown items are a 400 that lists the known keys.
    pub fn resolve(&self, raw: &str) -> Result<&'static CatalogItem> {
        let normalized_key = normalize_item_key(raw);

        if let Some(item) = self.find(&normalized_key) {
            tracing::debug!(
                target: TRACING_TARGET,
                input = raw,
                item_key = item.key,
                "item key resolved"
            );
            return Ok(item);
        }

        tracing::debug!(
            target: TRACING_TARGET,
            input = raw,
            normalized_key = %normalized_key,
            "unknown supply item"
        );

        let known_keys = self.keys().collect::<Vec<_>>().join(", ");
        Err(ErrorKind::BadRequest
            .with_message(format!("Unknown supply item '{}'", raw.trim()))
            .with_resource("itemKey")
            .with_suggestion(format!("Use one of: {known_keys}")))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn normalization_maps_separators() {
        assert_eq!(normalize_item_key("  Adult Briefs "), "adult_briefs");
        assert_eq!(normalize_item_key("mouth-swabs"), "mouth_swabs");
        assert_eq!(normalize_item_key("gauze/pads"), "gauze_pads");
        assert_eq!(normalize_item_key("hand__sanitizer"), "hand_sanitizer");
    }

    #[test]
    fn normalization_strips_sizes() {
        assert_eq!(normalize_item_key("Gloves - Large"), "gloves");
        assert_eq!(normalize_item_key("adult briefs/XL"), "adult_briefs");
        assert_eq!(normalize_item_key("Adult Briefs Extra Large"), "adult_briefs");
        assert_eq!(normalize_item_key("gloves size m"), "gloves");
        assert_eq!(normalize_item_key("underpads 30"), "underpads");
        assert_eq!(normalize_item_key("Gloves (M)"), "gloves");
    }

    #[test]
    fn size_word_alone_is_kept() {
        assert_eq!(normalize_item_key("Large"), "large");
        assert_eq!(normalize_item_key(""), "");
    }

    #[test]
    fn resolves_aliases() -> anyhow::Result<()> {
        let catalog = SupplyCatalog::new();
        assert_eq!(catalog.resolve("Chux")?.key, "underpads");
        assert_eq!(catalog.resolve("Nitrile Gloves - XL")?.key, "gloves");
        assert_eq!(catalog.resolve("Depends size L")?.key, "adult_briefs");
        Ok(())
    }

    #[test]
    fn unknown_item_lists_known_keys() {
        let error = SupplyCatalog::new().resolve("wheelchair").unwrap_err();

        assert_eq!(error.kind(), ErrorKind::BadRequest);
        assert!(error.suggestion().is_some_and(|s| s.contains("adult_briefs")));
    }

    #[test]
    fn keys_and_aliases_are_unique_and_normalized() {
        let mut seen = HashSet::new();
        for item in SupplyCatalog::new().items() {
            for key in std::iter::once(&item.key).chain(item.aliases) {
                assert_eq!(normalize_item_key(key), *key, "{key} is not normalized");
                assert!(seen.insert(*key), "{key} appears twice");
            }
        }
    }
}
