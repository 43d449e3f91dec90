//! Built-in concern-category catalog and area keyword rules.
//!
//! Hand-authored seed tables compiled once into an immutable
//! [`CategoryCatalog`] that is passed explicitly into every matching
//! function. Keyword patterns are compiled here, at load time, since the
//! catalog never changes after construction.

use serde::Serialize;

use crate::domain::area::Area;
use crate::domain::category::{Category, CategoryId};
use crate::matching::pattern::KeywordPattern;

#[derive(Debug, Clone, Copy)]
struct CategorySeed {
    id: &'static str,
    display_name: &'static str,
    maps_to_photos: &'static [&'static str],
    maps_to_specific_issues: &'static [&'static str],
}

const CATEGORY_SEEDS: &[CategorySeed] = &[
    CategorySeed {
        id: "smooth-wrinkles-lines",
        display_name: "Smooth Wrinkles & Lines",
        maps_to_photos: &[
            "wrinkle",
            "fine lines",
            "forehead lines",
            "frown lines",
            "crow's feet",
            "smile lines",
        ],
        maps_to_specific_issues: &["forehead-lines", "frown-lines", "crows-feet", "smokers-lines"],
    },
    CategorySeed {
        id: "restore-volume-definition",
        display_name: "Restore Volume & Definition",
        maps_to_photos: &["hollow", "volume loss", "sunken", "flat cheeks", "thin lips"],
        maps_to_specific_issues: &[
            "under-eye-hollow",
            "hollow-cheeks",
            "volume-loss",
            "thin-lips",
        ],
    },
    CategorySeed {
        id: "facial-balancing",
        display_name: "Facial Balancing",
        maps_to_photos: &[
            "balancing",
            "profile",
            "chin augmentation",
            "jawline contour",
            "nose reshaping",
        ],
        maps_to_specific_issues: &["weak-chin", "retruded-chin", "facial-asymmetry"],
    },
    CategorySeed {
        id: "improve-skin-texture",
        display_name: "Improve Skin Texture & Tone",
        maps_to_photos: &[
            "texture",
            "pores",
            "acne scars",
            "pigmentation",
            "melasma",
            "sun damage",
            "redness",
        ],
        maps_to_specific_issues: &["acne-scars", "enlarged-pores", "uneven-tone", "sun-damage"],
    },
    CategorySeed {
        id: "lift-tighten",
        display_name: "Lift & Tighten",
        maps_to_photos: &["sagging", "laxity", "loose skin", "jowls", "ptosis"],
        maps_to_specific_issues: &["skin-laxity", "jowls", "brow-ptosis", "neck-laxity"],
    },
    CategorySeed {
        id: "reduce-fat-contour",
        display_name: "Reduce Fat & Contour",
        maps_to_photos: &[
            "double chin",
            "submental",
            "fat reduction",
            "body contour",
            "stubborn fat",
        ],
        maps_to_specific_issues: &["double-chin", "stubborn-fat", "love-handles"],
    },
    CategorySeed {
        id: "under-eye-rejuvenation",
        display_name: "Under-Eye Rejuvenation",
        maps_to_photos: &["under eye", "under-eye", "tear trough", "dark circles", "eye bags"],
        maps_to_specific_issues: &["under-eye-bags", "dark-circles", "tear-trough-hollow"],
    },
    CategorySeed {
        id: "clear-acne",
        display_name: "Clear Acne & Breakouts",
        maps_to_photos: &["acne", "breakout", "blemish"],
        maps_to_specific_issues: &["active-acne", "hormonal-acne"],
    },
    CategorySeed {
        id: "hair-restoration",
        display_name: "Hair Restoration",
        // No structured issue tags exist for hair records, so issue matching
        // is skipped for this category.
        maps_to_photos: &["hair loss", "thinning hair", "hairline", "hair restoration"],
        maps_to_specific_issues: &[],
    },
];

#[derive(Debug, Clone, Copy)]
struct AreaRuleSeed {
    area: Area,
    keywords: &'static [&'static str],
    specificity: u8,
}

// Higher specificity wins; "brow ptosis" must claim Forehead before the
// generic "brow" rule can claim Eyes.
const AREA_RULE_SEEDS: &[AreaRuleSeed] = &[
    AreaRuleSeed {
        area: Area::Forehead,
        keywords: &["brow ptosis", "forehead lines", "frown lines", "glabella"],
        specificity: 3,
    },
    AreaRuleSeed {
        area: Area::Eyes,
        keywords: &["tear trough", "under eye", "under-eye", "crow's feet", "eyelid"],
        specificity: 3,
    },
    AreaRuleSeed {
        area: Area::Jawline,
        keywords: &["double chin", "submental", "marionette"],
        specificity: 3,
    },
    AreaRuleSeed { area: Area::Cheeks, keywords: &["nasolabial", "midface", "mid face"], specificity: 3 },
    AreaRuleSeed { area: Area::Lips, keywords: &["perioral", "smile lines"], specificity: 3 },
    AreaRuleSeed { area: Area::Neck, keywords: &["neck laxity", "platysma"], specificity: 3 },
    AreaRuleSeed { area: Area::Forehead, keywords: &["forehead"], specificity: 2 },
    AreaRuleSeed { area: Area::Cheeks, keywords: &["cheek"], specificity: 2 },
    AreaRuleSeed { area: Area::Jawline, keywords: &["jawline", "jowl", "chin"], specificity: 2 },
    AreaRuleSeed { area: Area::Lips, keywords: &["lip"], specificity: 2 },
    AreaRuleSeed { area: Area::Nose, keywords: &["nose", "nasal"], specificity: 2 },
    AreaRuleSeed { area: Area::Neck, keywords: &["neck"], specificity: 2 },
    AreaRuleSeed {
        area: Area::Abdomen,
        keywords: &["abdomen", "stomach", "belly", "tummy"],
        specificity: 2,
    },
    AreaRuleSeed { area: Area::Arms, keywords: &["arm", "bingo wings"], specificity: 2 },
    AreaRuleSeed { area: Area::Thighs, keywords: &["thigh", "leg"], specificity: 2 },
    AreaRuleSeed { area: Area::Eyes, keywords: &["brow", "eye"], specificity: 1 },
];

/// Treatment-method tokens recognized by the concern/treatment extractor.
pub const TREATMENT_TOKENS: &[&str] = &[
    "laser",
    "botox",
    "filler",
    "rf",
    "microneedling",
    "ultherapy",
    "prp",
    "peel",
    "threads",
    "morpheus8",
    "sculptra",
    "dysport",
    "jeuveau",
    "fraxel",
    "ipl",
    "bbl",
    "kybella",
    "coolsculpting",
    "emsculpt",
    "radiesse",
    "juvederm",
    "restylane",
    "voluma",
];

/// A category with its keyword patterns compiled.
#[derive(Clone, Debug)]
pub struct CompiledCategory {
    pub category: Category,
    pub photo_patterns: Vec<KeywordPattern>,
    pub issue_patterns: Vec<KeywordPattern>,
}

/// One priority-ordered area rule.
///
/// Keywords are stored lower-cased and longest-first; `specificity` is the
/// explicit rank the matcher scans by (higher first).
#[derive(Clone, Debug, Serialize)]
pub struct AreaRule {
    pub area: Area,
    pub keywords: Vec<String>,
    pub specificity: u8,
}

/// Immutable catalog handed to the engine at construction.
#[derive(Clone, Debug)]
pub struct CategoryCatalog {
    categories: Vec<CompiledCategory>,
    area_rules: Vec<AreaRule>,
}

impl CategoryCatalog {
    /// The hand-authored production catalog.
    pub fn builtin() -> Self {
        let categories = CATEGORY_SEEDS
            .iter()
            .map(|seed| {
                let category = Category {
                    id: CategoryId(seed.id.to_owned()),
                    display_name: seed.display_name.to_owned(),
                    maps_to_photos: seed.maps_to_photos.iter().map(|s| (*s).to_owned()).collect(),
                    maps_to_specific_issues: seed
                        .maps_to_specific_issues
                        .iter()
                        .map(|s| (*s).to_owned())
                        .collect(),
                };
                Self::compile(category)
            })
            .collect();

        let mut area_rules: Vec<AreaRule> = AREA_RULE_SEEDS
            .iter()
            .map(|seed| {
                let mut keywords: Vec<String> =
                    seed.keywords.iter().map(|k| k.to_lowercase()).collect();
                keywords.sort_by(|a, b| b.len().cmp(&a.len()));
                AreaRule { area: seed.area, keywords, specificity: seed.specificity }
            })
            .collect();
        area_rules.sort_by(|a, b| b.specificity.cmp(&a.specificity));

        Self { categories, area_rules }
    }

    /// Build a catalog from caller-supplied categories, compiling patterns
    /// once. Area rules stay the built-in table.
    pub fn from_categories(categories: Vec<Category>) -> Self {
        let builtin = Self::builtin();
        Self {
            categories: categories.into_iter().map(Self::compile).collect(),
            area_rules: builtin.area_rules,
        }
    }

    fn compile(category: Category) -> CompiledCategory {
        let photo_patterns =
            category.maps_to_photos.iter().map(|k| KeywordPattern::new(k)).collect();
        let issue_patterns =
            category.maps_to_specific_issues.iter().map(|k| KeywordPattern::new(k)).collect();
        CompiledCategory { category, photo_patterns, issue_patterns }
    }

    pub fn categories(&self) -> &[CompiledCategory] {
        &self.categories
    }

    pub fn get(&self, id: &CategoryId) -> Option<&CompiledCategory> {
        self.categories.iter().find(|compiled| &compiled.category.id == id)
    }

    pub fn area_rules(&self) -> &[AreaRule] {
        &self.area_rules
    }

    pub fn category_ids(&self) -> impl Iterator<Item = &CategoryId> {
        self.categories.iter().map(|compiled| &compiled.category.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_category_has_photo_keywords() {
        for compiled in CategoryCatalog::builtin().categories() {
            assert!(
                !compiled.category.maps_to_photos.is_empty(),
                "category {} has no photo keywords",
                compiled.category.id
            );
            assert_eq!(compiled.photo_patterns.len(), compiled.category.maps_to_photos.len());
        }
    }

    #[test]
    fn category_ids_are_unique() {
        let catalog = CategoryCatalog::builtin();
        let ids: HashSet<&str> = catalog.category_ids().map(|id| id.as_str()).collect();
        assert_eq!(ids.len(), catalog.categories().len());
    }

    #[test]
    fn lookup_by_id_finds_seeded_category() {
        let catalog = CategoryCatalog::builtin();
        let compiled = catalog.get(&CategoryId::from("restore-volume-definition")).unwrap();
        assert_eq!(compiled.category.display_name, "Restore Volume & Definition");
        assert!(compiled.category.maps_to_photos.iter().any(|k| k == "hollow"));
    }

    #[test]
    fn area_rules_are_ordered_most_specific_first() {
        let rules = CategoryCatalog::builtin();
        let ranks: Vec<u8> = rules.area_rules().iter().map(|rule| rule.specificity).collect();
        let mut sorted = ranks.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(ranks, sorted);
    }

    #[test]
    fn area_rule_keywords_are_lowercase_and_longest_first() {
        for rule in CategoryCatalog::builtin().area_rules() {
            for pair in rule.keywords.windows(2) {
                assert!(pair[0].len() >= pair[1].len());
            }
            assert!(rule.keywords.iter().all(|k| k.chars().all(|c| !c.is_uppercase())));
        }
    }
}
