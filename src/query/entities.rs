//! Entity extraction for groundwater queries.
//!
//! Locations are matched against the reference catalog; years and
//! categories are pulled from the text directly. Every rule runs on
//! every query, independently of the classified intent.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::store::{Catalog, CatalogSource};

use super::types::*;

static YEAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(20\d{2})\b").expect("Invalid regex"));

/// Substring checks for categories, in detection order.
///
/// The checks are independent, so "semi-critical" yields both
/// `Critical` and `SemiCritical`.
const CATEGORY_KEYWORDS: &[(&[&str], Category)] = &[
    (&["safe"], Category::Safe),
    (&["critical"], Category::Critical),
    (&["semi", "semi-critical"], Category::SemiCritical),
    (&["over", "exploited"], Category::OverExploited),
];

// ============================================================================
// Entity Extractor
// ============================================================================

/// Extracts locations, years and categories from query text.
#[derive(Clone)]
pub struct EntityExtractor {
    catalog: Arc<dyn CatalogSource>,
}

impl EntityExtractor {
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self { catalog }
    }

    /// Extract entities from lower-cased query text.
    ///
    /// The classification is recorded for tracing only. A catalog failure
    /// is logged and yields no locations.
    pub fn extract(&self, text: &str, classification: &Classification) -> Entities {
        let span = tracing::debug_span!("extract_entities", intent = %classification.intent);
        let _guard = span.enter();

        let locations = match self.catalog.list_known_names() {
            Ok(catalog) => extract_locations(text, &catalog),
            Err(e) => {
                tracing::warn!("Could not fetch locations: {}", e);
                Vec::new()
            }
        };

        let entities = Entities {
            locations,
            years: extract_years(text),
            categories: extract_categories(text),
        };

        tracing::debug!(
            locations = entities.locations.len(),
            years = entities.years.len(),
            categories = entities.categories.len(),
            "Extracted entities"
        );
        entities
    }
}

// ============================================================================
// Extraction Rules
// ============================================================================

/// Match catalog names in `text`, title-cased, first occurrence first.
pub fn extract_locations(text: &str, catalog: &Catalog) -> Vec<String> {
    let text = text.to_lowercase();
    let states = lowercase_all(&catalog.states);
    let districts = lowercase_all(&catalog.districts);
    let blocks = lowercase_all(&catalog.blocks);
    let district_heads: Vec<&str> = districts
        .iter()
        .filter_map(|d| d.split_whitespace().next())
        .collect();

    let mut found = OrderedNames::default();

    for word in text.split_whitespace() {
        if states.iter().any(|s| s == word) {
            found.push(word);
        } else if district_heads.contains(&word) {
            if let Some(district) = districts.iter().find(|d| d.starts_with(word)) {
                found.push(district);
            }
        }
    }

    for name in states.iter().chain(&districts).chain(&blocks) {
        if !name.is_empty() && text.contains(name.as_str()) {
            found.push(name);
        }
    }

    found.into_vec()
}

/// Years 2000-2099 in text order, duplicates kept.
pub fn extract_years(text: &str) -> Vec<i64> {
    YEAR_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).and_then(|m| m.as_str().parse().ok()))
        .collect()
}

/// Categories whose keywords appear anywhere in `text`.
pub fn extract_categories(text: &str) -> Vec<Category> {
    let text = text.to_lowercase();
    CATEGORY_KEYWORDS
        .iter()
        .filter(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, category)| *category)
        .collect()
}

/// Capitalize the first letter of every alphabetic run, lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

fn lowercase_all(names: &[String]) -> Vec<String> {
    names.iter().map(|n| n.to_lowercase()).collect()
}

/// Insertion-ordered, de-duplicated title-cased names.
#[derive(Default)]
struct OrderedNames(Vec<String>);

impl OrderedNames {
    fn push(&mut self, name: &str) {
        let name = title_case(name);
        if !self.0.contains(&name) {
            self.0.push(name);
        }
    }

    fn into_vec(self) -> Vec<String> {
        self.0
    }
}

// ============================================================================
// Tests
// ============================================================================
