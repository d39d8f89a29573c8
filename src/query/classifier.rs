//! Query Intent Classifier.
//!
//! Classifies lower-cased query text against an ordered table of
//! intent rules. The first pattern of the first intent that matches
//! anywhere in the text wins; classification is not best-match.

use std::sync::LazyLock;

use regex::Regex;

use super::types::*;

// ============================================================================
// Intent Rules
// ============================================================================

/// Pattern sources per intent, in evaluation order.
const PATTERN_TABLE: &[(Intent, &[&str])] = &[
    (
        Intent::GroundwaterStatus,
        &[
            r"(what|show|tell).*(groundwater|water).*status.*(of|in|for)\s+(\w+)",
            r"status.*(of|in|for)\s+(\w+)",
            r"groundwater.*(\w+)\s+(district|block|state)",
        ],
    ),
    (
        Intent::CriticalAreas,
        &[
            r"(show|list|which).*(critical|over-exploited|danger)",
            r"areas.*(critical|over-exploited|danger)",
            r"(critical|over-exploited).*(areas|blocks|districts)",
        ],
    ),
    (
        Intent::SafeAreas,
        &[
            r"(show|list|which).*(safe|good).*areas",
            r"areas.*safe",
            r"safe.*(areas|blocks|districts)",
        ],
    ),
    (
        Intent::WaterLevel,
        &[
            r"water level.*(of|in|for)\s+(\w+)",
            r"(depth|level).*water.*(of|in|for)\s+(\w+)",
            r"how deep.*water.*(in|at)\s+(\w+)",
        ],
    ),
    (
        Intent::Historical,
        &[
            r"(historical|history|trend|past).*(data|information|records)",
            r"(show|get).*(trend|historical)",
            r"data.*(from|between)\s+(\d{4})",
        ],
    ),
    (
        Intent::Recharge,
        &[
            r"(recharge|replenishment).*(rate|data|information)",
            r"annual.*recharge",
            r"groundwater.*recharge",
        ],
    ),
    (
        Intent::Extraction,
        &[
            r"(extraction|withdrawal|usage).*(rate|data|information)",
            r"how much.*extract",
            r"groundwater.*(extraction|usage)",
        ],
    ),
    (
        Intent::Comparison,
        &[
            r"compare.*(between|with)",
            r"difference.*between",
            r"(better|worse).*than",
        ],
    ),
    (
        Intent::Help,
        &[
            r"(help|what can you do|features|capabilities)",
            r"how.*(to use|does.*work)",
        ],
    ),
];

/// Compiled patterns for one intent.
#[derive(Debug)]
pub struct IntentRule {
    pub intent: Intent,
    pub patterns: Vec<Regex>,
}

static INTENT_RULES: LazyLock<Vec<IntentRule>> = LazyLock::new(|| {
    PATTERN_TABLE
        .iter()
        .map(|(intent, sources)| IntentRule {
            intent: *intent,
            patterns: sources
                .iter()
                .map(|source| Regex::new(source).expect("Invalid regex"))
                .collect(),
        })
        .collect()
});

// ============================================================================
// Intent Classifier
// ============================================================================

/// Classifies natural language queries into groundwater intents.
#[derive(Debug, Clone, Copy)]
pub struct IntentClassifier {
    rules: &'static [IntentRule],
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Create a classifier over the static rule table.
    pub fn new() -> Self {
        Self {
            rules: INTENT_RULES.as_slice(),
        }
    }

    /// The ordered rule table.
    pub fn rules(&self) -> &'static [IntentRule] {
        self.rules
    }

    /// Classify a query. Input is lower-cased before matching.
    pub fn classify(&self, query: &str) -> Classification {
        self.classify_normalized(&query.to_lowercase())
    }

    /// Classify text that is already lower-cased.
    pub fn classify_normalized(&self, text: &str) -> Classification {
        for rule in self.rules {
            for pattern in &rule.patterns {
                if let Some(found) = pattern.find(text) {
                    tracing::debug!(
                        intent = %rule.intent,
                        pattern = pattern.as_str(),
                        "Classified query"
                    );
                    return Classification::new(
                        rule.intent,
                        PatternMatch {
                            pattern: pattern.as_str().to_string(),
                            matched_text: found.as_str().to_string(),
                        },
                    );
                }
            }
        }

        tracing::debug!("No intent pattern matched, using general");
        Classification::fallback()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn intent_of(query: &str) -> Intent {
        IntentClassifier::new().classify(query).intent
    }

    #[test]
    fn test_rule_table_order() {
        let order: Vec<Intent> = IntentClassifier::new()
            .rules()
            .iter()
            .map(|rule| rule.intent)
            .collect();
        assert_eq!(order, Intent::ALL[..9].to_vec());
    }

    #[test]
    fn test_groundwater_status() {
        assert_eq!(
            intent_of("What is the groundwater status in Punjab 2023"),
            Intent::GroundwaterStatus
        );
        assert_eq!(intent_of("Status of Delhi"), Intent::GroundwaterStatus);
        assert_eq!(
            intent_of("groundwater in Ludhiana district"),
            Intent::GroundwaterStatus
        );
    }

    #[test]
    fn test_critical_areas() {
        for query in [
            "show critical areas",
            "Which blocks are over-exploited?",
            "list danger zones",
            "critical blocks in the country",
            "areas that are critical",
        ] {
            assert_eq!(intent_of(query), Intent::CriticalAreas, "{}", query);
        }
    }

    #[test]
    fn test_safe_areas() {
        assert_eq!(intent_of("Show me safe areas"), Intent::SafeAreas);
        assert_eq!(intent_of("safe blocks please"), Intent::SafeAreas);
    }

    #[test]
    fn test_water_level() {
        assert_eq!(intent_of("water level in Chennai"), Intent::WaterLevel);
        assert_eq!(intent_of("how deep is the water at Pune"), Intent::WaterLevel);
    }

    #[test]
    fn test_historical() {
        assert_eq!(intent_of("show trend for Punjab"), Intent::Historical);
        assert_eq!(intent_of("past records"), Intent::Historical);
        assert_eq!(intent_of("data from 2020"), Intent::Historical);
    }

    #[test]
    fn test_recharge_and_extraction() {
        assert_eq!(intent_of("annual recharge"), Intent::Recharge);
        assert_eq!(intent_of("Recharge rate"), Intent::Recharge);
        assert_eq!(intent_of("how much do we extract"), Intent::Extraction);
        assert_eq!(intent_of("extraction data"), Intent::Extraction);
    }

    #[test]
    fn test_comparison_and_help() {
        assert_eq!(
            intent_of("compare Punjab with Haryana"),
            Intent::Comparison
        );
        assert_eq!(intent_of("What can you do?"), Intent::Help);
        assert_eq!(intent_of("help"), Intent::Help);
    }

    #[test]
    fn test_first_match_wins_across_intents() {
        // Matches both critical_areas and safe_areas rules; the earlier intent wins.
        assert_eq!(
            intent_of("show critical and safe areas"),
            Intent::CriticalAreas
        );
        // "status ... in" beats the later water_level rule.
        assert_eq!(
            intent_of("water level status in Agra"),
            Intent::GroundwaterStatus
        );
    }

    #[test]
    fn test_unmatched_is_general() {
        for query in ["", "hello there", "show me statistics", "rainfall in 2022"] {
            let result = IntentClassifier::new().classify(query);
            assert_eq!(result.intent, Intent::General, "{}", query);
            assert!(result.is_fallback());
        }
    }

    #[test]
    fn test_match_records_pattern() {
        let result = IntentClassifier::new().classify("Show Critical Areas");
        let matched = result.matched.unwrap();
        assert_eq!(
            matched.pattern,
            r"(show|list|which).*(critical|over-exploited|danger)"
        );
        assert_eq!(matched.matched_text, "show critical");
    }
}
