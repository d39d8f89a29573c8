//! Types for the natural language query pipeline.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ============================================================================
// Intent
// ============================================================================

/// Intent of a groundwater query.
///
/// Declaration order is classification order. New intents are appended;
/// existing ones keep their meaning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Block-level status for a location and year
    GroundwaterStatus,
    /// Critical and over-exploited blocks
    CriticalAreas,
    /// Safe blocks
    SafeAreas,
    /// Pre/post monsoon water levels
    WaterLevel,
    /// Year-over-year trends
    Historical,
    /// Annual recharge figures
    Recharge,
    /// Extraction figures
    Extraction,
    /// Comparison between regions (resolved as `General`)
    Comparison,
    /// Capability listing
    Help,
    /// Coverage statistics; the fallback intent
    #[default]
    General,
}

impl Intent {
    /// Every intent, in classification order.
    pub const ALL: [Intent; 10] = [
        Intent::GroundwaterStatus,
        Intent::CriticalAreas,
        Intent::SafeAreas,
        Intent::WaterLevel,
        Intent::Historical,
        Intent::Recharge,
        Intent::Extraction,
        Intent::Comparison,
        Intent::Help,
        Intent::General,
    ];

    /// Wire name of the intent.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GroundwaterStatus => "groundwater_status",
            Self::CriticalAreas => "critical_areas",
            Self::SafeAreas => "safe_areas",
            Self::WaterLevel => "water_level",
            Self::Historical => "historical",
            Self::Recharge => "recharge",
            Self::Extraction => "extraction",
            Self::Comparison => "comparison",
            Self::Help => "help",
            Self::General => "general",
        }
    }

    /// Get a human-readable name for this intent.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::GroundwaterStatus => "Groundwater Status",
            Self::CriticalAreas => "Critical Areas",
            Self::SafeAreas => "Safe Areas",
            Self::WaterLevel => "Water Level",
            Self::Historical => "Historical Trends",
            Self::Recharge => "Recharge",
            Self::Extraction => "Extraction",
            Self::Comparison => "Comparison",
            Self::Help => "Help",
            Self::General => "General Statistics",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intent::ALL
            .iter()
            .copied()
            .find(|intent| intent.as_str() == s)
            .ok_or_else(|| format!("unknown intent: {}", s))
    }
}

// ============================================================================
// Classification Result
// ============================================================================

/// The rule that selected an intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMatch {
    /// Source of the regular expression that matched
    pub pattern: String,
    /// Text matched by the expression
    pub matched_text: String,
}

/// Result of intent classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub intent: Intent,
    /// `None` when no rule matched and the default was used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched: Option<PatternMatch>,
}

impl Classification {
    pub fn new(intent: Intent, matched: PatternMatch) -> Self {
        Self {
            intent,
            matched: Some(matched),
        }
    }

    /// Classification used when nothing matched.
    pub fn fallback() -> Self {
        Self {
            intent: Intent::General,
            matched: None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.matched.is_none()
    }
}

// ============================================================================
// Entities
// ============================================================================

/// Groundwater risk category of an assessed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Safe,
    #[serde(rename = "Semi-Critical")]
    SemiCritical,
    Critical,
    #[serde(rename = "Over-Exploited")]
    OverExploited,
}

impl Category {
    /// Label as stored in the assessment table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::SemiCritical => "Semi-Critical",
            Self::Critical => "Critical",
            Self::OverExploited => "Over-Exploited",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entities extracted from a query.
///
/// Empty lists are omitted when serialized: absence means nothing was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    /// Title-cased location names, first occurrence first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<String>,
    /// Years in text order, duplicates kept
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub years: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<Category>,
}

impl Entities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.locations.push(location.into());
        self
    }

    pub fn with_year(mut self, year: i64) -> Self {
        self.years.push(year);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    pub fn first_location(&self) -> Option<&str> {
        self.locations.first().map(String::as_str)
    }

    pub fn first_year(&self) -> Option<i64> {
        self.years.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty() && self.years.is_empty() && self.categories.is_empty()
    }
}

// ============================================================================
// Resolution Records
// ============================================================================

/// One block in a groundwater status listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockStatus {
    pub block_name: String,
    pub category: String,
    pub stage_of_extraction: f64,
    pub water_level: f64,
    pub annual_recharge: f64,
    pub district: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroundwaterStatus {
    pub location: String,
    pub year: i64,
    pub blocks: Vec<BlockStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalArea {
    pub block: String,
    pub district: String,
    pub state: String,
    pub category: String,
    pub extraction_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalAreas {
    pub critical_areas: Vec<CriticalArea>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafeArea {
    pub block: String,
    pub district: String,
    pub state: String,
    pub extraction_percentage: f64,
    pub annual_recharge: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafeAreas {
    pub safe_areas: Vec<SafeArea>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockWaterLevel {
    pub block: String,
    pub pre_monsoon: f64,
    pub post_monsoon: f64,
    pub year: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalWaterLevels {
    pub location: String,
    pub water_levels: Vec<BlockWaterLevel>,
}

/// National averages. Fields are absent when the year has no assessments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageWaterLevels {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_monsoon: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_monsoon: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NationalWaterLevels {
    pub average_water_levels: AverageWaterLevels,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalTrend {
    pub year: i64,
    pub avg_extraction: f64,
    pub avg_water_level: f64,
    pub blocks_assessed: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalTrends {
    pub historical_trends: Vec<HistoricalTrend>,
    /// Location name, or "All India" for nationwide trends
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockRecharge {
    pub block: String,
    pub annual_recharge: f64,
    pub extractable_resources: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalRecharge {
    pub location: String,
    pub recharge_data: Vec<BlockRecharge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RechargeSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_annual_recharge: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_extractable: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_recharge: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NationalRecharge {
    pub national_recharge: RechargeSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockExtraction {
    pub block: String,
    pub total_extraction: f64,
    pub extraction_stage: f64,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocalExtraction {
    pub location: String,
    pub extraction_data: Vec<BlockExtraction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_extraction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_stage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_extraction: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NationalExtraction {
    pub national_extraction: ExtractionSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HelpInfo {
    pub help: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageStats {
    pub states_covered: i64,
    pub districts_covered: i64,
    pub blocks_covered: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_extraction_stage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneralStats {
    pub general_stats: CoverageStats,
    /// Block count per category for the assessment year
    pub category_distribution: BTreeMap<String, i64>,
}

/// Result of resolving an intent against the store.
///
/// Serialized untagged: each variant produces the record shape the
/// formatter expects for its intent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResolutionResult {
    GroundwaterStatus(GroundwaterStatus),
    CriticalAreas(CriticalAreas),
    SafeAreas(SafeAreas),
    LocalWaterLevels(LocalWaterLevels),
    NationalWaterLevels(NationalWaterLevels),
    HistoricalTrends(HistoricalTrends),
    LocalRecharge(LocalRecharge),
    NationalRecharge(NationalRecharge),
    LocalExtraction(LocalExtraction),
    NationalExtraction(NationalExtraction),
    Help(HelpInfo),
    General(GeneralStats),
}

impl ResolutionResult {
    /// Number of block-level or trend records carried by the result.
    pub fn record_count(&self) -> usize {
        match self {
            Self::GroundwaterStatus(r) => r.blocks.len(),
            Self::CriticalAreas(r) => r.critical_areas.len(),
            Self::SafeAreas(r) => r.safe_areas.len(),
            Self::LocalWaterLevels(r) => r.water_levels.len(),
            Self::HistoricalTrends(r) => r.historical_trends.len(),
            Self::LocalRecharge(r) => r.recharge_data.len(),
            Self::LocalExtraction(r) => r.extraction_data.len(),
            Self::Help(r) => r.help.len(),
            Self::NationalWaterLevels(_)
            | Self::NationalRecharge(_)
            | Self::NationalExtraction(_)
            | Self::General(_) => 1,
        }
    }
}

// ============================================================================
// Query Outcome
// ============================================================================

/// Output of the full pipeline for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutcome {
    pub intent: Intent,
    pub entities: Entities,
    pub data: ResolutionResult,
    /// The raw query text as received
    pub query: String,
}

// ============================================================================
// Tests
// ============================================================================
