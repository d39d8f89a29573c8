//! Query Resolver.
//!
//! Maps an (intent, entities) pair onto one retrieval strategy and runs it
//! against the assessment store. Location filters always match the state
//! or district name by case-insensitive substring; block names are never
//! a filter key, so a location that only names a block resolves to an
//! empty listing.

use std::collections::BTreeMap;

use rusqlite::{params, Connection};

use crate::config::ResolverConfig;
use crate::error::{Result, StoreError};
use crate::store::AssessmentStore;

use super::types::*;

/// Location label used for nationwide trends.
pub const ALL_INDIA: &str = "All India";

const HELP_LINES: &[&str] = &[
    "You can ask about groundwater status in any state/district/block.",
    "Examples:",
    "- What is the groundwater status in Karnataka?",
    "- Show critical areas in Tamil Nadu",
    "- What is the average water level in Delhi?",
    "- Give me historical trends for Punjab",
    "- Compare extraction between states",
    "- List safe areas in Maharashtra",
    "- Show recharge and extraction rates",
];

// ============================================================================
// Strategy Table
// ============================================================================

/// Inputs available to a store-backed strategy.
pub struct ResolveContext<'a> {
    pub entities: &'a Entities,
    pub settings: &'a ResolverConfig,
    pub conn: &'a Connection,
}

type StoreStrategy = fn(&ResolveContext<'_>) -> rusqlite::Result<ResolutionResult>;

/// How an intent is resolved.
#[derive(Clone, Copy)]
pub enum Strategy {
    /// Answered without touching the store
    Static(fn() -> ResolutionResult),
    /// Answered by querying the store
    Store(StoreStrategy),
}

/// Strategy for each intent.
///
/// `Comparison` has no strategy of its own and resolves as `General`.
pub fn strategy_for(intent: Intent) -> Strategy {
    match intent {
        Intent::GroundwaterStatus => Strategy::Store(groundwater_status),
        Intent::CriticalAreas => Strategy::Store(critical_areas),
        Intent::SafeAreas => Strategy::Store(safe_areas),
        Intent::WaterLevel => Strategy::Store(water_levels),
        Intent::Historical => Strategy::Store(historical_trends),
        Intent::Recharge => Strategy::Store(recharge),
        Intent::Extraction => Strategy::Store(extraction),
        Intent::Help => Strategy::Static(help),
        Intent::Comparison | Intent::General => Strategy::Store(general_stats),
    }
}

// ============================================================================
// Query Resolver
// ============================================================================

/// Resolves classified queries against the assessment store.
#[derive(Debug, Clone)]
pub struct QueryResolver {
    store: AssessmentStore,
    settings: ResolverConfig,
}

impl QueryResolver {
    pub fn new(store: AssessmentStore, settings: ResolverConfig) -> Self {
        Self { store, settings }
    }

    /// Resolve an intent, opening one connection for the duration of the call.
    ///
    /// Store errors are not recovered here.
    pub fn resolve(&self, intent: Intent, entities: &Entities) -> Result<ResolutionResult> {
        if intent == Intent::Comparison {
            tracing::info!("Comparison queries are not supported yet, answering with general statistics");
        }

        if let Strategy::Static(answer) = strategy_for(intent) {
            return Ok(answer());
        }

        let conn = self.store.connect()?;
        Self::resolve_on(&conn, &self.settings, intent, entities)
    }

    /// Resolve an intent on a caller-provided connection.
    pub fn resolve_on(
        conn: &Connection,
        settings: &ResolverConfig,
        intent: Intent,
        entities: &Entities,
    ) -> Result<ResolutionResult> {
        match strategy_for(intent) {
            Strategy::Static(answer) => Ok(answer()),
            Strategy::Store(run) => {
                let ctx = ResolveContext {
                    entities,
                    settings,
                    conn,
                };
                Ok(run(&ctx).map_err(StoreError::from)?)
            }
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round2_opt(value: Option<f64>) -> Option<f64> {
    value.map(round2)
}

/// `LIKE` pattern matching `location` anywhere, lower-cased.
fn like_pattern(location: &str) -> String {
    format!("%{}%", location.to_lowercase())
}

const SCOPED_JOIN: &str = "
    FROM groundwater_assessment ga
    JOIN blocks b ON ga.block_id = b.block_id
    JOIN districts d ON b.district_id = d.district_id
    JOIN states s ON d.state_id = s.state_id";

const LOCATION_FILTER: &str =
    "(LOWER(s.state_name) LIKE ?1 OR LOWER(d.district_name) LIKE ?1)";

// ============================================================================
// Strategies
// ============================================================================

fn groundwater_status(ctx: &ResolveContext<'_>) -> rusqlite::Result<ResolutionResult> {
    let location = ctx
        .entities
        .first_location()
        .unwrap_or(ctx.settings.default_location.as_str())
        .to_string();
    let year = ctx
        .entities
        .first_year()
        .unwrap_or(ctx.settings.assessment_year);

    let sql = format!(
        "SELECT b.block_name, ga.category, ga.stage_of_extraction,
                ga.water_level_pre_monsoon, ga.annual_recharge_mcm,
                d.district_name, s.state_name
         {SCOPED_JOIN}
         WHERE {LOCATION_FILTER} AND ga.assessment_year = ?2
         LIMIT ?3"
    );

    let mut stmt = ctx.conn.prepare(&sql)?;
    let blocks = stmt
        .query_map(
            params![like_pattern(&location), year, ctx.settings.location_limit as i64],
            |row| {
                Ok(BlockStatus {
                    block_name: row.get(0)?,
                    category: row.get(1)?,
                    stage_of_extraction: round2(row.get(2)?),
                    water_level: round2(row.get(3)?),
                    annual_recharge: round2(row.get(4)?),
                    district: row.get(5)?,
                    state: row.get(6)?,
                })
            },
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(ResolutionResult::GroundwaterStatus(GroundwaterStatus {
        location,
        year,
        blocks,
    }))
}

fn critical_areas(ctx: &ResolveContext<'_>) -> rusqlite::Result<ResolutionResult> {
    let sql = format!(
        "SELECT b.block_name, d.district_name, s.state_name,
                ga.category, ga.stage_of_extraction
         {SCOPED_JOIN}
         WHERE ga.category IN ('Critical', 'Over-Exploited')
           AND ga.assessment_year = ?1
         ORDER BY ga.stage_of_extraction DESC
         LIMIT ?2"
    );

    let mut stmt = ctx.conn.prepare(&sql)?;
    let areas = stmt
        .query_map(
            params![ctx.settings.assessment_year, ctx.settings.ranking_limit as i64],
            |row| {
                Ok(CriticalArea {
                    block: row.get(0)?,
                    district: row.get(1)?,
                    state: row.get(2)?,
                    category: row.get(3)?,
                    extraction_percentage: round2(row.get(4)?),
                })
            },
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(ResolutionResult::CriticalAreas(CriticalAreas {
        critical_areas: areas,
    }))
}

fn safe_areas(ctx: &ResolveContext<'_>) -> rusqlite::Result<ResolutionResult> {
    let sql = format!(
        "SELECT b.block_name, d.district_name, s.state_name,
                ga.stage_of_extraction, ga.annual_recharge_mcm
         {SCOPED_JOIN}
         WHERE ga.category = 'Safe'
           AND ga.assessment_year = ?1
         ORDER BY ga.stage_of_extraction ASC
         LIMIT ?2"
    );

    let mut stmt = ctx.conn.prepare(&sql)?;
    let areas = stmt
        .query_map(
            params![ctx.settings.assessment_year, ctx.settings.ranking_limit as i64],
            |row| {
                Ok(SafeArea {
                    block: row.get(0)?,
                    district: row.get(1)?,
                    state: row.get(2)?,
                    extraction_percentage: round2(row.get(3)?),
                    annual_recharge: round2(row.get(4)?),
                })
            },
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(ResolutionResult::SafeAreas(SafeAreas { safe_areas: areas }))
}

fn water_levels(ctx: &ResolveContext<'_>) -> rusqlite::Result<ResolutionResult> {
    let year = ctx.settings.assessment_year;

    let Some(location) = ctx.entities.first_location() else {
        let average_water_levels = ctx.conn.query_row(
            "SELECT AVG(water_level_pre_monsoon), AVG(water_level_post_monsoon)
             FROM groundwater_assessment
             WHERE assessment_year = ?1",
            params![year],
            |row| {
                Ok(AverageWaterLevels {
                    pre_monsoon: round2_opt(row.get(0)?),
                    post_monsoon: round2_opt(row.get(1)?),
                })
            },
        )?;
        return Ok(ResolutionResult::NationalWaterLevels(NationalWaterLevels {
            average_water_levels,
        }));
    };

    let sql = format!(
        "SELECT b.block_name, ga.water_level_pre_monsoon,
                ga.water_level_post_monsoon, ga.assessment_year
         {SCOPED_JOIN}
         WHERE {LOCATION_FILTER} AND ga.assessment_year = ?2
         LIMIT ?3"
    );

    let mut stmt = ctx.conn.prepare(&sql)?;
    let levels = stmt
        .query_map(
            params![like_pattern(location), year, ctx.settings.location_limit as i64],
            |row| {
                Ok(BlockWaterLevel {
                    block: row.get(0)?,
                    pre_monsoon: round2(row.get(1)?),
                    post_monsoon: round2(row.get(2)?),
                    year: row.get(3)?,
                })
            },
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(ResolutionResult::LocalWaterLevels(LocalWaterLevels {
        location: location.to_string(),
        water_levels: levels,
    }))
}

fn historical_trends(ctx: &ResolveContext<'_>) -> rusqlite::Result<ResolutionResult> {
    let map_trend = |row: &rusqlite::Row<'_>| -> rusqlite::Result<HistoricalTrend> {
        Ok(HistoricalTrend {
            year: row.get(0)?,
            avg_extraction: round2(row.get(1)?),
            avg_water_level: round2(row.get(2)?),
            blocks_assessed: row.get(3)?,
        })
    };

    let (trends, location) = match ctx.entities.first_location() {
        Some(location) => {
            let sql = format!(
                "SELECT ga.assessment_year, AVG(ga.stage_of_extraction),
                        AVG(ga.water_level_pre_monsoon), COUNT(DISTINCT b.block_id)
                 {SCOPED_JOIN}
                 WHERE {LOCATION_FILTER}
                 GROUP BY ga.assessment_year
                 ORDER BY ga.assessment_year"
            );
            let mut stmt = ctx.conn.prepare(&sql)?;
            let trends = stmt
                .query_map(params![like_pattern(location)], map_trend)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            (trends, location.to_string())
        }
        None => {
            let mut stmt = ctx.conn.prepare(
                "SELECT assessment_year, AVG(stage_of_extraction),
                        AVG(water_level_pre_monsoon), COUNT(DISTINCT block_id)
                 FROM groundwater_assessment
                 GROUP BY assessment_year
                 ORDER BY assessment_year",
            )?;
            let trends = stmt
                .query_map([], map_trend)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            (trends, ALL_INDIA.to_string())
        }
    };

    Ok(ResolutionResult::HistoricalTrends(HistoricalTrends {
        historical_trends: trends,
        location,
    }))
}

fn recharge(ctx: &ResolveContext<'_>) -> rusqlite::Result<ResolutionResult> {
    let year = ctx.settings.assessment_year;

    let Some(location) = ctx.entities.first_location() else {
        let national_recharge = ctx.conn.query_row(
            "SELECT AVG(annual_recharge_mcm), AVG(extractable_resources_mcm),
                    SUM(annual_recharge_mcm)
             FROM groundwater_assessment
             WHERE assessment_year = ?1",
            params![year],
            |row| {
                Ok(RechargeSummary {
                    average_annual_recharge: round2_opt(row.get(0)?),
                    average_extractable: round2_opt(row.get(1)?),
                    total_recharge: round2_opt(row.get(2)?),
                })
            },
        )?;
        return Ok(ResolutionResult::NationalRecharge(NationalRecharge {
            national_recharge,
        }));
    };

    let sql = format!(
        "SELECT b.block_name, ga.annual_recharge_mcm, ga.extractable_resources_mcm
         {SCOPED_JOIN}
         WHERE {LOCATION_FILTER} AND ga.assessment_year = ?2
         LIMIT ?3"
    );

    let mut stmt = ctx.conn.prepare(&sql)?;
    let data = stmt
        .query_map(
            params![like_pattern(location), year, ctx.settings.location_limit as i64],
            |row| {
                Ok(BlockRecharge {
                    block: row.get(0)?,
                    annual_recharge: round2(row.get(1)?),
                    extractable_resources: round2(row.get(2)?),
                })
            },
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(ResolutionResult::LocalRecharge(LocalRecharge {
        location: location.to_string(),
        recharge_data: data,
    }))
}

fn extraction(ctx: &ResolveContext<'_>) -> rusqlite::Result<ResolutionResult> {
    let year = ctx.settings.assessment_year;

    let Some(location) = ctx.entities.first_location() else {
        let national_extraction = ctx.conn.query_row(
            "SELECT AVG(total_extraction_mcm), AVG(stage_of_extraction),
                    SUM(total_extraction_mcm)
             FROM groundwater_assessment
             WHERE assessment_year = ?1",
            params![year],
            |row| {
                Ok(ExtractionSummary {
                    average_extraction: round2_opt(row.get(0)?),
                    average_stage: round2_opt(row.get(1)?),
                    total_extraction: round2_opt(row.get(2)?),
                })
            },
        )?;
        return Ok(ResolutionResult::NationalExtraction(NationalExtraction {
            national_extraction,
        }));
    };

    let sql = format!(
        "SELECT b.block_name, ga.total_extraction_mcm, ga.stage_of_extraction, ga.category
         {SCOPED_JOIN}
         WHERE {LOCATION_FILTER} AND ga.assessment_year = ?2
         LIMIT ?3"
    );

    let mut stmt = ctx.conn.prepare(&sql)?;
    let data = stmt
        .query_map(
            params![like_pattern(location), year, ctx.settings.location_limit as i64],
            |row| {
                Ok(BlockExtraction {
                    block: row.get(0)?,
                    total_extraction: round2(row.get(1)?),
                    extraction_stage: round2(row.get(2)?),
                    category: row.get(3)?,
                })
            },
        )?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(ResolutionResult::LocalExtraction(LocalExtraction {
        location: location.to_string(),
        extraction_data: data,
    }))
}

fn general_stats(ctx: &ResolveContext<'_>) -> rusqlite::Result<ResolutionResult> {
    let year = ctx.settings.assessment_year;

    let sql = format!(
        "SELECT COUNT(DISTINCT s.state_id), COUNT(DISTINCT d.district_id),
                COUNT(DISTINCT b.block_id), AVG(ga.stage_of_extraction)
         {SCOPED_JOIN}
         WHERE ga.assessment_year = ?1"
    );
    let general_stats = ctx.conn.query_row(&sql, params![year], |row| {
        Ok(CoverageStats {
            states_covered: row.get(0)?,
            districts_covered: row.get(1)?,
            blocks_covered: row.get(2)?,
            average_extraction_stage: round2_opt(row.get(3)?),
        })
    })?;

    let mut stmt = ctx.conn.prepare(
        "SELECT COALESCE(category, 'Unknown'), COUNT(*)
         FROM groundwater_assessment
         WHERE assessment_year = ?1
         GROUP BY category",
    )?;
    let category_distribution = stmt
        .query_map(params![year], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?
        .collect::<rusqlite::Result<BTreeMap<_, _>>>()?;

    Ok(ResolutionResult::General(GeneralStats {
        general_stats,
        category_distribution,
    }))
}

fn help() -> ResolutionResult {
    ResolutionResult::Help(HelpInfo {
        help: HELP_LINES.iter().map(|line| line.to_string()).collect(),
    })
}

// ============================================================================
// Tests
// ============================================================================
