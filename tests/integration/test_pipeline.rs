//! End-to-end pipeline tests.

use ingres::query::*;
use ingres::{IngresError, StoreError};

use crate::fixtures::Fixture;

fn process(fixture: &Fixture, query: &str) -> QueryOutcome {
    fixture
        .processor()
        .process(query)
        .unwrap_or_else(|e| panic!("query {:?} failed: {}", query, e))
}

#[test]
fn test_status_for_named_state() {
    let fixture = Fixture::sample();
    let outcome = process(&fixture, "What is the groundwater status in Karnataka?");

    assert_eq!(outcome.intent, Intent::GroundwaterStatus);
    assert_eq!(outcome.entities.locations, vec!["Karnataka"]);

    let ResolutionResult::GroundwaterStatus(status) = outcome.data else {
        panic!("expected groundwater status");
    };
    assert_eq!(status.location, "Karnataka");
    assert_eq!(status.year, 2024);
    assert_eq!(
        status.blocks,
        vec![BlockStatus {
            block_name: "Bangalore Urban Block-1".to_string(),
            category: "Semi-Critical".to_string(),
            stage_of_extraction: 78.0,
            water_level: 14.0,
            annual_recharge: 100.0,
            district: "Bangalore Urban".to_string(),
            state: "Karnataka".to_string(),
        }]
    );
}

#[test]
fn test_status_without_location_uses_default() {
    let fixture = Fixture::sample();
    let outcome = process(&fixture, "status of the region");

    assert!(outcome.entities.locations.is_empty());
    let ResolutionResult::GroundwaterStatus(status) = outcome.data else {
        panic!("expected groundwater status");
    };
    assert_eq!(status.location, "Delhi");
    assert_eq!(status.blocks.len(), 2);
    assert!(status.blocks.iter().all(|b| b.state == "Delhi"));
}

#[test]
fn test_critical_areas_ignore_location() {
    let fixture = Fixture::sample();
    let outcome = process(&fixture, "Show critical areas in Tamil Nadu");

    assert_eq!(outcome.intent, Intent::CriticalAreas);
    assert_eq!(outcome.entities.locations, vec!["Tamil Nadu"]);
    assert_eq!(outcome.entities.categories, vec![Category::Critical]);

    let ResolutionResult::CriticalAreas(areas) = outcome.data else {
        panic!("expected critical areas");
    };
    let blocks: Vec<&str> = areas.critical_areas.iter().map(|a| a.block.as_str()).collect();
    assert_eq!(
        blocks,
        vec!["Ludhiana Block-1", "Ludhiana Block-2", "South Delhi Block-1"]
    );
    assert_eq!(areas.critical_areas[0].extraction_percentage, 165.0);
}

#[test]
fn test_safe_areas_ascending() {
    let fixture = Fixture::sample();
    let outcome = process(&fixture, "List safe areas in Maharashtra");

    assert_eq!(outcome.intent, Intent::SafeAreas);
    let ResolutionResult::SafeAreas(areas) = outcome.data else {
        panic!("expected safe areas");
    };
    let stages: Vec<f64> = areas
        .safe_areas
        .iter()
        .map(|a| a.extraction_percentage)
        .collect();
    assert_eq!(stages, vec![45.0, 55.0]);
}

#[test]
fn test_water_levels_local_and_national() {
    let fixture = Fixture::sample();

    let outcome = process(&fixture, "What is the average water level in Delhi?");
    assert_eq!(outcome.intent, Intent::WaterLevel);
    let ResolutionResult::LocalWaterLevels(levels) = outcome.data else {
        panic!("expected local water levels");
    };
    assert_eq!(levels.location, "Delhi");
    assert_eq!(levels.water_levels.len(), 2);

    let outcome = process(&fixture, "water level for the whole country");
    let json = serde_json::to_value(&outcome.data).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "average_water_levels": { "pre_monsoon": 20.0, "post_monsoon": 17.67 }
        })
    );
}

#[test]
fn test_historical_trends() {
    let fixture = Fixture::sample();

    let outcome = process(&fixture, "show historical trend for Punjab");
    assert_eq!(outcome.intent, Intent::Historical);
    let ResolutionResult::HistoricalTrends(trends) = outcome.data else {
        panic!("expected historical trends");
    };
    assert_eq!(trends.location, "Punjab");
    assert_eq!(
        trends.historical_trends,
        vec![
            HistoricalTrend {
                year: 2023,
                avg_extraction: 150.0,
                avg_water_level: 36.0,
                blocks_assessed: 1,
            },
            HistoricalTrend {
                year: 2024,
                avg_extraction: 152.5,
                avg_water_level: 34.0,
                blocks_assessed: 2,
            },
        ]
    );

    let outcome = process(&fixture, "get historical figures");
    let ResolutionResult::HistoricalTrends(trends) = outcome.data else {
        panic!("expected historical trends");
    };
    assert_eq!(trends.location, "All India");
    assert_eq!(trends.historical_trends.len(), 2);
    assert_eq!(trends.historical_trends[0].avg_water_level, 22.25);
    assert_eq!(trends.historical_trends[1].blocks_assessed, 6);
}

#[test]
fn test_recharge_and_extraction() {
    let fixture = Fixture::sample();

    let outcome = process(&fixture, "annual recharge");
    assert_eq!(
        serde_json::to_value(&outcome.data).unwrap(),
        serde_json::json!({
            "national_recharge": {
                "average_annual_recharge": 94.17,
                "average_extractable": 84.75,
                "total_recharge": 565.0
            }
        })
    );

    let outcome = process(&fixture, "groundwater extraction in ludhiana");
    assert_eq!(outcome.intent, Intent::Extraction);
    let ResolutionResult::LocalExtraction(data) = outcome.data else {
        panic!("expected local extraction");
    };
    assert_eq!(data.location, "Ludhiana");
    assert_eq!(data.extraction_data.len(), 2);
    assert!(data
        .extraction_data
        .iter()
        .all(|d| d.category == "Over-Exploited"));

    let outcome = process(&fixture, "how much do we extract");
    let ResolutionResult::NationalExtraction(national) = outcome.data else {
        panic!("expected national extraction");
    };
    assert_eq!(national.national_extraction.average_stage, Some(95.83));
    assert_eq!(national.national_extraction.total_extraction, Some(446.22));
}

#[test]
fn test_general_and_comparison() {
    let fixture = Fixture::sample();

    let general = process(&fixture, "hello there");
    assert_eq!(general.intent, Intent::General);

    let comparison = process(&fixture, "compare Punjab with Delhi");
    assert_eq!(comparison.intent, Intent::Comparison);
    assert_eq!(comparison.data, general.data);

    let json = serde_json::to_value(&general.data).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "general_stats": {
                "states_covered": 4,
                "districts_covered": 5,
                "blocks_covered": 6,
                "average_extraction_stage": 95.83
            },
            "category_distribution": {
                "Critical": 1,
                "Over-Exploited": 2,
                "Safe": 2,
                "Semi-Critical": 1
            }
        })
    );
}

#[test]
fn test_outcome_shape() {
    let fixture = Fixture::sample();
    let outcome = process(&fixture, "Which blocks are semi-critical in Punjab 2024?");

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["intent"], "critical_areas");
    assert_eq!(json["query"], "Which blocks are semi-critical in Punjab 2024?");
    assert_eq!(
        json["entities"],
        serde_json::json!({
            "locations": ["Punjab"],
            "years": [2024],
            "categories": ["Critical", "Semi-Critical"]
        })
    );
    assert!(json["data"]["critical_areas"].is_array());
}

#[test]
fn test_help() {
    let fixture = Fixture::sample();
    let outcome = process(&fixture, "What can you do?");

    assert_eq!(outcome.intent, Intent::Help);
    let ResolutionResult::Help(info) = outcome.data else {
        panic!("expected help");
    };
    assert!(info.help.iter().any(|line| line.contains("critical areas")));
}

#[test]
fn test_repeated_queries_are_identical() {
    let fixture = Fixture::sample();
    let processor = fixture.processor();

    for query in [
        "Show critical areas",
        "status of Delhi",
        "show historical trend",
        "hello there",
    ] {
        assert_eq!(
            processor.process(query).unwrap(),
            processor.process(query).unwrap(),
            "{}",
            query
        );
    }
}

#[test]
fn test_missing_store() {
    let fixture = Fixture::missing();
    let processor = fixture.processor();

    let (classification, entities) = processor.entities("status of Punjab in 2023");
    assert_eq!(classification.intent, Intent::GroundwaterStatus);
    assert!(entities.locations.is_empty());
    assert_eq!(entities.years, vec![2023]);

    let err = processor.process("status of Punjab in 2023").unwrap_err();
    assert!(matches!(err, IngresError::Store(StoreError::NotFound(_))));

    assert!(processor.process("help").is_ok());
    assert!(!fixture.path.exists());
}
