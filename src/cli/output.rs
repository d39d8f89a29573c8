//! Output formatting for CLI commands.
//!
//! This module handles formatting output as either JSON or human-readable text.

use std::path::Path;

use ingres::query::{Classification, Entities, QueryOutcome, ResolutionResult};
use ingres::store::Catalog;
use serde::Serialize;

fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let head: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

/// Print a full pipeline outcome.
pub fn print_outcome(outcome: &QueryOutcome, json: bool) {
    if json {
        print_json(outcome);
        return;
    }

    println!("Query: {}", outcome.query);
    println!(
        "Intent: {} ({})",
        outcome.intent.display_name(),
        outcome.intent
    );
    print_entity_lines(&outcome.entities);
    println!();
    print_resolution(&outcome.data, false);
}

/// Print an intent classification.
pub fn print_classification(classification: &Classification, json: bool) {
    if json {
        print_json(classification);
        return;
    }

    println!(
        "Intent: {} ({})",
        classification.intent.display_name(),
        classification.intent
    );
    match &classification.matched {
        Some(m) => {
            println!("Pattern: {}", m.pattern);
            println!("Matched: \"{}\"", m.matched_text);
        }
        None => println!("No pattern matched; using the default intent."),
    }
}

/// Print extracted entities.
pub fn print_entities(classification: &Classification, entities: &Entities, json: bool) {
    if json {
        print_json(&serde_json::json!({
            "intent": classification.intent,
            "entities": entities,
        }));
        return;
    }

    println!("Intent: {}", classification.intent);
    if entities.is_empty() {
        println!("No entities found.");
    } else {
        print_entity_lines(entities);
    }
}

fn print_entity_lines(entities: &Entities) {
    if !entities.locations.is_empty() {
        println!("Locations: {}", entities.locations.join(", "));
    }
    if !entities.years.is_empty() {
        let years: Vec<String> = entities.years.iter().map(|y| y.to_string()).collect();
        println!("Years: {}", years.join(", "));
    }
    if !entities.categories.is_empty() {
        let categories: Vec<&str> = entities.categories.iter().map(|c| c.as_str()).collect();
        println!("Categories: {}", categories.join(", "));
    }
}

/// Print the reference catalog.
pub fn print_catalog(catalog: &Catalog, json: bool) {
    if json {
        print_json(catalog);
        return;
    }

    if catalog.is_empty() {
        println!("Catalog is empty. Populate the database first.");
        return;
    }

    for (label, names) in [
        ("States", &catalog.states),
        ("Districts", &catalog.districts),
        ("Blocks", &catalog.blocks),
    ] {
        println!("{} ({}):", label, names.len());
        for name in names {
            println!("  {}", name);
        }
    }
}

/// Print a resolution result.
pub fn print_resolution(result: &ResolutionResult, json: bool) {
    if json {
        print_json(result);
        return;
    }

    match result {
        ResolutionResult::GroundwaterStatus(r) => {
            println!("Groundwater status for {} ({})\n", r.location, r.year);
            println!(
                "{:<30} {:<16} {:>8} {:>8} {:>10}",
                "BLOCK", "CATEGORY", "STAGE%", "LEVEL", "RECHARGE"
            );
            println!("{}", "-".repeat(76));
            for b in &r.blocks {
                println!(
                    "{:<30} {:<16} {:>8.2} {:>8.2} {:>10.2}",
                    truncate(&b.block_name, 30),
                    b.category,
                    b.stage_of_extraction,
                    b.water_level,
                    b.annual_recharge
                );
            }
            if r.blocks.is_empty() {
                println!("No blocks found.");
            }
        }
        ResolutionResult::CriticalAreas(r) => {
            println!("Critical and over-exploited blocks\n");
            println!(
                "{:<30} {:<20} {:<16} {:<16} {:>8}",
                "BLOCK", "DISTRICT", "STATE", "CATEGORY", "STAGE%"
            );
            println!("{}", "-".repeat(94));
            for a in &r.critical_areas {
                println!(
                    "{:<30} {:<20} {:<16} {:<16} {:>8.2}",
                    truncate(&a.block, 30),
                    truncate(&a.district, 20),
                    truncate(&a.state, 16),
                    a.category,
                    a.extraction_percentage
                );
            }
            println!("\nTotal: {} blocks", r.critical_areas.len());
        }
        ResolutionResult::SafeAreas(r) => {
            println!("Safe blocks\n");
            println!(
                "{:<30} {:<20} {:<16} {:>8} {:>10}",
                "BLOCK", "DISTRICT", "STATE", "STAGE%", "RECHARGE"
            );
            println!("{}", "-".repeat(88));
            for a in &r.safe_areas {
                println!(
                    "{:<30} {:<20} {:<16} {:>8.2} {:>10.2}",
                    truncate(&a.block, 30),
                    truncate(&a.district, 20),
                    truncate(&a.state, 16),
                    a.extraction_percentage,
                    a.annual_recharge
                );
            }
            println!("\nTotal: {} blocks", r.safe_areas.len());
        }
        ResolutionResult::LocalWaterLevels(r) => {
            println!("Water levels in {} (m below ground)\n", r.location);
            println!("{:<30} {:>12} {:>12} {:>6}", "BLOCK", "PRE", "POST", "YEAR");
            println!("{}", "-".repeat(64));
            for l in &r.water_levels {
                println!(
                    "{:<30} {:>12.2} {:>12.2} {:>6}",
                    truncate(&l.block, 30),
                    l.pre_monsoon,
                    l.post_monsoon,
                    l.year
                );
            }
        }
        ResolutionResult::NationalWaterLevels(r) => {
            println!("National average water levels (m below ground)");
            println!("  Pre-monsoon:  {}", fmt_opt(r.average_water_levels.pre_monsoon));
            println!("  Post-monsoon: {}", fmt_opt(r.average_water_levels.post_monsoon));
        }
        ResolutionResult::HistoricalTrends(r) => {
            println!("Historical trends for {}\n", r.location);
            println!("{:<6} {:>12} {:>12} {:>8}", "YEAR", "STAGE%", "LEVEL", "BLOCKS");
            println!("{}", "-".repeat(42));
            for t in &r.historical_trends {
                println!(
                    "{:<6} {:>12.2} {:>12.2} {:>8}",
                    t.year, t.avg_extraction, t.avg_water_level, t.blocks_assessed
                );
            }
        }
        ResolutionResult::LocalRecharge(r) => {
            println!("Recharge in {} (MCM)\n", r.location);
            println!("{:<30} {:>12} {:>12}", "BLOCK", "RECHARGE", "EXTRACTABLE");
            println!("{}", "-".repeat(56));
            for d in &r.recharge_data {
                println!(
                    "{:<30} {:>12.2} {:>12.2}",
                    truncate(&d.block, 30),
                    d.annual_recharge,
                    d.extractable_resources
                );
            }
        }
        ResolutionResult::NationalRecharge(r) => {
            let s = &r.national_recharge;
            println!("National recharge (MCM)");
            println!("  Average annual recharge: {}", fmt_opt(s.average_annual_recharge));
            println!("  Average extractable:     {}", fmt_opt(s.average_extractable));
            println!("  Total recharge:          {}", fmt_opt(s.total_recharge));
        }
        ResolutionResult::LocalExtraction(r) => {
            println!("Extraction in {} (MCM)\n", r.location);
            println!(
                "{:<30} {:>12} {:>8} {:<16}",
                "BLOCK", "EXTRACTION", "STAGE%", "CATEGORY"
            );
            println!("{}", "-".repeat(70));
            for d in &r.extraction_data {
                println!(
                    "{:<30} {:>12.2} {:>8.2} {:<16}",
                    truncate(&d.block, 30),
                    d.total_extraction,
                    d.extraction_stage,
                    d.category
                );
            }
        }
        ResolutionResult::NationalExtraction(r) => {
            let s = &r.national_extraction;
            println!("National extraction (MCM)");
            println!("  Average extraction: {}", fmt_opt(s.average_extraction));
            println!("  Average stage %:    {}", fmt_opt(s.average_stage));
            println!("  Total extraction:   {}", fmt_opt(s.total_extraction));
        }
        ResolutionResult::Help(r) => {
            for line in &r.help {
                println!("{}", line);
            }
        }
        ResolutionResult::General(r) => {
            let s = &r.general_stats;
            println!("Assessment coverage");
            println!("  States:    {}", s.states_covered);
            println!("  Districts: {}", s.districts_covered);
            println!("  Blocks:    {}", s.blocks_covered);
            println!(
                "  Average extraction stage: {}",
                fmt_opt(s.average_extraction_stage)
            );
            if !r.category_distribution.is_empty() {
                println!("\nBlocks by category:");
                for (category, count) in &r.category_distribution {
                    println!("  {:<16} {}", category, count);
                }
            }
        }
    }
}

/// Print the result of initializing a database.
pub fn print_init_result(path: &Path, json: bool) {
    if json {
        print_json(&serde_json::json!({
            "initialized": true,
            "path": path.display().to_string(),
        }));
    } else {
        println!("Initialized assessment schema at {}", path.display());
    }
}
