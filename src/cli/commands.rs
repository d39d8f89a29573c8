//! CLI command handlers.

use std::path::PathBuf;

use anyhow::{Context, Result};
use ingres::store::{schema, AssessmentStore, CatalogSource};
use ingres::{Config, QueryProcessor};

use super::output;

/// Run the full pipeline for one query.
pub fn run_query(config: &Config, query: String, json_output: bool) -> Result<()> {
    let processor = QueryProcessor::from_config(config);
    let outcome = processor
        .process(&query)
        .with_context(|| format!("Failed to answer query: {}", query))?;
    output::print_outcome(&outcome, json_output);
    Ok(())
}

/// Classify a query without touching the store.
pub fn run_classify(config: &Config, query: String, json_output: bool) -> Result<()> {
    let classification = QueryProcessor::from_config(config).classify(&query);
    output::print_classification(&classification, json_output);
    Ok(())
}

/// Classify a query and extract its entities.
pub fn run_entities(config: &Config, query: String, json_output: bool) -> Result<()> {
    let (classification, entities) = QueryProcessor::from_config(config).entities(&query);
    output::print_entities(&classification, &entities, json_output);
    Ok(())
}

/// List the reference catalog.
pub fn run_catalog(config: &Config, json_output: bool) -> Result<()> {
    let store = AssessmentStore::from_config(config);
    let catalog = store
        .list_known_names()
        .with_context(|| format!("Failed to read catalog from {}", store.path().display()))?;
    output::print_catalog(&catalog, json_output);
    Ok(())
}

/// Print coverage statistics.
pub fn run_stats(config: &Config, json_output: bool) -> Result<()> {
    let stats = QueryProcessor::from_config(config)
        .stats()
        .context("Failed to compute statistics")?;
    output::print_resolution(&stats, json_output);
    Ok(())
}

/// Create an empty assessment schema.
pub fn run_init_db(config: &Config, path: Option<PathBuf>, json_output: bool) -> Result<()> {
    let path = path.unwrap_or_else(|| config.database_path());
    schema::initialize_at(&path)
        .with_context(|| format!("Failed to initialize {}", path.display()))?;
    output::print_init_result(&path, json_output);
    Ok(())
}
