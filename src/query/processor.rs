//! Query Processor.
//!
//! Runs the full pipeline for one query: normalize, classify, extract
//! entities, resolve. The processor holds no per-query state, so one
//! instance can serve concurrent callers.

use std::sync::Arc;
use std::time::Instant;

use crate::config::{Config, ResolverConfig};
use crate::error::Result;
use crate::store::{AssessmentStore, CatalogSource};

use super::classifier::IntentClassifier;
use super::entities::EntityExtractor;
use super::resolver::QueryResolver;
use super::types::*;

// ============================================================================
// Query Processor
// ============================================================================

/// Answers natural language groundwater queries.
#[derive(Clone)]
pub struct QueryProcessor {
    classifier: IntentClassifier,
    extractor: EntityExtractor,
    resolver: QueryResolver,
}

impl QueryProcessor {
    /// Create a processor whose catalog is read from `store`.
    pub fn new(store: AssessmentStore, settings: ResolverConfig) -> Self {
        let catalog: Arc<dyn CatalogSource> = Arc::new(store.clone());
        Self::with_catalog(store, catalog, settings)
    }

    /// Create a processor with a separate catalog source.
    pub fn with_catalog(
        store: AssessmentStore,
        catalog: Arc<dyn CatalogSource>,
        settings: ResolverConfig,
    ) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            extractor: EntityExtractor::new(catalog),
            resolver: QueryResolver::new(store, settings),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(AssessmentStore::from_config(config), config.resolver.clone())
    }

    /// Classify a raw query without touching the store.
    pub fn classify(&self, query: &str) -> Classification {
        self.classifier.classify(query)
    }

    /// Classify a raw query and extract its entities.
    pub fn entities(&self, query: &str) -> (Classification, Entities) {
        let text = query.to_lowercase();
        let classification = self.classifier.classify_normalized(&text);
        let entities = self.extractor.extract(&text, &classification);
        (classification, entities)
    }

    /// Coverage statistics, as answered for a `general` query.
    pub fn stats(&self) -> Result<ResolutionResult> {
        self.resolver.resolve(Intent::General, &Entities::new())
    }

    /// Process a query end to end.
    ///
    /// Extraction never fails; store errors during resolution are returned.
    /// The outcome echoes the query text exactly as received.
    pub fn process(&self, query: &str) -> Result<QueryOutcome> {
        let start = Instant::now();
        let span = tracing::info_span!("process_query", query_len = query.len());
        let _guard = span.enter();

        let (classification, entities) = self.entities(query);
        let data = self.resolver.resolve(classification.intent, &entities)?;

        tracing::info!(
            intent = %classification.intent,
            records = data.record_count(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Processed query"
        );

        Ok(QueryOutcome {
            intent: classification.intent,
            entities,
            data,
            query: query.to_string(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
