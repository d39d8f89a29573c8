//! INGRES: natural language queries over groundwater assessment data.
//!
//! A rule-based pipeline that classifies a free-text question, extracts
//! locations, years and categories from it, and resolves the result
//! against a SQLite assessment store.

pub mod api;
pub mod config;
pub mod error;
pub mod query;
pub mod store;

pub use api::{create_rest_router, ApiState, ErrorResponse, QueryRequest, QueryResponse};
pub use config::Config;
pub use error::{ConfigError, IngresError, Result, StoreError};
pub use query::{
    Category, Classification, Entities, EntityExtractor, Intent, IntentClassifier, QueryOutcome,
    QueryProcessor, QueryResolver, ResolutionResult,
};
pub use store::{AssessmentStore, Catalog, CatalogSource};
