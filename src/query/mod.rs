//! Natural language query pipeline for INGRES assessment data.
//!
//! This module provides:
//! - Intent classification over an ordered rule table
//! - Entity extraction against the reference catalog
//! - Per-intent resolution against the assessment store
//! - The end-to-end query processor

pub mod classifier;
pub mod entities;
pub mod processor;
pub mod resolver;
pub mod types;

pub use classifier::*;
pub use entities::*;
pub use processor::*;
pub use resolver::*;
pub use types::*;
