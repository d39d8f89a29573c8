//! CLI module for the INGRES command-line interface.
//!
//! Command handlers run the query pipeline in-process against the
//! configured assessment store.

mod commands;
mod output;

pub use commands::*;
