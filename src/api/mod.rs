//! REST API module for INGRES.
//!
//! Exposes the query pipeline over HTTP for chat-style clients. Responses
//! carry the structured pipeline output; no text is templated here.

mod handlers;
mod rest;

pub use handlers::*;
pub use rest::*;
