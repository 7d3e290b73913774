//! Adapters - Implementations of port interfaces.
//!
//! - `ai` - LLM providers behind the `AIProvider` port
//! - `capabilities` - counterpart, scoring and goal check implementations
//! - `scenarios` - built-in and YAML scenario catalogs
//! - `http` - axum REST API

pub mod ai;
pub mod capabilities;
pub mod http;
pub mod scenarios;
