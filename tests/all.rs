//! Integration test aggregator
//!
//! Entry point for the workspace integration tests. Individual modules are
//! declared in `suite/mod.rs`.

mod common;
mod suite;
