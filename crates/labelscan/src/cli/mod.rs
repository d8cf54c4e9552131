//! Command handlers for the `labelscan` binary.

pub mod config;
pub mod extract;
pub mod schema;
