//! Core library: pairing, rendering and their shared plumbing

pub mod config;
pub mod error;
pub mod models;
pub mod pairing;
pub mod pipeline;
pub mod report;

/// Returns the current version of the `csv-sankey` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
