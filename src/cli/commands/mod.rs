//! CLI command handlers for `csvsankey`.
//!
//! The default command pairs and renders a CSV; `config` manages settings.

pub mod config;
pub mod sankey;
