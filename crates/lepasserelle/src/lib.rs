// lepasserelle - CLI & Integration
//
// *La Passerelle* (The Bridge) - Project config, report writers and code injection for LeMaillage

#![warn(missing_docs)]
#![warn(unused_extern_crates)]

//! The outer shell around the link engine: reads `lemaillage.toml` and the
//! registry, writes the reports and links data file, and optionally splices
//! the links map into a source file.

/// Command-line interface
pub mod cli;
/// Project configuration
pub mod config;
/// Error types
pub mod errors;
/// Sentinel-based code injection
pub mod inject;
/// Report and links data writers
pub mod writer;

pub use config::{EngineConfig, PathConfig, ProjectConfig, DEFAULT_CONFIG_FILE};
pub use errors::{format_error, MaillageError, Result};
pub use inject::{inject_links, splice, END_SENTINEL, START_SENTINEL};
pub use writer::{links_map, write_atomic, write_reports, WrittenReports};
