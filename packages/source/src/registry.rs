//! Source registry: loads all source definitions from embedded TOML configs.
//!
//! Each `.toml` file in `packages/source/sources/` is baked into the binary
//! at compile time via [`include_str!`]. Adding a new city is as simple as
//! creating a new TOML file and adding it to the list below.

use crime_dashboard_source_models::SourceDefinition;

use crate::SourceError;
use crate::source_def::parse_source_toml;

/// TOML configs embedded at compile time.
const SOURCE_TOMLS: &[(&str, &str)] = &[("chicago", include_str!("../sources/chicago.toml"))];

/// Total number of configured sources (used in tests).
#[cfg(test)]
const EXPECTED_SOURCE_COUNT: usize = 1;

/// Source used when none is configured.
pub const DEFAULT_SOURCE_ID: &str = "chicago";

/// Returns all configured source definitions, parsed from embedded TOML.
///
/// # Errors
///
/// Returns [`SourceError::Registry`] naming the file if any embedded
/// config is malformed.
pub fn all_sources() -> Result<Vec<SourceDefinition>, SourceError> {
    SOURCE_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_source_toml(toml).map_err(|e| SourceError::Registry {
                message: format!("Failed to parse {name}.toml: {e}"),
            })
        })
        .collect()
}

/// Looks up a source definition by id.
///
/// # Errors
///
/// Returns [`SourceError::Registry`] if no source has the given id or an
/// embedded config is malformed.
pub fn find_source(id: &str) -> Result<SourceDefinition, SourceError> {
    all_sources()?
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(|| SourceError::Registry {
            message: format!("Unknown source '{id}'"),
        })
}
