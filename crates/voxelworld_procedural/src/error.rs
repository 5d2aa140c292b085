//! # Procedural Error Types
//!
//! Errors raised while loading configuration or block catalogs.
//!
//! Runtime lookups (out-of-range cells, unknown block ids) never produce
//! these; they degrade to air or default values instead.

use thiserror::Error;

/// Errors that can occur while setting up terrain generation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProceduralError {
    /// A terrain parameter is outside its valid range.
    #[error("invalid terrain config: {field} = {value} ({reason})")]
    InvalidTerrainConfig {
        /// Offending field name.
        field: &'static str,
        /// Value that was rejected.
        value: f64,
        /// Why the value is invalid.
        reason: &'static str,
    },

    /// Catalog file could not be parsed.
    #[error("catalog parse error: {0}")]
    CatalogParse(String),

    /// Two catalog entries share an id.
    #[error("duplicate block id {id} ({first} and {second})")]
    DuplicateBlockId {
        /// The shared id.
        id: u16,
        /// Name of the first entry.
        first: String,
        /// Name of the second entry.
        second: String,
    },

    /// A catalog entry tried to use the reserved air id.
    #[error("block '{0}' uses reserved id 0 (air)")]
    ReservedBlockId(String),
}

impl From<toml::de::Error> for ProceduralError {
    fn from(err: toml::de::Error) -> Self {
        Self::CatalogParse(err.to_string())
    }
}

/// Result type for procedural setup.
pub type ProceduralResult<T> = Result<T, ProceduralError>;
