use thiserror::Error;

/// All the ways loading or exporting a registry snapshot can go wrong
///
/// The projection functions themselves (search, classify, aggregate) are
/// total and never produce one of these. Errors only happen at the edges:
/// reading snapshots, validating them, reading config, writing exports.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Snapshot source failed: {0}")]
    SourceError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Property not found: {0}")]
    NotFound(String),

    #[error("Invalid property record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
