//! Error types for Symptom Flux

use thiserror::Error;

/// Errors raised at the edges of the engine (decoding, configuration, lookups).
///
/// Phase resolution, normalization, aggregation and series building never fail;
/// these variants only come from turning outside input into engine values.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Failed to parse entry record: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unknown symptom: {0}")]
    UnknownSymptom(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Date parse error: {0}")]
    DateParseError(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
