//! Error types for cova-gen

use thiserror::Error;

/// Result type alias for cova-gen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating a test suite
///
/// Every variant is fatal for the run: generation is pure, so the only
/// recovery is to fix the input and generate again.
#[derive(Debug, Error)]
pub enum Error {
    /// Two branches of a domain or defaults tree flatten to the same path
    #[error("Duplicate path: {0}")]
    DuplicatePath(String),

    /// Perspective or exclusion is not usable as configured
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed exclusion or rule pattern
    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        /// The pattern as written
        pattern: String,
        /// Underlying regex compilation error
        #[source]
        source: regex::Error,
    },

    /// A referenced path does not exist in the flattened domain
    #[error("Unknown path '{path}' in {context}")]
    UnknownPath {
        /// Where the reference was found
        context: String,
        /// The offending path
        path: String,
    },

    /// A referenced level is not one of the factor's levels
    #[error("Unknown level '{level}' for '{path}' in {context}")]
    UnknownLevel {
        /// Where the reference was found
        context: String,
        /// Factor path
        path: String,
        /// The offending level
        level: String,
    },

    /// Malformed factor domain or defaults tree
    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    /// An expectation returned a row without the outcome field
    #[error("Expectation for perspective '{perspective}' did not set outcome field '{field}'")]
    MissingOutcome {
        /// Perspective title
        perspective: String,
        /// Outcome field name
        field: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
