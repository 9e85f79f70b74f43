//! Configuration loading errors.

/// An error that occurred while loading or validating `plexus.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML or has wrong field types.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing or empty.
    #[error("missing required configuration field `{0}`")]
    MissingField(String),

    /// A field has a value outside its valid range.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue {
        /// The dotted path of the offending field.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}
