use thiserror::Error;

/// Everything that can go wrong while mapping entities or talking to the
/// database.
///
/// All variants except [`Error::Driver`] are raised by the engine itself,
/// before any statement reaches the driver.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid entity annotations, or an unusable session setup.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// A field whose semantic type has no SQL mapping.
    #[error("Column `{column}` has unsupported type {value}")]
    UnsupportedType { column: String, value: String },
    /// A predicate the translator cannot express as a single condition.
    #[error("Unsupported expression: {0}")]
    UnsupportedExpression(String),
    /// An operation needs a primary key value that was never assigned.
    #[error("Missing key: {0}")]
    MissingKey(String),
    /// A destructive operation was attempted while safe mode is enabled.
    #[error("Safe mode is enabled, refusing to {0}")]
    SafeMode(String),
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
    /// A stored value does not fit the field it is hydrated into.
    #[error("Conversion error: {0}")]
    Conversion(String),
    /// Failure reported by the driver, propagated unchanged.
    #[error(transparent)]
    Driver(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
