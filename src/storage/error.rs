use serde_json::Value;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// An I/O error occurred while reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON serialization or deserialization error occurred.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The platform does not provide a data directory.
    #[error("could not determine XDG data directory")]
    NoDataDir,

    /// An update named a block that is not in the outline.
    #[error("no outline item with locator {0}")]
    UnknownBlock(String),

    /// An update carried a value the field cannot take.
    #[error("invalid value for {field}: {value}")]
    InvalidField {
        /// Payload key of the rejected value.
        field: String,
        value: Value,
    },
}
