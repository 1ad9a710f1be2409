/// Errors produced while opening a persistent signal.
///
/// There is no recovery anywhere in this crate: a malformed record is
/// surfaced to the caller as-is, never silently replaced with defaults.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The stored text for a key is not valid JSON for the target type.
    #[error("malformed JSON record for key {key:?}: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The initial template could not be encoded as JSON.
    #[error("value for key {key:?} is not representable as JSON: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
