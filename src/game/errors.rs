use thiserror::Error;

/// Infrastructure errors raised by the persistence boundary.
///
/// Game-rule refusals (not enough dust, acting in a forbidden state, ...) are
/// never errors: every engine operation returns them as plain outcome values
/// so the chat layer can render a decline. This type only covers the I/O and
/// serialization edge of the store.
#[derive(Debug, Error)]
pub enum GameError {
    /// Wrapper around IO errors (directory creation, file locks, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Wrapper around serde_json serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
