//! Gallery - Error Types

use thiserror::Error;

/// Result type for gallery operations
pub type GalleryResult<T> = Result<T, GalleryError>;

/// Message shown when a capture is refused for lack of grants
pub const PERMISSION_DENIED_MESSAGE: &str =
    "Cannot take picture because the right to do so has not been granted";

/// Gallery error types
#[derive(Error, Debug)]
pub enum GalleryError {
    // ═══════════════════════════════════════════════════════════════
    // PERMISSION ERRORS
    // ═══════════════════════════════════════════════════════════════

    #[error("Permissions are not available on this platform: {0}")]
    PermissionUnavailable(String),

    #[error("Cannot take picture because the right to do so has not been granted")]
    PermissionDenied,

    // ═══════════════════════════════════════════════════════════════
    // CAPTURE ERRORS
    // ═══════════════════════════════════════════════════════════════

    #[error("No photo data available")]
    CaptureEmptyPayload,

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    // ═══════════════════════════════════════════════════════════════
    // STORAGE ERRORS
    // ═══════════════════════════════════════════════════════════════

    #[error("Could not write photo: {0}")]
    StorageWrite(String),

    #[error("Could not read photo: {0}")]
    StorageRead(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("File already exists: {0}")]
    FileAlreadyExists(String),

    #[error("Invalid photo payload: {0}")]
    InvalidPayload(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    // ═══════════════════════════════════════════════════════════════
    // LEDGER / PREFERENCES ERRORS
    // ═══════════════════════════════════════════════════════════════

    #[error("Photo ledger corrupted: {0}")]
    LedgerCorrupted(String),

    #[error("Preferences error: {0}")]
    Preferences(String),

    // ═══════════════════════════════════════════════════════════════
    // CONFIG / SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl GalleryError {
    /// Permission-layer errors are recovered where they happen
    pub fn is_permission_error(&self) -> bool {
        matches!(
            self,
            GalleryError::PermissionUnavailable(_) | GalleryError::PermissionDenied
        )
    }

    /// Check if the user can simply try again
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GalleryError::PermissionDenied
                | GalleryError::CaptureEmptyPayload
                | GalleryError::CaptureFailed(_)
                | GalleryError::LedgerCorrupted(_)
        )
    }

    /// Text for the user-facing error queue
    pub fn user_message(&self) -> String {
        match self {
            GalleryError::PermissionDenied | GalleryError::PermissionUnavailable(_) => {
                PERMISSION_DENIED_MESSAGE.to_string()
            }
            GalleryError::CaptureEmptyPayload => {
                "No picture was taken".to_string()
            }
            GalleryError::CaptureFailed(_) => {
                "The camera could not take a picture".to_string()
            }
            GalleryError::StorageWrite(_)
            | GalleryError::FileAlreadyExists(_)
            | GalleryError::InvalidPayload(_)
            | GalleryError::IoError(_) => {
                "The picture could not be saved to this device".to_string()
            }
            GalleryError::StorageRead(_) | GalleryError::FileNotFound(_) => {
                "A saved picture could not be loaded".to_string()
            }
            GalleryError::LedgerCorrupted(_) | GalleryError::Preferences(_) => {
                "The list of saved pictures could not be updated".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<rusqlite::Error> for GalleryError {
    fn from(e: rusqlite::Error) -> Self {
        GalleryError::Preferences(e.to_string())
    }
}

impl From<serde_json::Error> for GalleryError {
    fn from(e: serde_json::Error) -> Self {
        GalleryError::SerializationError(e.to_string())
    }
}

impl From<base64::DecodeError> for GalleryError {
    fn from(e: base64::DecodeError) -> Self {
        GalleryError::InvalidPayload(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denied_message_is_exact() {
        assert_eq!(
            GalleryError::PermissionDenied.to_string(),
            "Cannot take picture because the right to do so has not been granted"
        );
        assert_eq!(
            GalleryError::PermissionDenied.user_message(),
            PERMISSION_DENIED_MESSAGE
        );
    }

    #[test]
    fn test_classification() {
        assert!(GalleryError::PermissionUnavailable("web".into()).is_permission_error());
        assert!(!GalleryError::StorageWrite("disk full".into()).is_permission_error());
        assert!(GalleryError::CaptureEmptyPayload.is_recoverable());
        assert!(!GalleryError::StorageRead("gone".into()).is_recoverable());
        assert_eq!(
            GalleryError::FileNotFound("1.png".into()).user_message(),
            "A saved picture could not be loaded"
        );
    }
}
