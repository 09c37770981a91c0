//! Error types for file acquisition.

use thiserror::Error;

/// Why an acquisition did not produce text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FileAcquisitionError {
    /// The dialog closed without a file, or the acquisition was cancelled.
    #[error("File selection was cancelled")]
    Cancelled,

    /// The selected file could not be read.
    #[error("Failed to read '{file}': {message}")]
    ReadFailed { file: String, message: String },

    /// The selected file is not valid UTF-8.
    #[error("'{file}' is not valid UTF-8 (invalid byte at offset {valid_up_to})")]
    DecodeFailed { file: String, valid_up_to: usize },

    /// Another acquisition is still pending on this bridge.
    #[error("A file selection is already in progress")]
    Busy,
}

impl FileAcquisitionError {
    /// Create a read failed error.
    pub fn read_failed(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReadFailed {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a decode failed error.
    pub fn decode_failed(file: impl Into<String>, valid_up_to: usize) -> Self {
        Self::DecodeFailed {
            file: file.into(),
            valid_up_to,
        }
    }

    /// Whether the user (or a timeout) ended the selection.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Result type for acquisition operations.
pub type AcquisitionResult<T> = Result<T, FileAcquisitionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_display_context() {
        let err = FileAcquisitionError::read_failed("level.txt", "permission denied");
        let msg = err.to_string();
        assert!(msg.contains("level.txt"));
        assert!(msg.contains("permission denied"));

        let err = FileAcquisitionError::decode_failed("blob.bin", 7);
        assert!(err.to_string().contains("offset 7"));
        assert!(!err.is_cancelled());
        assert!(FileAcquisitionError::Cancelled.is_cancelled());
    }
}
