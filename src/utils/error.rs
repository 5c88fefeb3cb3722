//! Error handling for richblocks
//!
//! Recognition failures never surface here: unrecognized markup degrades to
//! plain text, and structural floor violations are refused silently. This
//! type only covers invalid user input and API misuse.

use thiserror::Error;

/// Editor error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    /// A pasted URL could not be turned into an embed
    #[error("Invalid embed URL '{input}': {message}")]
    InvalidEmbedUrl { input: String, message: String },
    /// Segment index does not exist in the current segmentation
    #[error("Segment {index} out of range (document has {len} segments)")]
    SegmentOutOfRange { index: usize, len: usize },
    /// Segment exists but is not of the kind the operation needs
    #[error("Segment {index} is {found}, expected {expected}")]
    WrongSegmentKind {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },
    /// Input is not a table fragment
    #[error("No table found in input")]
    NoTable,
    /// Cell coordinates outside the grid
    #[error("Cell ({row}, {column}) is outside the table")]
    CellOutOfRange { row: usize, column: usize },
    /// IO error (CLI file handling)
    #[error("IO error: {message}")]
    IoError { message: String },
}

impl From<std::io::Error> for EditorError {
    fn from(err: std::io::Error) -> Self {
        EditorError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type for editor operations
pub type EditorResult<T> = Result<T, EditorError>;

// Convenience constructors
impl EditorError {
    pub fn invalid_url(input: impl Into<String>, message: impl Into<String>) -> Self {
        EditorError::InvalidEmbedUrl {
            input: input.into(),
            message: message.into(),
        }
    }

    pub fn out_of_range(index: usize, len: usize) -> Self {
        EditorError::SegmentOutOfRange { index, len }
    }

    pub fn wrong_kind(index: usize, expected: &'static str, found: &'static str) -> Self {
        EditorError::WrongSegmentKind {
            index,
            expected,
            found,
        }
    }

    /// Message suitable for showing to the person who pasted the URL
    pub fn user_message(&self) -> String {
        match self {
            EditorError::InvalidEmbedUrl { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_display() {
        let err = EditorError::invalid_url("ftp://x", "Please paste a YouTube link");
        let msg = err.to_string();
        assert!(msg.contains("ftp://x"));
        assert!(msg.contains("YouTube"));
        assert_eq!(err.user_message(), "Please paste a YouTube link");
    }

    #[test]
    fn test_out_of_range_display() {
        let err = EditorError::out_of_range(7, 3);
        assert!(err.to_string().contains("Segment 7"));
        assert!(err.to_string().contains("3 segments"));
    }

    #[test]
    fn test_wrong_kind_display() {
        let err = EditorError::wrong_kind(1, "table", "youtube");
        assert_eq!(err.to_string(), "Segment 1 is youtube, expected table");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.md");
        let err: EditorError = io.into();
        assert!(matches!(err, EditorError::IoError { .. }));
        assert!(err.to_string().contains("missing.md"));
    }
}
