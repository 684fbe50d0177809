//! Error types for path construction, decoding and the path algebra.

use thiserror::Error;

use crate::layout::{DATA_LEN, ENCODED_LEN, MAX_SEGMENTS};

/// Result type for itree operations.
pub type Result<T> = std::result::Result<T, ITreeError>;

/// Top-level error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ITreeError {
    /// Malformed text, out-of-range segment, too many segments or byte budget exceeded.
    #[error("invalid itree path: {0}")]
    InvalidPath(#[from] PathError),

    /// Wrong buffer length or malformed control bits.
    #[error("invalid itree encoding: {0}")]
    InvalidEncoding(#[from] EncodingError),

    /// A value of an unsupported kind was offered where a path was expected.
    #[error("itree must be built from text or another itree, not {found}")]
    TypeMismatch { found: &'static str },

    /// Position outside the path.
    #[error("segment index {index} out of range for itree of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Subpath search miss.
    #[error("subpath '{needle}' not found")]
    NotFound { needle: String },
}

impl ITreeError {
    pub fn type_mismatch(found: &'static str) -> Self {
        Self::TypeMismatch { found }
    }

    pub fn not_found(needle: impl Into<String>) -> Self {
        Self::NotFound {
            needle: needle.into(),
        }
    }
}

/// Why a path failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("path cannot be empty")]
    Empty,

    #[error("empty segment at position {position}")]
    EmptySegment { position: usize },

    #[error("segment '{segment}' is not a valid integer")]
    NotAnInteger { segment: String },

    #[error("segment '{segment}' must be in range 1..65535")]
    SegmentOutOfRange { segment: String },

    #[error("itree must have at most {} segments", MAX_SEGMENTS)]
    TooManySegments,

    #[error("segment at position {position} exceeds the {}-byte budget", DATA_LEN)]
    ByteBudgetExceeded { position: usize },

    /// Rejected by a column type modifier.
    #[error("itree has {levels} levels, column allows at most {max_levels}")]
    TooManyLevels { levels: usize, max_levels: u8 },

    #[error("max levels must be 1..{}, got '{}'", MAX_SEGMENTS, .0)]
    InvalidTypmod(String),
}

/// Why an 18-byte buffer failed to decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("itree must be {} bytes, got {}", ENCODED_LEN, .0)]
    WrongLength(usize),

    #[error("continuation bit at segment start position {0}")]
    UnexpectedContinuation(usize),

    #[error("itree cannot have more than {} segments", MAX_SEGMENTS)]
    TooManySegments,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_cause() {
        let err = ITreeError::from(PathError::SegmentOutOfRange {
            segment: "70000".into(),
        });
        assert_eq!(
            err.to_string(),
            "invalid itree path: segment '70000' must be in range 1..65535"
        );

        let err = ITreeError::from(EncodingError::WrongLength(4));
        assert_eq!(err.to_string(), "invalid itree encoding: itree must be 18 bytes, got 4");

        let err = ITreeError::not_found("9.9");
        assert_eq!(err.to_string(), "subpath '9.9' not found");
    }
}
