use std::fmt;
use thiserror::Error;

/// Result alias used by every checked vector and matrix operation
pub type Result<T> = std::result::Result<T, DomainError>;

/// Failures raised when a size, index, or operand pairing falls outside the valid domain
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid size {requested}; size must be within 1..={max}")]
    InvalidSize { requested: String, max: usize },

    #[error("Invalid start index {requested}; start index cannot exceed {max}")]
    InvalidStartIndex { requested: usize, max: usize },

    #[error("Index {index} is outside the valid range {start}..{end}")]
    InvalidIndex {
        index: String,
        start: usize,
        end: usize,
    },

    #[error("Operand sizes differ ({left} vs {right}); cannot combine")]
    SizeMismatch { left: usize, right: usize },

    #[error("Operand start indices differ ({left} vs {right}); cannot combine")]
    StartIndexMismatch { left: usize, right: usize },
}

/// Any integer that may (or may not) convert into a `usize` size or index.
///
/// Sizes and indices are accepted as arbitrary integers so that negative requests
/// can be rejected with a [DomainError] instead of being unrepresentable.
pub trait Coordinate: TryInto<usize> + fmt::Display + Copy {
    /// The value as a `usize`, if it has one
    fn to_usize(self) -> Option<usize> {
        self.try_into().ok()
    }
}

impl<I: TryInto<usize> + fmt::Display + Copy> Coordinate for I {}

/// Validate a requested size against `1..=max`
pub fn validate_size(requested: impl Coordinate, max: usize) -> Result<usize> {
    match requested.to_usize() {
        Some(size) if size > 0 && size <= max => Ok(size),
        _ => Err(DomainError::InvalidSize {
            requested: requested.to_string(),
            max,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_bounds() {
        assert_eq!(validate_size(1, 10), Ok(1));
        assert_eq!(validate_size(10_u64, 10), Ok(10));
        assert!(validate_size(0, 10).is_err());
        assert!(validate_size(11, 10).is_err());
    }

    #[test]
    fn negative_size_is_reported() {
        let err = validate_size(-5_i64, 10).unwrap_err();

        assert_eq!(
            err,
            DomainError::InvalidSize {
                requested: String::from("-5"),
                max: 10
            }
        );
        assert_eq!(
            err.to_string(),
            "Invalid size -5; size must be within 1..=10"
        );
    }
}
