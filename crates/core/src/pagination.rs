//! Offset/limit pagination helpers.

/// Default number of rows per page when the caller sends no `limit`.
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Upper bound on rows per page.
pub const MAX_PAGE_LIMIT: i64 = 100;

/// A negative `offset` or `limit`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    #[error("offset must be non-negative, got {0}")]
    NegativeOffset(i64),

    #[error("limit must be non-negative, got {0}")]
    NegativeLimit(i64),
}

/// Reject negative pagination values. Zero is allowed for both.
pub fn validate_page(offset: i64, limit: i64) -> Result<(), PageError> {
    if offset < 0 {
        return Err(PageError::NegativeOffset(offset));
    }
    if limit < 0 {
        return Err(PageError::NegativeLimit(limit));
    }
    Ok(())
}

/// Clamp a user-provided limit to `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}
