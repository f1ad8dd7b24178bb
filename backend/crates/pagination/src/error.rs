//! Errors raised while parsing pagination parameters.

/// Reasons a pagination request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// A numeric parameter was not a positive integer.
    #[error("{field} must be a positive integer, got `{value}`")]
    InvalidNumber {
        /// Query parameter name.
        field: &'static str,
        /// Raw value supplied by the client.
        value: String,
    },
    /// The requested limit exceeds the allowed maximum.
    #[error("limit must not exceed {max}, got {value}")]
    LimitTooLarge {
        /// Largest accepted limit.
        max: u32,
        /// Limit supplied by the client.
        value: u32,
    },
    /// The sort order was neither `ASC` nor `DESC`.
    #[error("sortOrder must be ASC or DESC, got `{value}`")]
    InvalidSortOrder {
        /// Raw value supplied by the client.
        value: String,
    },
}

impl PaginationError {
    /// Name of the query parameter that caused the failure.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::InvalidNumber { field, .. } => *field,
            Self::LimitTooLarge { .. } => "limit",
            Self::InvalidSortOrder { .. } => "sortOrder",
        }
    }
}
