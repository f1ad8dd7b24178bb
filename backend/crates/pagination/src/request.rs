//! Validated page requests and their raw query form.

use serde::Deserialize;

use crate::{PaginationError, SortDirection, SortSpec};

/// Page used when the client omits `page`.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when the client omits `limit`.
pub const DEFAULT_LIMIT: u32 = 10;
/// Largest accepted page size.
pub const MAX_LIMIT: u32 = 100;

/// Raw pagination parameters as they arrive on a query string.
///
/// Values stay as strings so that malformed input is reported with the
/// offending field rather than a generic deserialisation failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// One-based page number.
    pub page: Option<String>,
    /// Page size.
    pub limit: Option<String>,
    /// Client-facing sort field.
    pub sort_by: Option<String>,
    /// `ASC` or `DESC`, case-insensitive.
    pub sort_order: Option<String>,
}

impl PageQuery {
    /// Validate the raw parameters, applying defaults for missing values.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError`] when `page` or `limit` is not a positive
    /// integer, `limit` exceeds [`MAX_LIMIT`], or `sortOrder` is unknown.
    pub fn into_request(self) -> Result<PageRequest, PaginationError> {
        let page = parse_positive("page", self.page.as_deref())?.unwrap_or(DEFAULT_PAGE);
        let limit = parse_positive("limit", self.limit.as_deref())?.unwrap_or(DEFAULT_LIMIT);
        let direction = match non_blank(self.sort_order.as_deref()) {
            Some(raw) => raw.parse::<SortDirection>()?,
            None => SortDirection::default(),
        };
        let sort_by = non_blank(self.sort_by.as_deref()).map(str::to_owned);

        let request = PageRequest::new(page, limit)?;
        Ok(PageRequest {
            sort_by,
            direction,
            ..request
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|raw| !raw.is_empty())
}

fn parse_positive(field: &'static str, value: Option<&str>) -> Result<Option<u32>, PaginationError> {
    let Some(raw) = non_blank(value) else {
        return Ok(None);
    };
    match raw.parse::<u32>() {
        Ok(parsed) if parsed > 0 => Ok(Some(parsed)),
        _ => Err(PaginationError::InvalidNumber {
            field,
            value: raw.to_owned(),
        }),
    }
}

/// A validated request for one page of results.
///
/// ## Invariants
/// - `page >= 1`
/// - `1 <= limit <= MAX_LIMIT`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
    sort_by: Option<String>,
    direction: SortDirection,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort_by: None,
            direction: SortDirection::Asc,
        }
    }
}

impl PageRequest {
    /// Build a request for `page` with `limit` items per page.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError`] when either value is zero or `limit`
    /// exceeds [`MAX_LIMIT`].
    pub fn new(page: u32, limit: u32) -> Result<Self, PaginationError> {
        if page == 0 {
            return Err(PaginationError::InvalidNumber {
                field: "page",
                value: page.to_string(),
            });
        }
        if limit == 0 {
            return Err(PaginationError::InvalidNumber {
                field: "limit",
                value: limit.to_string(),
            });
        }
        if limit > MAX_LIMIT {
            return Err(PaginationError::LimitTooLarge {
                max: MAX_LIMIT,
                value: limit,
            });
        }
        Ok(Self {
            page,
            limit,
            ..Self::default()
        })
    }

    /// Replace the sort with `field` in `direction`.
    #[must_use]
    pub fn with_sort(self, field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            sort_by: Some(field.into()),
            direction,
            ..self
        }
    }

    /// One-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Explicitly requested sort field, if any.
    #[must_use]
    pub fn sort_by(&self) -> Option<&str> {
        self.sort_by.as_deref()
    }

    /// Requested direction; ascending unless the client asked otherwise.
    #[must_use]
    pub const fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Resolve the effective sort, using `default_field` when none was given.
    #[must_use]
    pub fn sort_or(&self, default_field: &str) -> SortSpec {
        SortSpec::new(
            self.sort_by.as_deref().unwrap_or(default_field),
            self.direction,
        )
    }

    /// Number of rows to skip: `(page - 1) * limit`.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}
