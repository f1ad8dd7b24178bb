//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every rejection is an `invalid_request` error whose details name the
//! offending field, the raw value and a stable code.

use std::collections::BTreeMap;

use pagination::{PageQuery, PageRequest, PaginationError};
use serde_json::json;

use crate::domain::{ContentEntity, ContentFilter, Error, LanguageCode, ReferenceId, UserId};

/// Validation error codes reported in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidId,
    InvalidNumber,
    LimitTooLarge,
    InvalidSortOrder,
    InvalidLanguage,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidId => "invalid_id",
            Self::InvalidNumber => "invalid_number",
            Self::LimitTooLarge => "limit_too_large",
            Self::InvalidSortOrder => "invalid_sort_order",
            Self::InvalidLanguage => "invalid_language",
        }
    }
}

fn field_error(
    field: &str,
    value: impl Into<String>,
    code: ValidationCode,
    message: impl Into<String>,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "value": value.into(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: &str) -> Error {
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ValidationCode::MissingField.as_str(),
    }))
}

/// Validate the raw pagination query.
pub(crate) fn page_request(query: PageQuery) -> Result<PageRequest, Error> {
    query.into_request().map_err(|err| {
        let (value, code) = match &err {
            PaginationError::InvalidNumber { value, .. } => {
                (value.clone(), ValidationCode::InvalidNumber)
            }
            PaginationError::LimitTooLarge { value, .. } => {
                (value.to_string(), ValidationCode::LimitTooLarge)
            }
            PaginationError::InvalidSortOrder { value } => {
                (value.clone(), ValidationCode::InvalidSortOrder)
            }
        };
        field_error(err.field(), value, code, err.to_string())
    })
}

/// Parent filter for `T`, read from its parent query parameter (for example
/// `cityId`). Kinds without a parent ignore the query string.
pub(crate) fn parent_filter<T: ContentEntity>(
    params: &BTreeMap<String, String>,
) -> Result<ContentFilter, Error> {
    let Some(field) = T::PARENT_FIELD else {
        return Ok(ContentFilter::default());
    };
    match params.get(field).map(|raw| raw.trim()) {
        None | Some("") => Ok(ContentFilter::default()),
        Some(raw) => positive_id(field, raw).map(ContentFilter::by_parent),
    }
}

/// Parse a positive integer id.
pub(crate) fn positive_id(field: &str, raw: &str) -> Result<i64, Error> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(field_error(
            field,
            raw,
            ValidationCode::InvalidId,
            format!("{field} must be a positive integer"),
        )),
    }
}

pub(crate) fn user_id(raw: i64) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|_| {
        field_error(
            "userId",
            raw.to_string(),
            ValidationCode::InvalidId,
            "userId must be a positive integer",
        )
    })
}

pub(crate) fn reference_id(raw: i64) -> Result<ReferenceId, Error> {
    ReferenceId::new(raw).map_err(|err| {
        field_error(
            "referenceId",
            raw.to_string(),
            ValidationCode::InvalidId,
            err.to_string(),
        )
    })
}

pub(crate) fn language_code(raw: &str) -> Result<LanguageCode, Error> {
    LanguageCode::new(raw).map_err(|err| {
        field_error(
            "languageCode",
            raw,
            ValidationCode::InvalidLanguage,
            err.to_string(),
        )
    })
}
