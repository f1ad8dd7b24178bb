//! Field checks shared by the content drafts and patches.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::domain::Error;

const MAX_SHORT_TEXT_LEN: usize = 255;
const MAX_URL_LEN: usize = 2048;

fn field_error(field: &str, code: &str, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code,
    }))
}

pub(super) fn latitude(field: &str, value: Option<f64>) -> Result<(), Error> {
    match value {
        Some(lat) if !(-90.0..=90.0).contains(&lat) => Err(field_error(
            field,
            "out_of_range",
            format!("{field} must be between -90 and 90"),
        )),
        _ => Ok(()),
    }
}

pub(super) fn longitude(field: &str, value: Option<f64>) -> Result<(), Error> {
    match value {
        Some(lng) if !(-180.0..=180.0).contains(&lng) => Err(field_error(
            field,
            "out_of_range",
            format!("{field} must be between -180 and 180"),
        )),
        _ => Ok(()),
    }
}

pub(super) fn non_negative_f64(field: &str, value: Option<f64>) -> Result<(), Error> {
    match value {
        Some(number) if !number.is_finite() || number < 0.0 => Err(field_error(
            field,
            "negative",
            format!("{field} must be a non-negative number"),
        )),
        _ => Ok(()),
    }
}

pub(super) fn non_negative_i32(field: &str, value: Option<i32>) -> Result<(), Error> {
    match value {
        Some(number) if number < 0 => Err(field_error(
            field,
            "negative",
            format!("{field} must be a non-negative integer"),
        )),
        _ => Ok(()),
    }
}

pub(super) fn short_text(field: &str, value: Option<&str>) -> Result<(), Error> {
    match value {
        Some(text) if text.trim().is_empty() => Err(field_error(
            field,
            "blank",
            format!("{field} must not be blank"),
        )),
        Some(text) if text.chars().count() > MAX_SHORT_TEXT_LEN => Err(field_error(
            field,
            "too_long",
            format!("{field} must be at most {MAX_SHORT_TEXT_LEN} characters"),
        )),
        _ => Ok(()),
    }
}

pub(super) fn url(field: &str, value: Option<&str>) -> Result<(), Error> {
    match value {
        Some(text) if text.trim().is_empty() || text.len() > MAX_URL_LEN => Err(field_error(
            field,
            "invalid_url",
            format!("{field} must be a non-empty URL of at most {MAX_URL_LEN} bytes"),
        )),
        _ => Ok(()),
    }
}

pub(super) fn positive_id(field: &str, value: Option<i64>) -> Result<(), Error> {
    match value {
        Some(id) if id <= 0 => Err(field_error(
            field,
            "invalid_id",
            format!("{field} must be a positive integer"),
        )),
        _ => Ok(()),
    }
}

pub(super) fn ends_after_starts(
    starts_at: Option<DateTime<Utc>>,
    ends_at: Option<DateTime<Utc>>,
) -> Result<(), Error> {
    match (starts_at, ends_at) {
        (Some(start), Some(end)) if end < start => Err(field_error(
            "endsAt",
            "ends_before_start",
            "endsAt must not be earlier than startsAt".to_owned(),
        )),
        _ => Ok(()),
    }
}
