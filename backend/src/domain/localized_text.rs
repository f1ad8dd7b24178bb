//! Reference-keyed localized text.
//!
//! Content rows never hold display text inline. Each text field stores a
//! [`ReferenceId`]; the language variants for that id live in the localized
//! text store as one row per `(reference_id, language_code)`. The set of rows
//! sharing a reference id is a *text group*.
//!
//! Reference ids form a single namespace shared by every content kind.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::LanguageCode;

/// Text group as returned to clients: `{languageCode: text}`.
pub type TextGroup = BTreeMap<String, String>;

/// Validation error for [`ReferenceId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("reference id must be a positive integer, got {0}")]
pub struct InvalidReferenceId(pub i64);

/// Integer key grouping every language variant of one text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(try_from = "i64", into = "i64")]
#[schema(value_type = i64, example = 1042)]
pub struct ReferenceId(i64);

impl ReferenceId {
    /// Validate and wrap a raw reference id.
    pub fn new(value: i64) -> Result<Self, InvalidReferenceId> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(InvalidReferenceId(value))
        }
    }

    /// Raw database value.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for ReferenceId {
    type Error = InvalidReferenceId;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ReferenceId> for i64 {
    fn from(value: ReferenceId) -> Self {
        value.0
    }
}

/// One stored language variant of a text group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedText {
    /// Row identifier.
    pub text_id: i64,
    /// Group the variant belongs to.
    pub reference_id: ReferenceId,
    /// Language of `text_content`; unique within the group.
    pub language_code: LanguageCode,
    /// Stored verbatim.
    pub text_content: String,
    /// When the variant was first written.
    pub created_at: DateTime<Utc>,
    /// When the variant was last overwritten.
    pub updated_at: DateTime<Utc>,
}

/// A translation supplied by a client for upsert or group creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranslationInput {
    /// Target language.
    #[schema(value_type = String, example = "en")]
    pub language_code: LanguageCode,
    /// Text for that language; blank entries are ignored.
    #[schema(example = "Forte Beach")]
    pub text_content: String,
}

impl TranslationInput {
    /// Pair a language with its text.
    pub fn new(language_code: LanguageCode, text_content: impl Into<String>) -> Self {
        Self {
            language_code,
            text_content: text_content.into(),
        }
    }

    /// Blank input is skipped by upserts rather than stored or cleared.
    pub fn is_blank(&self) -> bool {
        self.text_content.trim().is_empty()
    }
}

/// Collapse stored rows into the client-facing `{languageCode: text}` map.
pub fn to_text_group(rows: impl IntoIterator<Item = LocalizedText>) -> TextGroup {
    rows.into_iter()
        .map(|row| (String::from(row.language_code), row.text_content))
        .collect()
}
