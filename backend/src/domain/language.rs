//! Language codes used to key localized text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Code of the language every text group is authored in first.
pub const SOURCE_LANGUAGE: &str = "pt";

const MAX_LANGUAGE_CODE_LEN: usize = 16;

/// Validation errors returned by [`LanguageCode::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LanguageCodeError {
    #[error("language code must not be empty")]
    Empty,
    #[error("language code must be at most {max} characters")]
    TooLong { max: usize },
    #[error("language code `{value}` may only contain ASCII letters and '-'")]
    InvalidCharacters { value: String },
}

/// A language tag such as `pt`, `en` or `pt-BR`.
///
/// Codes are stored exactly as supplied (after trimming) so that lookups
/// match the rows written by the admin console.
///
/// # Examples
/// ```
/// use tourism_backend::domain::LanguageCode;
///
/// let code = LanguageCode::new(" en ").expect("valid code");
/// assert_eq!(code.as_str(), "en");
/// assert!(LanguageCode::new("e n").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Validate and construct a language code.
    pub fn new(value: impl AsRef<str>) -> Result<Self, LanguageCodeError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(LanguageCodeError::Empty);
        }
        if trimmed.len() > MAX_LANGUAGE_CODE_LEN {
            return Err(LanguageCodeError::TooLong {
                max: MAX_LANGUAGE_CODE_LEN,
            });
        }
        if !trimmed
            .chars()
            .all(|ch| ch.is_ascii_alphabetic() || ch == '-')
        {
            return Err(LanguageCodeError::InvalidCharacters {
                value: trimmed.to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The source language (`pt`).
    pub fn source() -> Self {
        Self(SOURCE_LANGUAGE.to_owned())
    }

    /// Normalised code as stored.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether this is the language every text group must carry.
    pub fn is_source(&self) -> bool {
        self.0 == SOURCE_LANGUAGE
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LanguageCode {
    type Err = LanguageCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = LanguageCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LanguageCode> for String {
    fn from(value: LanguageCode) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("pt")]
    #[case("en")]
    #[case("pt-BR")]
    fn accepts_language_tags(#[case] raw: &str) {
        assert_eq!(LanguageCode::new(raw).map(String::from), Ok(raw.to_owned()));
    }

    #[rstest]
    #[case("", LanguageCodeError::Empty)]
    #[case("   ", LanguageCodeError::Empty)]
    #[case("abcdefghijklmnopq", LanguageCodeError::TooLong { max: 16 })]
    #[case("en_GB", LanguageCodeError::InvalidCharacters { value: "en_GB".to_owned() })]
    fn rejects_malformed_codes(#[case] raw: &str, #[case] expected: LanguageCodeError) {
        assert_eq!(LanguageCode::new(raw), Err(expected));
    }

    #[rstest]
    fn source_language_is_portuguese() {
        assert!(LanguageCode::source().is_source());
        assert!(!LanguageCode::new("en").expect("valid").is_source());
    }
}
