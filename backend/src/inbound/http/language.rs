//! Requested-language extractor.
//!
//! The language is taken verbatim from request extensions (set by upstream
//! middleware) or the `X-Language` header, else the configured default. No
//! `Accept-Language` negotiation happens here.

use std::future::{Ready, ready};
use std::ops::Deref;

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, web};
use serde_json::json;

use crate::domain::{Error, LanguageCode};

/// Header naming the language text should be resolved in.
pub const LANGUAGE_HEADER: &str = "x-language";

/// Language used when a request names none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultLanguage(pub LanguageCode);

impl Default for DefaultLanguage {
    fn default() -> Self {
        Self(LanguageCode::source())
    }
}

/// Language every read in this request resolves text into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLanguage(pub LanguageCode);

impl Deref for RequestLanguage {
    type Target = LanguageCode;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn invalid_language(value: &str, reason: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("invalid language: {reason}")).with_details(json!({
        "field": LANGUAGE_HEADER,
        "value": value,
        "code": "invalid_language",
    }))
}

fn language_from_request(req: &HttpRequest) -> Result<LanguageCode, Error> {
    if let Some(language) = req.extensions().get::<LanguageCode>() {
        return Ok(language.clone());
    }

    if let Some(value) = req.headers().get(LANGUAGE_HEADER) {
        let raw = value
            .to_str()
            .map_err(|err| invalid_language("<non-ascii>", err))?;
        if !raw.trim().is_empty() {
            return LanguageCode::new(raw).map_err(|err| invalid_language(raw, err));
        }
    }

    Ok(req
        .app_data::<web::Data<DefaultLanguage>>()
        .map(|default| default.0.clone())
        .unwrap_or_else(LanguageCode::source))
}

impl FromRequest for RequestLanguage {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(language_from_request(req).map(Self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    fn code(raw: &str) -> LanguageCode {
        LanguageCode::new(raw).expect("valid code")
    }

    #[rstest]
    fn header_wins_over_default() {
        let req = TestRequest::default()
            .insert_header((LANGUAGE_HEADER, "en"))
            .app_data(web::Data::new(DefaultLanguage(code("es"))))
            .to_http_request();

        assert_eq!(language_from_request(&req).expect("language"), code("en"));
    }

    #[rstest]
    fn extensions_win_over_header() {
        let req = TestRequest::default()
            .insert_header((LANGUAGE_HEADER, "en"))
            .to_http_request();
        req.extensions_mut().insert(code("fr"));

        assert_eq!(language_from_request(&req).expect("language"), code("fr"));
    }

    #[rstest]
    #[case(None)]
    #[case(Some("   "))]
    fn falls_back_to_configured_default(#[case] header: Option<&str>) {
        let mut builder =
            TestRequest::default().app_data(web::Data::new(DefaultLanguage(code("es"))));
        if let Some(value) = header {
            builder = builder.insert_header((LANGUAGE_HEADER, value));
        }

        assert_eq!(
            language_from_request(&builder.to_http_request()).expect("language"),
            code("es")
        );
    }

    #[rstest]
    fn source_language_without_configuration() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(
            language_from_request(&req).expect("language"),
            LanguageCode::source()
        );
    }

    #[rstest]
    fn rejects_malformed_codes() {
        let req = TestRequest::default()
            .insert_header((LANGUAGE_HEADER, "en_US"))
            .to_http_request();

        let err = language_from_request(&req).expect_err("invalid code");

        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }
}
