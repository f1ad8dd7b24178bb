//! Caller identity extractor.
//!
//! Authentication happens upstream. The gateway either places an
//! [`AuthenticatedUser`] in the request extensions or forwards the trusted
//! `X-User-Id` / `X-User-Admin` headers; this module only reads them.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use serde_json::json;

use crate::domain::{AuthenticatedUser, Error, UserId};

/// Header carrying the authenticated user's numeric id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying `true` when the authenticated user is an administrator.
pub const USER_ADMIN_HEADER: &str = "x-user-admin";

fn header_value<'a>(req: &'a HttpRequest, name: &str) -> Result<Option<&'a str>, Error> {
    req.headers()
        .get(name)
        .map(|value| {
            value.to_str().map_err(|_| {
                Error::unauthorized("identity header is not valid ASCII")
                    .with_details(json!({"header": name}))
            })
        })
        .transpose()
}

fn parse_admin_flag(raw: Option<&str>) -> bool {
    raw.is_some_and(|value| {
        let value = value.trim();
        value.eq_ignore_ascii_case("true") || value == "1"
    })
}

/// Resolve the caller from extensions first, then from gateway headers.
///
/// # Errors
///
/// `Unauthorized` when no identity is present or the id is malformed.
pub fn caller_from_request(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    if let Some(user) = req.extensions().get::<AuthenticatedUser>() {
        return Ok(*user);
    }

    let raw_id = header_value(req, USER_ID_HEADER)?
        .ok_or_else(|| Error::unauthorized("authentication required"))?;
    let user_id = raw_id
        .trim()
        .parse::<i64>()
        .ok()
        .and_then(|id| UserId::new(id).ok())
        .ok_or_else(|| {
            Error::unauthorized("authenticated user id is malformed")
                .with_details(json!({"header": USER_ID_HEADER}))
        })?;
    let is_admin = parse_admin_flag(header_value(req, USER_ADMIN_HEADER)?);

    Ok(AuthenticatedUser::new(user_id, is_admin))
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(caller_from_request(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    #[case(Some("true"), true)]
    #[case(Some("TRUE"), true)]
    #[case(Some("1"), true)]
    #[case(Some("false"), false)]
    #[case(Some("yes"), false)]
    #[case(None, false)]
    fn admin_flag_parsing(#[case] raw: Option<&str>, #[case] expected: bool) {
        assert_eq!(parse_admin_flag(raw), expected);
    }

    #[rstest]
    fn reads_gateway_headers() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "42"))
            .insert_header((USER_ADMIN_HEADER, "true"))
            .to_http_request();

        let user = caller_from_request(&req).expect("caller");

        assert_eq!(user.user_id.get(), 42);
        assert!(user.is_admin);
    }

    #[rstest]
    fn extensions_take_precedence_over_headers() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "42"))
            .to_http_request();
        let injected = AuthenticatedUser::new(UserId::new(7).expect("valid id"), false);
        req.extensions_mut().insert(injected);

        assert_eq!(caller_from_request(&req).expect("caller"), injected);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("abc"))]
    #[case(Some("-3"))]
    fn missing_or_malformed_ids_are_unauthorised(#[case] header: Option<&str>) {
        let mut builder = TestRequest::default();
        if let Some(value) = header {
            builder = builder.insert_header((USER_ID_HEADER, value));
        }

        let err = caller_from_request(&builder.to_http_request()).expect_err("no caller");

        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
