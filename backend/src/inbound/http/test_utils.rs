//! Test helpers for inbound HTTP components.

use actix_web::test::TestRequest;
use serde_json::{Value, json};

use crate::domain::DEFAULT_ALLOCATION_ATTEMPTS;
use crate::inbound::http::auth::{USER_ADMIN_HEADER, USER_ID_HEADER};
use crate::inbound::http::state::HttpState;
use crate::server::{Repositories, build_http_state};

/// Administrator used by write requests in handler tests.
pub const ADMIN_ID: i64 = 1;

/// Handler state over fresh in-memory repositories.
pub fn memory_state() -> HttpState {
    build_http_state(&Repositories::in_memory(), DEFAULT_ALLOCATION_ATTEMPTS)
}

/// Attach administrator identity headers.
pub fn as_admin(req: TestRequest) -> TestRequest {
    req.insert_header((USER_ID_HEADER, ADMIN_ID.to_string()))
        .insert_header((USER_ADMIN_HEADER, "true"))
}

/// Attach a regular user's identity header.
pub fn as_user(req: TestRequest, user_id: i64) -> TestRequest {
    req.insert_header((USER_ID_HEADER, user_id.to_string()))
}

/// Minimal city body pointing at `name_ref`.
pub fn city_body(name_ref: i64) -> Value {
    json!({ "nameTextRefId": name_ref })
}
