//! Favorite/visited handlers mounted once per listing.
//!
//! ```text
//! GET    /api/v1/users/{userId}/{listing}
//! POST   /api/v1/users/{userId}/{listing}                     body {"<kind>Id": n}
//! DELETE /api/v1/users/{userId}/{listing}/{targetId}
//! POST   /api/v1/users/{userId}/{listing}/{targetId}/toggle
//! GET    /api/v1/users/{userId}/available-{listing}
//! ```
//!
//! `{listing}` is one of `favorite-cities`, `favorite-routes`,
//! `favorite-events`, `favorite-locations` or `visited-locations`. Callers
//! may only act on their own id unless they are administrators.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::domain::{AuthenticatedUser, ContentEntity, Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::ApiResponse;
use crate::inbound::http::language::RequestLanguage;
use crate::inbound::http::state::AssociationState;
use crate::inbound::http::validation::{missing_field_error, user_id};

/// `/users/{user_id}/...`
#[derive(Debug, Deserialize)]
pub struct UserPath {
    /// Owner of the listing.
    pub user_id: i64,
}

/// `/users/{user_id}/.../{target_id}`
#[derive(Debug, Deserialize)]
pub struct UserTargetPath {
    /// Owner of the listing.
    pub user_id: i64,
    /// Content row the membership points at.
    pub target_id: i64,
}

/// Name of the body field carrying the target id, for example `cityId`.
fn target_field<T: ContentEntity>() -> String {
    format!("{}Id", T::KIND.as_str())
}

fn target_from_body<T: ContentEntity>(body: &Map<String, Value>) -> Result<i64, Error> {
    let field = target_field::<T>();
    let value = body.get(&field).ok_or_else(|| missing_field_error(&field))?;
    value
        .as_i64()
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            Error::invalid_request(format!("{field} must be a positive integer")).with_details(
                json!({"field": field, "value": value, "code": "invalid_id"}),
            )
        })
}

/// Resolve the path owner and check the caller may act for them.
fn authorised_owner(caller: &AuthenticatedUser, raw: i64) -> Result<UserId, Error> {
    let owner = user_id(raw)?;
    caller.require_self_or_admin(owner)?;
    Ok(owner)
}

/// `GET /users/{id}/{listing}`.
pub async fn list<T: ContentEntity>(
    state: web::Data<AssociationState<T>>,
    caller: AuthenticatedUser,
    language: RequestLanguage,
    path: web::Path<UserPath>,
) -> ApiResult<HttpResponse> {
    let owner = authorised_owner(&caller, path.user_id)?;
    let items = state.associations.list(owner, &language).await?;
    Ok(ApiResponse::ok(items).into_response())
}

/// `POST /users/{id}/{listing}` with `{<kind>Id}`.
pub async fn add<T: ContentEntity>(
    state: web::Data<AssociationState<T>>,
    caller: AuthenticatedUser,
    path: web::Path<UserPath>,
    body: web::Json<Map<String, Value>>,
) -> ApiResult<HttpResponse> {
    let owner = authorised_owner(&caller, path.user_id)?;
    let target_id = target_from_body::<T>(&body)?;
    state.associations.add(owner, target_id).await?;
    let relation = state.associations.relation();
    let field = target_field::<T>();
    Ok(ApiResponse::ok(json!({ field: target_id }))
        .with_message(format!("{} marked as {relation}", T::KIND))
        .into_response_with(StatusCode::CREATED))
}

/// `DELETE /users/{id}/{listing}/{targetId}`.
pub async fn remove<T: ContentEntity>(
    state: web::Data<AssociationState<T>>,
    caller: AuthenticatedUser,
    path: web::Path<UserTargetPath>,
) -> ApiResult<HttpResponse> {
    let owner = authorised_owner(&caller, path.user_id)?;
    state.associations.remove(owner, path.target_id).await?;
    let relation = state.associations.relation();
    let field = target_field::<T>();
    Ok(ApiResponse::ok(json!({ field: path.target_id }))
        .with_message(format!("{} no longer marked as {relation}", T::KIND))
        .into_response())
}

/// `POST /users/{id}/{listing}/{targetId}/toggle`.
pub async fn toggle<T: ContentEntity>(
    state: web::Data<AssociationState<T>>,
    caller: AuthenticatedUser,
    path: web::Path<UserTargetPath>,
) -> ApiResult<HttpResponse> {
    let owner = authorised_owner(&caller, path.user_id)?;
    let member = state.associations.toggle(owner, path.target_id).await?;
    let field = state.associations.relation().membership_field();
    Ok(ApiResponse::ok(json!({ field: member })).into_response())
}

/// `GET /users/{id}/available-{listing}`.
pub async fn available<T: ContentEntity>(
    state: web::Data<AssociationState<T>>,
    caller: AuthenticatedUser,
    language: RequestLanguage,
    path: web::Path<UserPath>,
) -> ApiResult<HttpResponse> {
    let owner = authorised_owner(&caller, path.user_id)?;
    let items = state.associations.available(owner, &language).await?;
    Ok(ApiResponse::ok(items).into_response())
}

/// Mount the membership routes for `listing` (for example `favorite-cities`).
pub fn scope<T: ContentEntity>(listing: &str, state: AssociationState<T>) -> actix_web::Scope {
    web::scope(&format!("/users/{{user_id}}/{listing}"))
        .app_data(web::Data::new(state))
        .route("", web::get().to(list::<T>))
        .route("", web::post().to(add::<T>))
        .route("/{target_id}", web::delete().to(remove::<T>))
        .route("/{target_id}/toggle", web::post().to(toggle::<T>))
}

/// Mount `GET /users/{userId}/available-{listing}`.
pub fn available_scope<T: ContentEntity>(
    listing: &str,
    state: AssociationState<T>,
) -> actix_web::Scope {
    web::scope(&format!("/users/{{user_id}}/available-{listing}"))
        .app_data(web::Data::new(state))
        .route("", web::get().to(available::<T>))
}

#[cfg(test)]
#[path = "associations_tests.rs"]
mod tests;
