//! Generic content handlers mounted once per collection.
//!
//! ```text
//! GET    /api/v1/{collection}              paginated, text resolved
//! GET    /api/v1/{collection}/all
//! GET    /api/v1/{collection}/count
//! GET    /api/v1/{collection}/{id}
//! POST   /api/v1/{collection}              admin
//! POST   /api/v1/{collection}/bulk         admin
//! POST   /api/v1/{collection}/bulk-delete  admin, body {"ids": [...]}
//! PUT    /api/v1/{collection}/{id}         admin
//! DELETE /api/v1/{collection}/{id}         admin
//! POST   /api/v1/{collection}/{id}/archive admin
//! ```
//!
//! Handlers find their ports through the scope's `web::Data<ContentState<T>>`.

use std::collections::BTreeMap;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use pagination::PageQuery;
use serde::Deserialize;
use serde_json::json;

use crate::domain::{AuthenticatedUser, ContentEntity};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::ApiResponse;
use crate::inbound::http::language::RequestLanguage;
use crate::inbound::http::state::ContentState;
use crate::inbound::http::validation::{missing_field_error, page_request, parent_filter};

/// Body of `POST /{collection}/bulk-delete`.
#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    /// Rows to delete; required.
    pub ids: Option<Vec<i64>>,
}

/// `GET /{collection}`: one page, optionally filtered by parent id.
pub async fn list<T: ContentEntity>(
    state: web::Data<ContentState<T>>,
    language: RequestLanguage,
    page: web::Query<PageQuery>,
    params: web::Query<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let request = page_request(page.into_inner())?;
    let filter = parent_filter::<T>(&params)?;
    let page = state.query.list(&request, filter, &language).await?;
    Ok(ApiResponse::page(page).into_response())
}

/// `GET /{collection}/all`.
pub async fn list_all<T: ContentEntity>(
    state: web::Data<ContentState<T>>,
    language: RequestLanguage,
    params: web::Query<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let filter = parent_filter::<T>(&params)?;
    let items = state.query.list_all(filter, &language).await?;
    Ok(ApiResponse::ok(items).into_response())
}

/// `GET /{collection}/count`.
pub async fn count<T: ContentEntity>(
    state: web::Data<ContentState<T>>,
    params: web::Query<BTreeMap<String, String>>,
) -> ApiResult<HttpResponse> {
    let filter = parent_filter::<T>(&params)?;
    let count = state.query.count(filter).await?;
    Ok(ApiResponse::ok(json!({ "count": count })).into_response())
}

/// `GET /{collection}/{id}`.
pub async fn get<T: ContentEntity>(
    state: web::Data<ContentState<T>>,
    language: RequestLanguage,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let item = state.query.get(id.into_inner(), &language).await?;
    Ok(ApiResponse::ok(item).into_response())
}

/// `POST /{collection}` (admin).
pub async fn create<T: ContentEntity>(
    state: web::Data<ContentState<T>>,
    caller: AuthenticatedUser,
    language: RequestLanguage,
    draft: web::Json<T::Draft>,
) -> ApiResult<HttpResponse> {
    caller.require_admin()?;
    let created = state.command.create(draft.into_inner(), &language).await?;
    Ok(ApiResponse::ok(created)
        .with_message(format!("{} created", T::KIND))
        .into_response_with(StatusCode::CREATED))
}

/// `POST /{collection}/bulk` (admin). All rows or none are created.
pub async fn create_many<T: ContentEntity>(
    state: web::Data<ContentState<T>>,
    caller: AuthenticatedUser,
    language: RequestLanguage,
    drafts: web::Json<Vec<T::Draft>>,
) -> ApiResult<HttpResponse> {
    caller.require_admin()?;
    let created = state
        .command
        .create_many(drafts.into_inner(), &language)
        .await?;
    let message = format!("{} {} rows created", created.len(), T::KIND);
    Ok(ApiResponse::ok(created)
        .with_message(message)
        .into_response_with(StatusCode::CREATED))
}

/// `PUT /{collection}/{id}` (admin).
pub async fn update<T: ContentEntity>(
    state: web::Data<ContentState<T>>,
    caller: AuthenticatedUser,
    language: RequestLanguage,
    id: web::Path<i64>,
    patch: web::Json<T::Patch>,
) -> ApiResult<HttpResponse> {
    caller.require_admin()?;
    let updated = state
        .command
        .update(id.into_inner(), patch.into_inner(), &language)
        .await?;
    Ok(ApiResponse::ok(updated)
        .with_message(format!("{} updated", T::KIND))
        .into_response())
}

/// `DELETE /{collection}/{id}` (admin).
pub async fn delete<T: ContentEntity>(
    state: web::Data<ContentState<T>>,
    caller: AuthenticatedUser,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    caller.require_admin()?;
    let id = id.into_inner();
    state.command.delete(id).await?;
    Ok(ApiResponse::ok(json!({ "id": id }))
        .with_message(format!("{} deleted", T::KIND))
        .into_response())
}

/// `POST /{collection}/bulk-delete` (admin).
pub async fn delete_many<T: ContentEntity>(
    state: web::Data<ContentState<T>>,
    caller: AuthenticatedUser,
    body: web::Json<BulkDeleteRequest>,
) -> ApiResult<HttpResponse> {
    caller.require_admin()?;
    let ids = body.into_inner().ids.ok_or_else(|| missing_field_error("ids"))?;
    let deleted = state.command.delete_many(&ids).await?;
    Ok(ApiResponse::ok(json!({ "deleted": deleted }))
        .with_message(format!("{deleted} {} rows deleted", T::KIND))
        .into_response())
}

/// `POST /{collection}/{id}/archive` (admin): soft delete.
pub async fn archive<T: ContentEntity>(
    state: web::Data<ContentState<T>>,
    caller: AuthenticatedUser,
    id: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    caller.require_admin()?;
    let id = id.into_inner();
    state.command.archive(id).await?;
    Ok(ApiResponse::ok(json!({ "id": id }))
        .with_message(format!("{} archived", T::KIND))
        .into_response())
}

/// Mount every content route for `T` under `path`.
pub fn scope<T: ContentEntity>(path: &str, state: ContentState<T>) -> actix_web::Scope {
    web::scope(path)
        .app_data(web::Data::new(state))
        .route("", web::get().to(list::<T>))
        .route("", web::post().to(create::<T>))
        .route("/all", web::get().to(list_all::<T>))
        .route("/count", web::get().to(count::<T>))
        .route("/bulk", web::post().to(create_many::<T>))
        .route("/bulk-delete", web::post().to(delete_many::<T>))
        .route("/{id}", web::get().to(get::<T>))
        .route("/{id}", web::put().to(update::<T>))
        .route("/{id}", web::delete().to(delete::<T>))
        .route("/{id}/archive", web::post().to(archive::<T>))
}

#[cfg(test)]
#[path = "content_tests.rs"]
mod tests;
