//! Translation management handlers.
//!
//! ```text
//! GET    /api/v1/localized-texts/reference/{referenceId}
//! POST   /api/v1/localized-texts/reference/{referenceId}                  admin
//! DELETE /api/v1/localized-texts/reference/{referenceId}/{languageCode}   admin
//! DELETE /api/v1/localized-texts/reference/{referenceId}                  admin
//! POST   /api/v1/localized-texts/create-reference                         admin
//! ```

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::CreateTextGroupRequest;
use crate::domain::{AuthenticatedUser, ReferenceId, TranslationInput};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::ApiResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{language_code, missing_field_error, reference_id};

/// Body of `POST /localized-texts/reference/{referenceId}`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpsertTranslationsRequest {
    /// Variants to write; required, blank entries are skipped.
    pub translations: Option<Vec<TranslationInput>>,
}

/// Body of `POST /localized-texts/create-reference`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReferenceRequest {
    /// Source-language (`pt`) text.
    #[schema(example = "Praia do Forte")]
    pub pt_text: Option<String>,
    /// Additional languages stored alongside the source text.
    #[serde(default)]
    pub translations: Vec<TranslationInput>,
}

/// Data of a successful `create-reference` call.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReferenceResponse {
    /// Id of the new text group.
    #[schema(value_type = i64, example = 1042)]
    pub reference_id: ReferenceId,
}

/// Every stored language of a text group as `{languageCode: text}`.
#[utoipa::path(
    get,
    path = "/api/v1/localized-texts/reference/{referenceId}",
    params(("referenceId" = i64, Path, description = "Text group reference id")),
    responses(
        (status = 200, description = "Language to text map; empty for unknown ids"),
        (status = 400, description = "Invalid reference id", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["localized-texts"],
    operation_id = "getTextGroup"
)]
#[get("/localized-texts/reference/{reference_id}")]
pub async fn get_text_group(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let reference = reference_id(path.into_inner())?;
    let group = state.texts.query.get_by_reference(reference).await?;
    Ok(ApiResponse::ok(group).into_response())
}

/// Insert or overwrite translations. Blank entries are skipped.
#[utoipa::path(
    post,
    path = "/api/v1/localized-texts/reference/{referenceId}",
    params(("referenceId" = i64, Path, description = "Text group reference id")),
    request_body = UpsertTranslationsRequest,
    responses(
        (status = 200, description = "Group as stored after the upsert"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Administrator required", body = ErrorSchema)
    ),
    tags = ["localized-texts"],
    operation_id = "upsertTranslations"
)]
#[post("/localized-texts/reference/{reference_id}")]
pub async fn upsert_translations(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<UpsertTranslationsRequest>,
) -> ApiResult<HttpResponse> {
    caller.require_admin()?;
    let reference = reference_id(path.into_inner())?;
    let translations = payload
        .into_inner()
        .translations
        .ok_or_else(|| missing_field_error("translations"))?;
    let group = state
        .texts
        .command
        .upsert_many(reference, translations)
        .await?;
    Ok(ApiResponse::ok(group)
        .with_message("translations saved")
        .into_response())
}

/// Remove one translation. The source language cannot be cleared.
#[utoipa::path(
    delete,
    path = "/api/v1/localized-texts/reference/{referenceId}/{languageCode}",
    params(
        ("referenceId" = i64, Path, description = "Text group reference id"),
        ("languageCode" = String, Path, description = "Language to clear")
    ),
    responses(
        (status = 200, description = "Translation removed"),
        (status = 400, description = "Invalid request or source language", body = ErrorSchema),
        (status = 403, description = "Administrator required", body = ErrorSchema),
        (status = 404, description = "No such translation", body = ErrorSchema)
    ),
    tags = ["localized-texts"],
    operation_id = "clearTranslation"
)]
#[delete("/localized-texts/reference/{reference_id}/{language_code}")]
pub async fn clear_translation(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<(i64, String)>,
) -> ApiResult<HttpResponse> {
    caller.require_admin()?;
    let (raw_reference, raw_language) = path.into_inner();
    let reference = reference_id(raw_reference)?;
    let language = language_code(&raw_language)?;
    state.texts.command.clear(reference, &language).await?;
    Ok(ApiResponse::ok(json!({
        "referenceId": reference,
        "languageCode": language,
    }))
    .with_message("translation removed")
    .into_response())
}

/// Remove every language of a group.
#[utoipa::path(
    delete,
    path = "/api/v1/localized-texts/reference/{referenceId}",
    params(("referenceId" = i64, Path, description = "Text group reference id")),
    responses(
        (status = 200, description = "Group removed"),
        (status = 403, description = "Administrator required", body = ErrorSchema),
        (status = 404, description = "No such group", body = ErrorSchema)
    ),
    tags = ["localized-texts"],
    operation_id = "deleteTextGroup"
)]
#[delete("/localized-texts/reference/{reference_id}")]
pub async fn delete_text_group(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    caller.require_admin()?;
    let reference = reference_id(path.into_inner())?;
    let removed = state.texts.command.delete_group(reference).await?;
    Ok(ApiResponse::ok(json!({ "referenceId": reference, "removed": removed }))
        .with_message("text group removed")
        .into_response())
}

/// Allocate a reference id and store the source text plus translations.
#[utoipa::path(
    post,
    path = "/api/v1/localized-texts/create-reference",
    request_body = CreateReferenceRequest,
    responses(
        (status = 201, description = "Reference created", body = CreateReferenceResponse),
        (status = 400, description = "Blank source text", body = ErrorSchema),
        (status = 403, description = "Administrator required", body = ErrorSchema),
        (status = 503, description = "No reference id could be reserved", body = ErrorSchema)
    ),
    tags = ["localized-texts"],
    operation_id = "createTextReference"
)]
#[post("/localized-texts/create-reference")]
pub async fn create_reference(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<CreateReferenceRequest>,
) -> ApiResult<HttpResponse> {
    caller.require_admin()?;
    let CreateReferenceRequest {
        pt_text,
        translations,
    } = payload.into_inner();
    let source_text = pt_text.ok_or_else(|| missing_field_error("ptText"))?;
    let reference_id = state
        .texts
        .command
        .create_group(CreateTextGroupRequest {
            source_text,
            translations,
        })
        .await?;
    Ok(ApiResponse::ok(CreateReferenceResponse { reference_id })
        .with_message("text reference created")
        .into_response_with(StatusCode::CREATED))
}

#[cfg(test)]
#[path = "localized_texts_tests.rs"]
mod tests;
