//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the translation endpoints, health probes and the
//! shared envelope schemas. Content and membership endpoints are generic over
//! the content kind, so they are described in the README route table rather
//! than per-kind path items.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{ErrorCode, TranslationInput};
use crate::inbound::http::auth::USER_ID_HEADER;
use crate::inbound::http::localized_texts::{
    CreateReferenceRequest, CreateReferenceResponse, UpsertTranslationsRequest,
};
use crate::inbound::http::schemas::{ErrorSchema, PageMetaSchema};

/// Adds the caller identity header as the security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "UserHeader",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                USER_ID_HEADER,
                "Caller id set by the authenticating gateway; `x-user-admin: true` grants writes.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Tourism content API",
        description = "Localized tourism content, translations and per-user favourites."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("UserHeader" = [])),
    paths(
        crate::inbound::http::localized_texts::get_text_group,
        crate::inbound::http::localized_texts::upsert_translations,
        crate::inbound::http::localized_texts::clear_translation,
        crate::inbound::http::localized_texts::delete_text_group,
        crate::inbound::http::localized_texts::create_reference,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCode,
        PageMetaSchema,
        TranslationInput,
        UpsertTranslationsRequest,
        CreateReferenceRequest,
        CreateReferenceResponse
    )),
    tags(
        (name = "localized-texts", description = "Translation groups behind every text field"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn schema_fields(name: &str) -> Vec<String> {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        match schemas.get(name).expect("schema registered") {
            RefOr::T(Schema::Object(obj)) => obj.properties.keys().cloned().collect(),
            _ => panic!("expected Object schema for {name}"),
        }
    }

    #[rstest]
    #[case("ErrorSchema", &["success", "code", "message", "details", "traceId"])]
    #[case("pagination.PageMeta", &["total", "page", "limit", "totalPages", "hasNext", "hasPrev"])]
    #[case("TranslationInput", &["languageCode", "textContent"])]
    #[case("CreateReferenceRequest", &["ptText", "translations"])]
    fn schemas_use_wire_field_names(#[case] name: &str, #[case] expected: &[&str]) {
        let fields = schema_fields(name);
        for field in expected {
            assert!(
                fields.iter().any(|f| f == field),
                "{name} should have field '{field}', got {fields:?}"
            );
        }
    }

    #[rstest]
    fn translation_paths_are_registered() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/localized-texts/reference/{referenceId}",
            "/api/v1/localized-texts/create-reference",
            "/health/ready",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
    }

    #[rstest]
    fn security_scheme_names_the_user_header() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("UserHeader"));
    }
}
