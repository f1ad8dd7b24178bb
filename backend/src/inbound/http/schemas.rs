//! OpenAPI schema wrappers for payloads that are not `ToSchema` themselves.
//!
//! The failure envelope is produced by hand in [`super::error`], so its
//! documented shape lives here.

use utoipa::ToSchema;

/// OpenAPI schema for the failure envelope.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Always `false`.
    success: bool,
    /// Stable machine-readable error code.
    code: crate::domain::ErrorCode,
    /// Human-readable message returned to clients.
    #[schema(example = "city 4 not found")]
    message: String,
    /// Structured context such as the offending field.
    #[schema(value_type = Option<Object>)]
    details: Option<serde_json::Value>,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    #[schema(rename = "traceId")]
    trace_id: Option<String>,
}

/// OpenAPI schema for pagination metadata.
#[derive(ToSchema)]
#[schema(as = pagination::PageMeta)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PageMetaSchema {
    total: u64,
    page: u32,
    limit: u32,
    #[schema(rename = "totalPages")]
    total_pages: u64,
    #[schema(rename = "hasNext")]
    has_next: bool,
    #[schema(rename = "hasPrev")]
    has_prev: bool,
}
