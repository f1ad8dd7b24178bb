//! Success envelope shared by every JSON endpoint.
//!
//! ```text
//! {"success": true, "data": ..., "message"?: "...", "pagination"?: {...}}
//! ```
//!
//! Failures use the error envelope produced by [`super::error`].

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use pagination::{PageMeta, Paginated};
use serde::Serialize;

/// Body of every successful response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// Always `true`; failures use the error envelope.
    pub success: bool,
    /// Payload.
    pub data: T,
    /// Short human-readable note on writes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Totals of a paginated list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageMeta>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Success envelope around `data`.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
            pagination: None,
        }
    }

    /// Attach a message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Serialise with `200 OK`.
    pub fn into_response(self) -> HttpResponse {
        self.into_response_with(StatusCode::OK)
    }

    /// Serialise with an explicit status such as `201 Created`.
    pub fn into_response_with(self, status: StatusCode) -> HttpResponse {
        HttpResponse::build(status).json(self)
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// Items as `data`, page totals as `pagination`.
    pub fn page(page: Paginated<T>) -> Self {
        let (items, meta) = page.into_parts();
        Self {
            success: true,
            data: items,
            message: None,
            pagination: Some(meta),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Envelope serialisation.
    use super::*;
    use pagination::PageRequest;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn omits_absent_message_and_pagination() {
        let body = serde_json::to_value(ApiResponse::ok(json!({"id": 1}))).expect("serialise");
        assert_eq!(body, json!({"success": true, "data": {"id": 1}}));
    }

    #[rstest]
    fn page_moves_totals_into_pagination() {
        let request = PageRequest::new(3, 10).expect("valid request");
        let page = Paginated::from_slice_window((1..=25).collect::<Vec<u32>>(), &request);

        let body = serde_json::to_value(ApiResponse::page(page).with_message("ok"))
            .expect("serialise");

        assert_eq!(
            body,
            json!({
                "success": true,
                "data": [21, 22, 23, 24, 25],
                "message": "ok",
                "pagination": {
                    "total": 25,
                    "page": 3,
                    "limit": 10,
                    "totalPages": 3,
                    "hasNext": false,
                    "hasPrev": true,
                },
            })
        );
    }
}
