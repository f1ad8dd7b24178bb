//! Handler tests for translation management routes.

use actix_web::http::StatusCode;
use actix_web::{App, test};
use rstest::rstest;
use serde_json::{Value, json};

use crate::inbound::http::api::api_scope;
use crate::inbound::http::test_utils::{as_admin, as_user, memory_state};

macro_rules! call_json {
    ($app:expr, $req:expr) => {{
        let res = test::call_service(&$app, $req.to_request()).await;
        let status = res.status();
        let body: Value = test::read_body_json(res).await;
        (status, body)
    }};
}

macro_rules! create_reference {
    ($app:expr, $body:expr) => {{
        let (status, created) = call_json!(
            $app,
            as_admin(test::TestRequest::post().uri("/api/v1/localized-texts/create-reference"))
                .set_json($body)
        );
        assert_eq!(status, StatusCode::CREATED);
        created["data"]["referenceId"]
            .as_i64()
            .expect("reference id")
    }};
}

#[rstest]
#[actix_web::test]
async fn created_group_reads_back_every_language() {
    let app = test::init_service(App::new().service(api_scope(&memory_state()))).await;
    let reference = create_reference!(
        app,
        json!({
            "ptText": "Praia do Forte",
            "translations": [
                {"languageCode": "en", "textContent": "Forte Beach"},
                {"languageCode": "es", "textContent": "   "}
            ]
        })
    );

    let (status, group) = call_json!(
        app,
        test::TestRequest::get().uri(&format!("/api/v1/localized-texts/reference/{reference}"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(group["data"], json!({"en": "Forte Beach", "pt": "Praia do Forte"}));
}

#[rstest]
#[actix_web::test]
async fn successive_references_are_distinct() {
    let app = test::init_service(App::new().service(api_scope(&memory_state()))).await;
    let first = create_reference!(app, json!({"ptText": "Pelourinho"}));
    let second = create_reference!(app, json!({"ptText": "Farol da Barra"}));
    assert_ne!(first, second);
}

#[rstest]
#[case(json!({"ptText": "  "}), "ptText")]
#[case(json!({"translations": []}), "ptText")]
#[actix_web::test]
async fn create_reference_requires_source_text(#[case] body: Value, #[case] field: &str) {
    let app = test::init_service(App::new().service(api_scope(&memory_state()))).await;
    let (status, error) = call_json!(
        app,
        as_admin(test::TestRequest::post().uri("/api/v1/localized-texts/create-reference"))
            .set_json(body)
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn upsert_overwrites_and_clear_removes_translations() {
    let app = test::init_service(App::new().service(api_scope(&memory_state()))).await;
    let reference = create_reference!(app, json!({"ptText": "Farol da Barra"}));
    let group_uri = format!("/api/v1/localized-texts/reference/{reference}");

    let (status, saved) = call_json!(
        app,
        as_admin(test::TestRequest::post().uri(&group_uri)).set_json(json!({
            "translations": [
                {"languageCode": "en", "textContent": "Barra Lighthouse"},
                {"languageCode": "fr", "textContent": ""}
            ]
        }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        saved["data"],
        json!({"en": "Barra Lighthouse", "pt": "Farol da Barra"})
    );

    let (status, _) = call_json!(
        app,
        as_admin(test::TestRequest::delete().uri(&format!("{group_uri}/en")))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call_json!(
        app,
        as_admin(test::TestRequest::delete().uri(&format!("{group_uri}/en")))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, error) = call_json!(
        app,
        as_admin(test::TestRequest::delete().uri(&format!("{group_uri}/pt")))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"]["code"], "source_language");
}

#[rstest]
#[actix_web::test]
async fn delete_group_removes_all_languages() {
    let app = test::init_service(App::new().service(api_scope(&memory_state()))).await;
    let reference = create_reference!(
        app,
        json!({
            "ptText": "Elevador Lacerda",
            "translations": [{"languageCode": "en", "textContent": "Lacerda Elevator"}]
        })
    );
    let group_uri = format!("/api/v1/localized-texts/reference/{reference}");

    let (status, removed) = call_json!(app, as_admin(test::TestRequest::delete().uri(&group_uri)));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["data"]["removed"], 2);

    let (_, group) = call_json!(app, test::TestRequest::get().uri(&group_uri));
    assert_eq!(group["data"], json!({}));

    let (status, _) = call_json!(app, as_admin(test::TestRequest::delete().uri(&group_uri)));
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn writes_require_an_administrator() {
    let app = test::init_service(App::new().service(api_scope(&memory_state()))).await;
    let (status, _) = call_json!(
        app,
        as_user(
            test::TestRequest::post().uri("/api/v1/localized-texts/create-reference"),
            7
        )
        .set_json(json!({"ptText": "Mercado Modelo"}))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[rstest]
#[case("/api/v1/localized-texts/reference/0")]
#[case("/api/v1/localized-texts/reference/-3")]
#[actix_web::test]
async fn non_positive_references_are_rejected(#[case] uri: &str) {
    let app = test::init_service(App::new().service(api_scope(&memory_state()))).await;
    let (status, error) = call_json!(app, test::TestRequest::get().uri(uri));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["details"]["field"], "referenceId");
}
