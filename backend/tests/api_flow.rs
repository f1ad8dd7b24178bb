//! End-to-end flows through the assembled application over in-memory
//! adapters: trace headers, default language, translations, content and
//! memberships.

use actix_web::http::StatusCode;
use actix_web::{test, web};
use rstest::rstest;
use serde_json::{Value, json};

use tourism_backend::domain::{DEFAULT_ALLOCATION_ATTEMPTS, LanguageCode, TRACE_ID_HEADER};
use tourism_backend::inbound::http::auth::{USER_ADMIN_HEADER, USER_ID_HEADER};
use tourism_backend::inbound::http::health::HealthState;
use tourism_backend::inbound::http::language::LANGUAGE_HEADER;
use tourism_backend::server::{AppDependencies, Repositories, build_app, build_http_state};

fn dependencies(default_language: &str) -> AppDependencies {
    let language = LanguageCode::new(default_language).expect("valid language");
    AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: build_http_state(&Repositories::in_memory(), DEFAULT_ALLOCATION_ATTEMPTS),
        default_language: language,
    }
}

fn admin(req: test::TestRequest) -> test::TestRequest {
    req.insert_header((USER_ID_HEADER, "1"))
        .insert_header((USER_ADMIN_HEADER, "true"))
}

macro_rules! call_json {
    ($app:expr, $req:expr) => {{
        let res = test::call_service(&$app, $req.to_request()).await;
        let status = res.status();
        let body: Value = test::read_body_json(res).await;
        (status, body)
    }};
}

#[rstest]
#[actix_web::test]
async fn errors_carry_the_trace_header_and_body_id() {
    let app = test::init_service(build_app(dependencies("pt"))).await;

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/cities/42").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let header = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace header");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["traceId"].as_str(), Some(header.as_str()));
}

#[rstest]
#[actix_web::test]
async fn server_default_language_applies_without_a_header() {
    let app = test::init_service(build_app(dependencies("en"))).await;

    let (_, created) = call_json!(
        app,
        admin(test::TestRequest::post().uri("/api/v1/localized-texts/create-reference")).set_json(
            json!({
                "ptText": "Igreja do Bonfim",
                "translations": [{"languageCode": "en", "textContent": "Bonfim Church"}]
            })
        )
    );
    let reference = created["data"]["referenceId"].clone();

    let (status, _) = call_json!(
        app,
        admin(test::TestRequest::post().uri("/api/v1/cities"))
            .set_json(json!({"nameTextRefId": reference}))
    );
    assert_eq!(status, StatusCode::CREATED);

    let (_, default) = call_json!(app, test::TestRequest::get().uri("/api/v1/cities/1"));
    assert_eq!(default["data"]["name"], "Bonfim Church");

    let (_, portuguese) = call_json!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/cities/1")
            .insert_header((LANGUAGE_HEADER, "pt"))
    );
    assert_eq!(portuguese["data"]["name"], "Igreja do Bonfim");
}

#[rstest]
#[case(None)]
#[case(Some("es"))]
#[actix_web::test]
async fn source_text_backs_up_a_non_source_default(#[case] requested: Option<&str>) {
    let app = test::init_service(build_app(dependencies("en"))).await;

    let (_, created) = call_json!(
        app,
        admin(test::TestRequest::post().uri("/api/v1/localized-texts/create-reference"))
            .set_json(json!({"ptText": "Salvador"}))
    );
    let reference = created["data"]["referenceId"].clone();
    let (status, _) = call_json!(
        app,
        admin(test::TestRequest::post().uri("/api/v1/cities"))
            .set_json(json!({"nameTextRefId": reference}))
    );
    assert_eq!(status, StatusCode::CREATED);

    let mut read = test::TestRequest::get().uri("/api/v1/cities/1");
    if let Some(language) = requested {
        read = read.insert_header((LANGUAGE_HEADER, language));
    }
    let (status, city) = call_json!(app, read);
    assert_eq!(status, StatusCode::OK);
    assert_eq!(city["data"]["name"], "Salvador");
}

#[rstest]
#[actix_web::test]
async fn invalid_language_header_is_rejected() {
    let app = test::init_service(build_app(dependencies("pt"))).await;
    let (status, body) = call_json!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/cities")
            .insert_header((LANGUAGE_HEADER, "not a language"))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], LANGUAGE_HEADER);
}

#[rstest]
#[actix_web::test]
async fn malformed_json_uses_the_failure_envelope() {
    let app = test::init_service(build_app(dependencies("pt"))).await;
    let (status, body) = call_json!(
        app,
        admin(test::TestRequest::post().uri("/api/v1/cities"))
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"nameTextRefId\":")
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn routes_filter_by_city_and_favorites_follow_archival() {
    let app = test::init_service(build_app(dependencies("pt"))).await;
    let (status, _) = call_json!(
        app,
        admin(test::TestRequest::post().uri("/api/v1/cities/bulk"))
            .set_json(json!([{"nameTextRefId": 1}, {"nameTextRefId": 2}]))
    );
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = call_json!(
        app,
        admin(test::TestRequest::post().uri("/api/v1/routes/bulk")).set_json(json!([
            {"cityId": 1, "titleTextRefId": 3, "distanceKm": 4.5},
            {"cityId": 2, "titleTextRefId": 4},
            {"cityId": 1, "titleTextRefId": 5, "distanceKm": 1.2}
        ]))
    );
    assert_eq!(status, StatusCode::CREATED);

    let (_, in_city_one) = call_json!(
        app,
        test::TestRequest::get().uri("/api/v1/routes?cityId=1&sortBy=distanceKm&sortOrder=asc")
    );
    let ids: Vec<i64> = in_city_one["data"]
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|route| route["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![3, 1]);
    assert_eq!(in_city_one["pagination"]["total"], 2);

    let (status, _) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/users/5/favorite-routes")
            .insert_header((USER_ID_HEADER, "5"))
            .set_json(json!({"routeId": 1}))
    );
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = call_json!(
        app,
        admin(test::TestRequest::post().uri("/api/v1/routes/1/archive"))
    );
    assert_eq!(status, StatusCode::OK);

    let (_, favorites) = call_json!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/users/5/favorite-routes")
            .insert_header((USER_ID_HEADER, "5"))
    );
    assert_eq!(favorites["data"], json!([]));
}

#[rstest]
#[actix_web::test]
async fn health_probes_are_mounted_at_the_root() {
    let deps = dependencies("pt");
    let health = deps.health_state.clone();
    let app = test::init_service(build_app(deps)).await;

    let res = test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request()).await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    health.mark_ready();
    let res = test::call_service(&app, test::TestRequest::get().uri("/health/ready").to_request()).await;
    assert_eq!(res.status(), StatusCode::OK);
}
