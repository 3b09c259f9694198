use lessoncraft_catalog_client::ClientConfig;
use lessoncraft_catalog_client::HttpCatalogClient;
use lessoncraft_catalog_filter::CatalogSearch;
use lessoncraft_catalog_filter::FacetId;
use lessoncraft_catalog_filter::FilterPatch;
use lessoncraft_catalog_filter::FilterState;
use lessoncraft_catalog_filter::QueryParams;
use lessoncraft_catalog_filter::SearchError;
use lessoncraft_catalog_filter::compile_query;
use lessoncraft_catalog_protocol::BloomLevel;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;
use wiremock::matchers::query_param;
use wiremock::matchers::query_param_is_missing;

fn card_json(id: u64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description_html": "",
        "duration_min": 10,
        "status": "public",
        "card_kind": "technique",
        "activity_type": "active",
        "bloom_level": "apply",
        "age_a1": true,
        "stage_core": true,
    })
}

fn client(server: &MockServer) -> HttpCatalogClient {
    HttpCatalogClient::new(&ClientConfig {
        base_url: format!("{}/api", server.uri()),
        ..ClientConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn accepts_bare_list_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cards/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([card_json(1, "Brainstorm"), card_json(2, "Quiz")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let cards = client(&server).search(&QueryParams::new()).await.unwrap();
    let titles: Vec<&str> = cards.iter().map(|card| card.title.as_str()).collect();
    assert_eq!(titles, vec!["Brainstorm", "Quiz"]);
    assert_eq!(cards[0].bloom_level, BloomLevel::Apply);
}

#[tokio::test]
async fn accepts_paginated_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cards/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "next": null,
            "previous": null,
            "results": [card_json(5, "Gallery walk")],
        })))
        .mount(&server)
        .await;

    let cards = client(&server).search(&QueryParams::new()).await.unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].id, 5);
}

#[tokio::test]
async fn forwards_compiled_params_as_query_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cards/"))
        .and(query_param("q", "role play"))
        .and(query_param("bloom_level", "apply,create"))
        .and(query_param("logic_bloom", "any"))
        .and(query_param("mode", "simple"))
        .and(query_param("duration_max", "15"))
        .and(query_param_is_missing("activity_type"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let state = FilterState::default().apply_patch(
        &FilterPatch::new()
            .text(" role play ")
            .select(FacetId::Bloom, ["apply", "create"])
            .select(FacetId::MethodType, ["aux"])
            .duration_max(Some(15)),
    );
    let cards = client(&server).search(&compile_query(&state)).await.unwrap();
    assert!(cards.is_empty());
}

#[tokio::test]
async fn error_status_carries_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cards/"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = client(&server)
        .search(&QueryParams::new())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        SearchError::Status {
            status: 503,
            body: "maintenance".to_string(),
        }
    );
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cards/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server)
        .search(&QueryParams::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::Decode(_)), "{err:?}");
}

#[tokio::test]
async fn fetches_single_card() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cards/42/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(card_json(42, "Jigsaw")))
        .mount(&server)
        .await;

    let card = client(&server).get_card(42).await.unwrap();
    assert_eq!(card.id, 42);
    assert_eq!(card.title, "Jigsaw");
    assert!(card.age_a1);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let client = HttpCatalogClient::new(&ClientConfig {
        base_url: format!("http://127.0.0.1:{port}/api"),
        ..ClientConfig::default()
    })
    .unwrap();

    let err = client.search(&QueryParams::new()).await.unwrap_err();
    assert!(matches!(err, SearchError::Transport(_)), "{err:?}");
}
