use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use deckbuilder_api::api::{create_router, AppState};
use deckbuilder_api::config::Config;
use deckbuilder_api::models::{
    AssociationStore, AssociationTable, Card, CardCatalog, CardId, TableSelector, TimeWindow,
};

const CARDS: [&str; 6] = ["Hulk", "Nightcrawler", "Wolverine", "Sunspot", "Mystique", "Zabu"];

fn ids() -> Vec<CardId> {
    CARDS.iter().map(|name| CardId::from(*name)).collect()
}

fn create_test_catalog() -> CardCatalog {
    CardCatalog::from_cards(vec![
        Card::new("Hulk", 6, 12, 0.02).with_cid(18),
        Card::new("Nightcrawler", 1, 2, 0.0).with_cid(7),
        Card::new("Wolverine", 2, 2, 0.1).with_cid(31),
        Card::new("Sunspot", 1, 0, 0.05).with_cid(44),
        Card::new("Mystique", 3, 0, 0.0).with_cid(52),
        Card::new("Zabu", 2, 2, 0.0).with_cid(60),
    ])
    .unwrap()
}

/// Window tables share one matrix; the last-7-days table favours Zabu
fn create_test_store() -> AssociationStore {
    let all_time = AssociationTable::new(
        ids(),
        ids(),
        vec![
            vec![0.0, 1.0, 2.0, 0.5, 3.0, 0.0],
            vec![1.0, 0.0, 4.0, 2.0, 1.0, 0.0],
            vec![2.0, 4.0, 0.0, 1.0, 0.5, 0.0],
            vec![0.5, 2.0, 1.0, 0.0, 0.0, 0.0],
            vec![3.0, 1.0, 0.5, 0.0, 0.0, 0.0],
            vec![-1.0, -1.0, -1.0, 0.0, 0.0, 0.0],
        ],
    )
    .unwrap();
    let last_7_days = AssociationTable::new(
        ids(),
        ids(),
        vec![
            vec![0.0, 1.0, 2.0, 0.5, 3.0, 0.0],
            vec![1.0, 0.0, 4.0, 2.0, 1.0, 0.0],
            vec![2.0, 4.0, 0.0, 1.0, 0.5, 0.0],
            vec![0.5, 2.0, 1.0, 0.0, 0.0, 0.0],
            vec![3.0, 1.0, 0.5, 0.0, 0.0, 0.0],
            vec![9.0, 9.0, 9.0, 0.0, 0.0, 0.0],
        ],
    )
    .unwrap();
    let winrate = AssociationTable::new(
        ids(),
        ids(),
        vec![
            vec![0.0, 0.1, 0.2, 0.0, 0.3, 0.0],
            vec![0.1, 0.0, 0.4, 0.2, 0.1, 0.0],
            vec![0.2, 0.4, 0.0, 0.1, 0.0, 0.0],
            vec![0.0, 0.2, 0.1, 0.0, 0.0, 0.0],
            vec![0.3, 0.1, 0.0, 0.0, 0.0, 0.0],
            vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
        ],
    )
    .unwrap();

    AssociationStore::new()
        .with_table(TableSelector::Window(TimeWindow::AllTime), all_time.clone())
        .with_table(TableSelector::Window(TimeWindow::Last7Days), last_7_days)
        .with_table(TableSelector::Window(TimeWindow::Last30Days), all_time)
        .with_table(TableSelector::WinrateWeighted, winrate)
}

fn create_test_server() -> TestServer {
    let state = AppState::new(create_test_catalog(), create_test_store(), &Config::default());
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

fn card_names(rows: &[Value]) -> Vec<&str> {
    rows.iter().map(|row| row["card"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["cards"], 6);
}

#[tokio::test]
async fn test_request_id_generated_and_propagated() {
    let server = create_test_server();

    let response = server.get("/health").await;
    assert!(!response.header("x-request-id").is_empty());

    let response = server
        .get("/health")
        .add_header(
            HeaderName::from_static("x-request-id"),
            HeaderValue::from_static("deck-session-7"),
        )
        .await;
    assert_eq!(response.header("x-request-id"), "deck-session-7");
}

#[tokio::test]
async fn test_list_and_get_cards() {
    let server = create_test_server();

    let response = server.get("/api/v1/cards").await;
    response.assert_status_ok();
    let cards: Vec<Value> = response.json();
    assert_eq!(cards.len(), 6);
    assert_eq!(cards[0]["id"], "Hulk");

    let response = server.get("/api/v1/cards/Wolverine").await;
    response.assert_status_ok();
    let card: Value = response.json();
    assert_eq!(card["cost"], 2);
    assert_eq!(card["cid"], 31);

    let response = server.get("/api/v1/cards/Thanos").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_association_column() {
    let server = create_test_server();

    let response = server.get("/api/v1/associations/all_time/Hulk").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["selector"], "all_time");
    let affinities = body["affinities"].as_array().unwrap();
    assert_eq!(affinities.len(), 6);
    assert_eq!(affinities[0]["card"], "Mystique");
    assert_eq!(affinities[0]["affinity"], 3.0);

    let response = server.get("/api/v1/associations/winrate/Hulk").await;
    response.assert_status_ok();

    let response = server.get("/api/v1/associations/last_90_days/Hulk").await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server.get("/api/v1/associations/all_time/Thanos").await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_recommend_window_policy() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "window": "All time",
            "policy": "window",
            "main_cards": ["Hulk", "Wolverine"]
        }))
        .await;

    response.assert_status_ok();
    let rows: Vec<Value> = response.json();
    // Nightcrawler 5, Mystique 3.5, Sunspot 1.5; Zabu is negative
    assert_eq!(card_names(&rows), vec!["Nightcrawler", "Mystique", "Sunspot"]);
    assert_eq!(rows[0]["score"], 5.0);
    assert_eq!(rows[0]["cost"], 1);
    assert_eq!(rows[0]["power"], 2);
}

#[tokio::test]
async fn test_recommend_time_window_changes_table() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "window": "last_7_days",
            "main_cards": ["Hulk", "Wolverine"]
        }))
        .await;

    response.assert_status_ok();
    let rows: Vec<Value> = response.json();
    assert_eq!(rows[0]["card"], "Zabu");
    assert_eq!(rows[0]["score"], 18.0);
}

#[tokio::test]
async fn test_recommend_numeric_window_code() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "window": 7,
            "main_cards": ["Hulk", "Wolverine"]
        }))
        .await;

    response.assert_status_ok();
    let rows: Vec<Value> = response.json();
    assert_eq!(rows[0]["card"], "Zabu");
    assert_eq!(rows[0]["score"], 18.0);
}

#[tokio::test]
async fn test_recommend_invalid_window() {
    let server = create_test_server();

    for window in [json!("last_90_days"), json!(90)] {
        let response = server
            .post("/api/v1/recommendations")
            .json(&json!({
                "window": window,
                "main_cards": ["Hulk"]
            }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["error"].is_string());
    }

    let response = server
        .post("/api/v1/recommendations/tiers")
        .json(&json!({
            "window": "Last 90 days",
            "main_cards": ["Hulk"]
        }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommend_respects_owned_cards_and_limit() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "window": "-1",
            "main_cards": ["Hulk", "Wolverine"],
            "owned_cids": [18, 31, 52, 44],
            "limit": 1
        }))
        .await;

    response.assert_status_ok();
    let rows: Vec<Value> = response.json();
    assert_eq!(card_names(&rows), vec!["Mystique"]);
}

#[tokio::test]
async fn test_recommend_winrate_coefficient() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "main_cards": ["Hulk", "Wolverine"],
            "owned_cards": ["Sunspot"],
            "winrate_coefficient": 2
        }))
        .await;

    response.assert_status_ok();
    let rows: Vec<Value> = response.json();
    let score = rows[0]["score"].as_f64().unwrap();
    assert!((score - 1.5 * 2.0 * 1.05).abs() < 1e-9);
}

#[tokio::test]
async fn test_recommend_aggregate_policy_empty_selection() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "policy": "aggregate_winrate",
            "main_cards": []
        }))
        .await;

    response.assert_status_ok();
    let rows: Vec<Value> = response.json();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_recommend_unknown_main_card() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "main_cards": ["Hulk", "Thanos"]
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Thanos"));
}

#[tokio::test]
async fn test_recommend_rejects_duplicate_main_cards() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations")
        .json(&json!({
            "main_cards": ["Hulk", "Hulk"]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_recommend_tiers() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/recommendations/tiers")
        .json(&json!({
            "main_cards": ["Hulk", "Wolverine"]
        }))
        .await;

    response.assert_status_ok();
    let tiers: Value = response.json();
    let low = tiers["low"].as_array().unwrap();
    let mid = tiers["mid"].as_array().unwrap();
    let high = tiers["high"].as_array().unwrap();
    assert_eq!(card_names(low), vec!["Nightcrawler", "Sunspot"]);
    assert_eq!(card_names(mid), vec!["Mystique"]);
    assert!(high.is_empty());
}

#[tokio::test]
async fn test_deck_status() {
    let server = create_test_server();

    let response = server
        .post("/api/v1/deck/status")
        .json(&json!({
            "cards": ["Hulk", "Wolverine", "Thanos"]
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["cards"], 3);
    assert_eq!(body["status"], "incomplete");
    assert_eq!(body["missing"], 9);
    assert_eq!(body["unknown_cards"], json!(["Thanos"]));
}
