use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{
    Card, CardCatalog, CardId, DeckStatus, MainSelection, RecommendationRow, ScoringPolicy,
    TableSelector, TieredRecommendations, TimeWindow,
};
use crate::services::{resolve_inventory, RecommendationQuery, Recommender};

use super::AppState;

// Request/Response types

/// Time window as sent by clients: a name, a display label or a day code
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WindowParam {
    Code(i64),
    Name(String),
}

impl WindowParam {
    fn parse(&self) -> AppResult<TimeWindow> {
        match self {
            WindowParam::Code(code) => code.to_string().parse(),
            WindowParam::Name(name) => name.parse(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    /// Defaults to all time when omitted
    pub window: Option<WindowParam>,
    #[serde(default)]
    pub policy: ScoringPolicy,
    #[serde(default)]
    pub main_cards: Vec<CardId>,
    /// Owned card ids; omit together with `owned_cids` when the collection is unknown
    pub owned_cards: Option<Vec<CardId>>,
    /// Owned cards as collection-page numeric ids
    pub owned_cids: Option<Vec<u32>>,
    #[serde(default)]
    pub winrate_coefficient: f64,
    pub limit: Option<usize>,
}

impl RecommendRequest {
    fn into_query(self, catalog: &CardCatalog) -> AppResult<RecommendationQuery> {
        let inventory = resolve_inventory(
            catalog,
            self.owned_cards.as_deref(),
            self.owned_cids.as_deref(),
        );

        let window = match &self.window {
            Some(param) => param.parse()?,
            None => TimeWindow::default(),
        };

        Ok(RecommendationQuery {
            window,
            policy: self.policy,
            inventory,
            main: MainSelection::new(self.main_cards)?,
            winrate_coefficient: self.winrate_coefficient,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub cards: usize,
    pub loaded_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct AffinityEntry {
    pub card: CardId,
    pub affinity: f64,
}

#[derive(Debug, Serialize)]
pub struct AssociationResponse {
    pub selector: String,
    pub card: CardId,
    pub affinities: Vec<AffinityEntry>,
}

#[derive(Debug, Deserialize)]
pub struct DeckRequest {
    pub cards: Vec<CardId>,
}

#[derive(Debug, Serialize)]
pub struct DeckResponse {
    pub cards: usize,
    #[serde(flatten)]
    pub status: DeckStatus,
    /// Cards missing from the catalog
    pub unknown_cards: Vec<CardId>,
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        cards: state.catalog.len(),
        loaded_at: state.loaded_at,
    })
}

/// List the catalog, sorted by card id
pub async fn list_cards(State(state): State<AppState>) -> Json<Vec<Card>> {
    Json(state.catalog.sorted().into_iter().cloned().collect())
}

/// Get a single card
pub async fn get_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
) -> AppResult<Json<Card>> {
    state.catalog.lookup(&card_id).cloned().map(Json)
}

/// Affinity of every candidate with one card, strongest first
pub async fn get_associations(
    State(state): State<AppState>,
    Path((selector, card_id)): Path<(String, String)>,
) -> AppResult<Json<AssociationResponse>> {
    let selector: TableSelector = selector.parse()?;
    let table = state.store.table(selector)?;
    let column = table
        .affinity_column(&card_id)
        .ok_or_else(|| AppError::UnknownCard(card_id.clone()))?;

    let mut affinities: Vec<AffinityEntry> = column
        .into_iter()
        .map(|(card, affinity)| AffinityEntry {
            card: card.clone(),
            affinity,
        })
        .collect();
    affinities.sort_by(|a, b| {
        b.affinity
            .total_cmp(&a.affinity)
            .then_with(|| a.card.cmp(&b.card))
    });

    Ok(Json(AssociationResponse {
        selector: selector.to_string(),
        card: CardId::from(card_id),
        affinities,
    }))
}

/// Ranked recommendations, capped to the request limit or the configured default
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Json<Vec<RecommendationRow>>> {
    tracing::info!(
        request_id = %request_id,
        window = ?request.window,
        main_cards = request.main_cards.len(),
        "Processing recommendation request"
    );

    let limit = request.limit.unwrap_or(state.recommendation_limit);
    let query = request.into_query(&state.catalog)?;
    let rows = Recommender::new(&state.catalog, &state.store).recommend(&query, Some(limit))?;

    Ok(Json(rows))
}

/// Recommendations bucketed by cost tier
pub async fn recommend_tiers(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Json<TieredRecommendations>> {
    tracing::info!(
        request_id = %request_id,
        window = ?request.window,
        main_cards = request.main_cards.len(),
        "Processing tiered recommendation request"
    );

    let query = request.into_query(&state.catalog)?;
    let tiers =
        Recommender::new(&state.catalog, &state.store).recommend_tiers(&query, state.tier_size)?;

    Ok(Json(tiers))
}

/// Completeness of a deck under construction
pub async fn deck_status(
    State(state): State<AppState>,
    Json(request): Json<DeckRequest>,
) -> Json<DeckResponse> {
    let unknown_cards = request
        .cards
        .iter()
        .filter(|id| !state.catalog.contains(id.as_str()))
        .cloned()
        .collect();

    Json(DeckResponse {
        cards: request.cards.len(),
        status: DeckStatus::of(request.cards.len()),
        unknown_cards,
    })
}
