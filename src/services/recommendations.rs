use crate::{
    error::{AppError, AppResult},
    models::{
        AssociationStore, CardCatalog, CostTier, Inventory, MainSelection, RecommendationRow,
        ScoringPolicy, TieredRecommendations, TimeWindow,
    },
    services::scorer::Scorer,
};

/// Inputs of a single recommendation run
#[derive(Debug, Clone)]
pub struct RecommendationQuery {
    pub window: TimeWindow,
    pub policy: ScoringPolicy,
    pub inventory: Inventory,
    pub main: MainSelection,
    /// Weight of each card's baseline win-rate; 0 disables rescaling
    pub winrate_coefficient: f64,
}

/// Applies the win-rate boost to a raw score.
///
/// A coefficient of 0 leaves the score untouched.
pub fn rescale(score: f64, coefficient: f64, baseline_winrate: f64) -> f64 {
    if coefficient > 0.0 {
        score * coefficient * (1.0 + baseline_winrate)
    } else {
        score
    }
}

/// Splits ranked rows into cost tiers, keeping the best `per_tier` rows of each
pub fn bucket_by_cost_tier(rows: Vec<RecommendationRow>, per_tier: usize) -> TieredRecommendations {
    let mut tiers = TieredRecommendations::default();
    for row in rows {
        let tier = tiers.tier_mut(CostTier::of(row.cost));
        if tier.len() < per_tier {
            tier.push(row);
        }
    }
    tiers
}

/// Ranks the cards a player should add to a deck
pub struct Recommender<'a> {
    catalog: &'a CardCatalog,
    store: &'a AssociationStore,
}

impl<'a> Recommender<'a> {
    pub fn new(catalog: &'a CardCatalog, store: &'a AssociationStore) -> Self {
        Self { catalog, store }
    }

    /// Ranked recommendations, truncated to `limit` rows when given.
    ///
    /// Rows are sorted by score descending; equal scores are ordered by
    /// ascending card identifier.
    #[tracing::instrument(
        skip_all,
        fields(
            window = %query.window,
            policy = ?query.policy,
            main_cards = query.main.len(),
            inventory = query.inventory.len(),
        )
    )]
    pub fn recommend(
        &self,
        query: &RecommendationQuery,
        limit: Option<usize>,
    ) -> AppResult<Vec<RecommendationRow>> {
        if !query.winrate_coefficient.is_finite() || query.winrate_coefficient < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "winrate coefficient must be a non-negative number, got {}",
                query.winrate_coefficient
            )));
        }

        let scores = Scorer::new(self.catalog, self.store).score(
            &query.main,
            query.window,
            query.policy,
        )?;
        let candidates = scores.len();

        let mut rows: Vec<RecommendationRow> = scores
            .into_iter()
            .filter(|(id, _)| query.inventory.contains(id))
            .filter_map(|(id, score)| match self.catalog.get(id.as_str()) {
                Some(card) => Some((card, score)),
                None => {
                    tracing::debug!(card = %id, "Dropping candidate without catalog entry");
                    None
                }
            })
            .map(|(card, score)| {
                let score = rescale(score, query.winrate_coefficient, card.winrate);
                RecommendationRow::new(card, score)
            })
            .filter(|row| !query.main.contains(&row.card) && row.score > 0.0)
            .collect();

        rows.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.card.cmp(&b.card))
        });

        if let Some(limit) = limit {
            rows.truncate(limit);
        }

        tracing::info!(
            candidates,
            recommended = rows.len(),
            "Recommendations computed"
        );

        Ok(rows)
    }

    /// Uncapped ranking bucketed by cost tier
    pub fn recommend_tiers(
        &self,
        query: &RecommendationQuery,
        per_tier: usize,
    ) -> AppResult<TieredRecommendations> {
        let rows = self.recommend(query, None)?;
        Ok(bucket_by_cost_tier(rows, per_tier))
    }
}
