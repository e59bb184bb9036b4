use serde::{Deserialize, Serialize};

use super::{Card, CardId, TableSelector, TimeWindow};

/// How raw affinities are combined across the main selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// Sum of affinities from the table of the selected time window
    #[default]
    Window,
    /// Mean of affinities from the win-rate-weighted table, whatever the window
    AggregateWinrate,
}

impl ScoringPolicy {
    pub fn table_selector(&self, window: TimeWindow) -> TableSelector {
        match self {
            ScoringPolicy::Window => TableSelector::Window(window),
            ScoringPolicy::AggregateWinrate => TableSelector::WinrateWeighted,
        }
    }
}

/// A single recommended card with its final score
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationRow {
    pub card: CardId,
    pub score: f64,
    pub cost: u32,
    pub power: u32,
}

impl RecommendationRow {
    pub fn new(card: &Card, score: f64) -> Self {
        Self {
            card: card.id.clone(),
            score,
            cost: card.cost,
            power: card.power,
        }
    }
}

/// Energy cost bracket used to present recommendations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostTier {
    Low,
    Mid,
    High,
}

impl CostTier {
    pub fn of(cost: u32) -> Self {
        match cost {
            0..=2 => CostTier::Low,
            3..=4 => CostTier::Mid,
            _ => CostTier::High,
        }
    }
}

/// Recommendations split by cost tier, each tier in ranking order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TieredRecommendations {
    pub low: Vec<RecommendationRow>,
    pub mid: Vec<RecommendationRow>,
    pub high: Vec<RecommendationRow>,
}

impl TieredRecommendations {
    pub fn tier(&self, tier: CostTier) -> &[RecommendationRow] {
        match tier {
            CostTier::Low => &self.low,
            CostTier::Mid => &self.mid,
            CostTier::High => &self.high,
        }
    }

    pub(crate) fn tier_mut(&mut self, tier: CostTier) -> &mut Vec<RecommendationRow> {
        match tier {
            CostTier::Low => &mut self.low,
            CostTier::Mid => &mut self.mid,
            CostTier::High => &mut self.high,
        }
    }

    pub fn len(&self) -> usize {
        self.low.len() + self.mid.len() + self.high.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
