use serde::{Deserialize, Serialize};
use std::{
    borrow::Borrow,
    collections::{BTreeSet, HashMap},
    fmt::Display,
};

use crate::error::{AppError, AppResult};

/// Identifier of a card in the catalog (e.g., "Hulk", "MisterSinister")
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for CardId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Static reference data for a single card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    pub id: CardId,
    pub cost: u32,
    pub power: u32,
    /// Baseline win-rate coefficient used to boost scores
    pub winrate: f64,
    /// Numeric id used by collection pages to reference the card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<u32>,
}

impl Card {
    pub fn new(id: impl Into<CardId>, cost: u32, power: u32, winrate: f64) -> Self {
        Self {
            id: id.into(),
            cost,
            power,
            winrate,
            cid: None,
        }
    }

    pub fn with_cid(mut self, cid: u32) -> Self {
        self.cid = Some(cid);
        self
    }
}

/// Read-only card catalog, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct CardCatalog {
    cards: HashMap<CardId, Card>,
    /// Several cards may share a collection id
    by_cid: HashMap<u32, Vec<CardId>>,
}

impl CardCatalog {
    /// Builds a catalog, rejecting duplicate identifiers
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> AppResult<Self> {
        let mut catalog = Self::default();

        for card in cards {
            if catalog.cards.contains_key(&card.id) {
                return Err(AppError::DataLoad(format!(
                    "duplicate card identifier in catalog: {}",
                    card.id
                )));
            }
            if let Some(cid) = card.cid {
                catalog.by_cid.entry(cid).or_default().push(card.id.clone());
            }
            catalog.cards.insert(card.id.clone(), card);
        }

        Ok(catalog)
    }

    /// Looks up a card, failing with `NotFound` if absent
    pub fn lookup(&self, id: &str) -> AppResult<&Card> {
        self.get(id)
            .ok_or_else(|| AppError::NotFound(format!("card {}", id)))
    }

    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.cards.contains_key(id)
    }

    /// Baseline win-rate coefficient of a card
    pub fn winrate(&self, id: &str) -> AppResult<f64> {
        self.lookup(id).map(|card| card.winrate)
    }

    pub fn all_identifiers(&self) -> BTreeSet<CardId> {
        self.cards.keys().cloned().collect()
    }

    /// Maps collection ids to every card carrying them, ignoring ids the catalog does not know
    pub fn resolve_cids<'a>(&'a self, cids: &'a [u32]) -> impl Iterator<Item = &'a CardId> + 'a {
        cids.iter()
            .filter_map(|cid| self.by_cid.get(cid))
            .flatten()
    }

    /// Cards sorted by identifier
    pub fn sorted(&self) -> Vec<&Card> {
        let mut cards: Vec<&Card> = self.cards.values().collect();
        cards.sort_by(|a, b| a.id.cmp(&b.id));
        cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}
