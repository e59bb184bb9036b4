use std::collections::HashSet;

use super::{CardCatalog, CardId};

/// Cards the player owns and can therefore be recommended
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    cards: HashSet<CardId>,
}

impl Inventory {
    pub fn new(cards: impl IntoIterator<Item = CardId>) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    /// Every card in the catalog, used when the collection is unknown
    pub fn full(catalog: &CardCatalog) -> Self {
        Self::new(catalog.all_identifiers())
    }

    pub fn contains(&self, id: &CardId) -> bool {
        self.cards.contains(id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl FromIterator<CardId> for Inventory {
    fn from_iter<T: IntoIterator<Item = CardId>>(iter: T) -> Self {
        Self::new(iter)
    }
}
