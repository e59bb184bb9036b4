use serde::Serialize;
use std::collections::HashSet;

use crate::error::{AppError, AppResult};

use super::CardId;

/// Number of cards in a finished deck
pub const DECK_SIZE: usize = 12;

/// Cards already chosen for the deck under construction.
///
/// Ordered, duplicate-free and never larger than [`DECK_SIZE`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MainSelection {
    cards: Vec<CardId>,
}

impl MainSelection {
    pub fn new(cards: Vec<CardId>) -> AppResult<Self> {
        if cards.len() > DECK_SIZE {
            return Err(AppError::InvalidInput(format!(
                "main selection has {} cards, a deck holds at most {}",
                cards.len(),
                DECK_SIZE
            )));
        }

        let mut seen = HashSet::with_capacity(cards.len());
        if let Some(dup) = cards.iter().find(|id| !seen.insert(*id)) {
            return Err(AppError::InvalidInput(format!(
                "card {} appears more than once in the main selection",
                dup
            )));
        }

        Ok(Self { cards })
    }

    pub fn cards(&self) -> &[CardId] {
        &self.cards
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

/// Completeness of a deck relative to [`DECK_SIZE`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeckStatus {
    Incomplete { missing: usize },
    Complete,
    Oversized { excess: usize },
}

impl DeckStatus {
    pub fn of(card_count: usize) -> Self {
        match card_count {
            n if n < DECK_SIZE => DeckStatus::Incomplete {
                missing: DECK_SIZE - n,
            },
            n if n == DECK_SIZE => DeckStatus::Complete,
            n => DeckStatus::Oversized {
                excess: n - DECK_SIZE,
            },
        }
    }
}
