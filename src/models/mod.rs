mod association;
mod card;
mod deck;
mod inventory;
mod recommendation;

pub use association::{AssociationStore, AssociationTable, TableSelector, TimeWindow};
pub use card::{Card, CardCatalog, CardId};
pub use deck::{DeckStatus, MainSelection, DECK_SIZE};
pub use inventory::Inventory;
pub use recommendation::{CostTier, RecommendationRow, ScoringPolicy, TieredRecommendations};
