pub mod inventory;
pub mod loader;
pub mod recommendations;
pub mod scorer;

pub use inventory::resolve_inventory;
pub use recommendations::{RecommendationQuery, Recommender};
pub use scorer::Scorer;
