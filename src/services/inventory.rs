use crate::models::{CardCatalog, CardId, Inventory};

/// Resolves the cards a player owns.
///
/// With neither explicit card ids nor collection ids the collection is
/// unknown and every catalog card counts as owned. Otherwise the inventory is
/// the union of both inputs; unknown collection ids are ignored.
pub fn resolve_inventory(
    catalog: &CardCatalog,
    owned_cards: Option<&[CardId]>,
    owned_cids: Option<&[u32]>,
) -> Inventory {
    if owned_cards.is_none() && owned_cids.is_none() {
        tracing::debug!("Collection unknown, assuming the full catalog is owned");
        return Inventory::full(catalog);
    }

    let explicit = owned_cards.unwrap_or_default().iter().cloned();
    let collected = catalog
        .resolve_cids(owned_cids.unwrap_or_default())
        .cloned();

    explicit.chain(collected).collect()
}
