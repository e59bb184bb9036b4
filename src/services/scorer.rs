use std::collections::BTreeMap;

use crate::{
    error::{AppError, AppResult},
    models::{
        AssociationStore, AssociationTable, CardCatalog, CardId, MainSelection, ScoringPolicy,
        TimeWindow,
    },
};

/// Raw affinity score per candidate card
pub type Scores<'a> = BTreeMap<&'a CardId, f64>;

/// Computes raw affinity scores of every candidate against a main selection
pub struct Scorer<'a> {
    catalog: &'a CardCatalog,
    store: &'a AssociationStore,
}

impl<'a> Scorer<'a> {
    pub fn new(catalog: &'a CardCatalog, store: &'a AssociationStore) -> Self {
        Self { catalog, store }
    }

    /// Scores every row of the table the policy selects for `window`.
    ///
    /// The window policy sums affinities over the main cards; the aggregate
    /// win-rate policy averages them and yields no scores at all for an empty
    /// selection.
    pub fn score(
        &self,
        main: &MainSelection,
        window: TimeWindow,
        policy: ScoringPolicy,
    ) -> AppResult<Scores<'a>> {
        let table = self.store.table(policy.table_selector(window))?;
        let columns = self.main_columns(table, main)?;

        let mut totals = vec![0.0; table.row_count()];
        for column in &columns {
            for (total, value) in totals.iter_mut().zip(column.iter()) {
                *total += value;
            }
        }

        match policy {
            ScoringPolicy::Window => {}
            ScoringPolicy::AggregateWinrate => {
                if columns.is_empty() {
                    return Ok(Scores::new());
                }
                let count = columns.len() as f64;
                totals.iter_mut().for_each(|total| *total /= count);
            }
        }

        Ok(table.rows().iter().zip(totals).collect())
    }

    /// Resolves the table column of each main card
    fn main_columns(
        &self,
        table: &'a AssociationTable,
        main: &MainSelection,
    ) -> AppResult<Vec<&'a [f64]>> {
        main.cards()
            .iter()
            .map(|id| {
                if !self.catalog.contains(id.as_str()) {
                    return Err(AppError::UnknownCard(id.to_string()));
                }
                table
                    .column_values(id.as_str())
                    .ok_or_else(|| AppError::UnknownCard(id.to_string()))
            })
            .collect()
    }
}
