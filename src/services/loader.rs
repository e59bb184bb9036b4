use serde::Deserialize;
use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::{
        AssociationStore, AssociationTable, Card, CardCatalog, CardId, TableSelector, TimeWindow,
    },
};

pub const CATALOG_FILE: &str = "cards.csv";
pub const WINRATE_TABLE_FILE: &str = "association_winrate.csv";

/// File holding the association table of a time window
pub fn window_table_file(window: TimeWindow) -> String {
    format!("association_norm_{}.csv", window.code())
}

/// One row of `cards.csv`; columns not listed here are ignored
#[derive(Debug, Deserialize)]
struct CardRecord {
    carddefid: String,
    cost: u32,
    power: u32,
    stats_winrate: f64,
    #[serde(default)]
    cid: Option<u32>,
}

impl From<CardRecord> for Card {
    fn from(record: CardRecord) -> Self {
        Card {
            id: CardId::from(record.carddefid),
            cost: record.cost,
            power: record.power,
            winrate: record.stats_winrate,
            cid: record.cid,
        }
    }
}

/// Loads the card catalog from a delimited file with a header row
pub fn load_catalog(path: &Path) -> AppResult<CardCatalog> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| load_error(path, e))?;

    let cards = reader
        .deserialize::<CardRecord>()
        .map(|record| record.map(Card::from))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| load_error(path, e))?;

    let catalog = CardCatalog::from_cards(cards)?;
    tracing::info!(path = %path.display(), cards = catalog.len(), "Loaded card catalog");
    Ok(catalog)
}

/// Loads one association matrix.
///
/// The first header cell labels the row-index column and is ignored; the
/// remaining header cells are the column card ids. Empty and NaN cells read
/// as 0.
pub fn load_association_table(path: &Path) -> AppResult<AssociationTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| load_error(path, e))?;

    let headers = reader.headers().map_err(|e| load_error(path, e))?.clone();
    if headers.is_empty() {
        return Err(AppError::DataLoad(format!(
            "{}: missing header row",
            path.display()
        )));
    }
    let columns: Vec<CardId> = headers.iter().skip(1).map(|h| CardId::from(h.trim())).collect();

    let mut rows = Vec::new();
    let mut values = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| load_error(path, e))?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let mut fields = record.iter();
        let row_id = fields.next().map(str::trim).unwrap_or_default();
        if row_id.is_empty() {
            return Err(AppError::DataLoad(format!(
                "{}: line {} has no row label",
                path.display(),
                line
            )));
        }

        let row = fields
            .map(parse_affinity)
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|e| {
                AppError::DataLoad(format!("{}: line {}: {}", path.display(), line, e))
            })?;

        rows.push(CardId::from(row_id));
        values.push(row);
    }

    let table = AssociationTable::new(rows, columns, values).map_err(|e| match e {
        AppError::DataLoad(msg) => AppError::DataLoad(format!("{}: {}", path.display(), msg)),
        other => other,
    })?;

    tracing::debug!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        "Loaded association table"
    );
    Ok(table)
}

/// Loads every time-window table plus the win-rate-weighted table
pub fn load_store(data_dir: &Path) -> AppResult<AssociationStore> {
    let mut store = AssociationStore::new();

    for window in TimeWindow::ALL {
        let table = load_association_table(&data_dir.join(window_table_file(window)))?;
        store = store.with_table(TableSelector::Window(window), table);
    }

    let winrate = load_association_table(&data_dir.join(WINRATE_TABLE_FILE))?;
    store = store.with_table(TableSelector::WinrateWeighted, winrate);

    tracing::info!(tables = store.len(), "Loaded association store");
    Ok(store)
}

/// Loads all reference data the recommender needs from `data_dir`
pub fn load_reference_data(data_dir: &Path) -> AppResult<(CardCatalog, AssociationStore)> {
    let catalog = load_catalog(&data_dir.join(CATALOG_FILE))?;
    let store = load_store(data_dir)?;
    Ok((catalog, store))
}

fn parse_affinity(field: &str) -> Result<f64, String> {
    let field = field.trim();
    if field.is_empty() {
        return Ok(0.0);
    }
    let value: f64 = field
        .parse()
        .map_err(|_| format!("invalid affinity value '{}'", field))?;
    Ok(if value.is_nan() { 0.0 } else { value })
}

fn load_error(path: &Path, err: csv::Error) -> AppError {
    AppError::DataLoad(format!("{}: {}", path.display(), err))
}
