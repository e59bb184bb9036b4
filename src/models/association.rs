use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt::Display, str::FromStr};

use crate::error::{AppError, AppResult};

use super::CardId;

/// Historical scope an association table is computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum TimeWindow {
    #[default]
    AllTime,
    #[serde(rename = "last_7_days")]
    Last7Days,
    #[serde(rename = "last_30_days")]
    Last30Days,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 3] = [
        TimeWindow::AllTime,
        TimeWindow::Last7Days,
        TimeWindow::Last30Days,
    ];

    /// Day count the association export was built with (-1 for all time)
    pub fn code(&self) -> i32 {
        match self {
            TimeWindow::AllTime => -1,
            TimeWindow::Last7Days => 7,
            TimeWindow::Last30Days => 30,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::AllTime => "all_time",
            TimeWindow::Last7Days => "last_7_days",
            TimeWindow::Last30Days => "last_30_days",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeWindow::AllTime => "All time",
            TimeWindow::Last7Days => "Last 7 days",
            TimeWindow::Last30Days => "Last 30 days",
        }
    }
}

impl Display for TimeWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = AppError;

    /// Accepts the snake-case name, the display label or the day code
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        TimeWindow::ALL
            .into_iter()
            .find(|window| {
                needle == window.as_str()
                    || needle.eq_ignore_ascii_case(window.label())
                    || needle == window.code().to_string()
            })
            .ok_or_else(|| AppError::InvalidSelector(s.to_string()))
    }
}

impl TryFrom<String> for TimeWindow {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Selects one table of the association store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableSelector {
    Window(TimeWindow),
    WinrateWeighted,
}

impl Display for TableSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableSelector::Window(window) => write!(f, "{}", window),
            TableSelector::WinrateWeighted => write!(f, "winrate"),
        }
    }
}

impl FromStr for TableSelector {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "winrate" | "winrate_weighted" => Ok(TableSelector::WinrateWeighted),
            other => other.parse().map(TableSelector::Window),
        }
    }
}

/// Square-ish matrix of pairwise card affinities.
///
/// Rows are the candidate space, columns the main-card space. Values are
/// stored column-major so that scoring reads whole columns.
#[derive(Debug, Clone, Default)]
pub struct AssociationTable {
    rows: Vec<CardId>,
    columns: HashMap<CardId, Vec<f64>>,
}

impl AssociationTable {
    /// Builds a table from row-major `values[row][column]`
    pub fn new(rows: Vec<CardId>, columns: Vec<CardId>, values: Vec<Vec<f64>>) -> AppResult<Self> {
        if values.len() != rows.len() {
            return Err(AppError::DataLoad(format!(
                "association table has {} row labels but {} rows of values",
                rows.len(),
                values.len()
            )));
        }

        let mut seen = std::collections::HashSet::with_capacity(rows.len());
        if let Some(dup) = rows.iter().find(|id| !seen.insert(*id)) {
            return Err(AppError::DataLoad(format!(
                "duplicate row label in association table: {}",
                dup
            )));
        }

        let mut column_values: Vec<Vec<f64>> = vec![Vec::with_capacity(rows.len()); columns.len()];
        for (row_id, row) in rows.iter().zip(&values) {
            if row.len() != columns.len() {
                return Err(AppError::DataLoad(format!(
                    "row {} has {} values, expected {}",
                    row_id,
                    row.len(),
                    columns.len()
                )));
            }
            for (column, value) in column_values.iter_mut().zip(row) {
                column.push(*value);
            }
        }

        let mut by_column = HashMap::with_capacity(columns.len());
        for (column_id, column) in columns.into_iter().zip(column_values) {
            if by_column.contains_key(&column_id) {
                return Err(AppError::DataLoad(format!(
                    "duplicate column label in association table: {}",
                    column_id
                )));
            }
            by_column.insert(column_id, column);
        }

        Ok(Self {
            rows,
            columns: by_column,
        })
    }

    /// Candidate identifiers, in table order
    pub fn rows(&self) -> &[CardId] {
        &self.rows
    }

    #[cfg(test)]
    pub(crate) fn has_column(&self, id: &str) -> bool {
        self.columns.contains_key(id)
    }

    /// Raw column values, aligned with [`AssociationTable::rows`]
    pub fn column_values(&self, id: &str) -> Option<&[f64]> {
        self.columns.get(id).map(Vec::as_slice)
    }

    /// Affinity of every candidate with the given card
    pub fn affinity_column(&self, id: &str) -> Option<HashMap<&CardId, f64>> {
        self.column_values(id)
            .map(|values| self.rows.iter().zip(values.iter().copied()).collect())
    }

    /// Single cell lookup; scoring works on whole columns instead
    #[cfg(test)]
    pub(crate) fn affinity(&self, candidate: &str, main: &str) -> Option<f64> {
        let row = self.rows.iter().position(|id| id.as_str() == candidate)?;
        self.column_values(main).map(|values| values[row])
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

/// Immutable family of association tables keyed by selector
#[derive(Debug, Clone, Default)]
pub struct AssociationStore {
    tables: HashMap<TableSelector, AssociationTable>,
}

impl AssociationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, selector: TableSelector, table: AssociationTable) -> Self {
        self.tables.insert(selector, table);
        self
    }

    /// Returns the table for a selector, failing if none was loaded for it
    pub fn table(&self, selector: TableSelector) -> AppResult<&AssociationTable> {
        self.tables
            .get(&selector)
            .ok_or_else(|| AppError::InvalidSelector(selector.to_string()))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
