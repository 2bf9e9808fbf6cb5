// ==========================================
// Proposal Desk - column mapping
// ==========================================
// Responsibility: header text → canonical column index
// Rule: case-insensitive substring match, first matching header wins
// ==========================================

use crate::domain::import::{CellValue, ImportColumn, RawRow};
use std::collections::HashMap;

static EMPTY_CELL: CellValue = CellValue::Empty;

/// Canonical column → index, built once per import
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnMap {
    indices: HashMap<ImportColumn, usize>,
}

impl ColumnMap {
    /// Build the map from the header row
    ///
    /// Columns absent from the header are simply not mapped;
    /// lookups on them yield `CellValue::Empty`.
    pub fn from_headers(headers: &[String]) -> Self {
        let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

        let indices = ImportColumn::ALL
            .iter()
            .filter_map(|column| {
                let label = column.label().to_lowercase();
                lowered
                    .iter()
                    .position(|header| header.contains(&label))
                    .map(|idx| (*column, idx))
            })
            .collect();

        Self { indices }
    }

    pub fn index_of(&self, column: ImportColumn) -> Option<usize> {
        self.indices.get(&column).copied()
    }

    pub fn is_mapped(&self, column: ImportColumn) -> bool {
        self.indices.contains_key(&column)
    }

    /// Columns of the fixed list that were not found in the header
    pub fn missing_columns(&self) -> Vec<ImportColumn> {
        ImportColumn::ALL
            .iter()
            .filter(|c| !self.is_mapped(**c))
            .copied()
            .collect()
    }

    /// Cell of `row` for `column`; Empty when unmapped or the row is short
    pub fn get<'a>(&self, row: &'a RawRow, column: ImportColumn) -> &'a CellValue {
        self.index_of(column)
            .and_then(|idx| row.cells.get(idx))
            .unwrap_or(&EMPTY_CELL)
    }

    /// True when every mapped column of the row is blank
    pub fn all_mapped_blank(&self, row: &RawRow) -> bool {
        self.indices
            .values()
            .all(|idx| row.cells.get(*idx).map_or(true, |c| c.is_blank()))
    }
}
