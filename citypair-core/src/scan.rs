//! Line-oriented scanner locating the measurement grid inside a report page.
//!
//! The pages embed one table whose value grid starts at a marker row
//! ("CITY PAIRS"). The grid is ragged lower-triangular: a row either carries
//! a single column-header label, or a row label, one value per column header
//! seen so far, and a trailing label that extends the running header list.

use regex::Regex;

use crate::constants::{
    BLANK_CELL, CELL_PAT, GRID_START_PAT, ROW_CLOSE_PAT, ROW_OPEN_PAT, TABLE_CLOSE_PAT,
    TABLE_OPEN_PAT,
};
use crate::error::ParseError;

/// One emitted row-group of the grid, in document order.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    /// Single-cell row: a column-header label only.
    Header { label: String },
    /// Row label, one value cell per previously seen column header, and the
    /// trailing label that extends the header list.
    Data {
        source: String,
        values: Vec<String>,
        header: String,
    },
}

enum ScanState {
    BeforeTable,
    BeforeMarker,
    Collecting,
}

pub struct TableScanner {
    blank_value: String,
    table_open: Regex,
    table_close: Regex,
    row_open: Regex,
    row_close: Regex,
    cell: Regex,
    grid_start: Regex,
}

impl TableScanner {
    /// `blank_value` is the token stored in place of an explicit blank cell
    /// (the metric's missing-value placeholder).
    pub fn new(blank_value: &str) -> Self {
        Self {
            blank_value: blank_value.to_string(),
            table_open: Regex::new(TABLE_OPEN_PAT).unwrap(),
            table_close: Regex::new(TABLE_CLOSE_PAT).unwrap(),
            row_open: Regex::new(ROW_OPEN_PAT).unwrap(),
            row_close: Regex::new(ROW_CLOSE_PAT).unwrap(),
            cell: Regex::new(CELL_PAT).unwrap(),
            grid_start: Regex::new(GRID_START_PAT).unwrap(),
        }
    }

    /// Scan a whole page and return the grid rows. A page without a table or
    /// without the marker row yields an empty list, not an error.
    pub fn scan(&self, page: &str) -> Result<Vec<Row>, ParseError> {
        let mut state = ScanState::BeforeTable;
        let mut pending: Vec<String> = Vec::new();
        let mut rows = Vec::new();

        for line in page.lines().map(str::trim) {
            match state {
                ScanState::BeforeTable => {
                    if self.table_open.is_match(line) {
                        state = ScanState::BeforeMarker;
                    }
                    continue;
                }
                ScanState::BeforeMarker => {
                    // The marker line itself is consumed, not emitted.
                    if self.grid_start.is_match(line) {
                        state = ScanState::Collecting;
                    }
                    continue;
                }
                ScanState::Collecting => {}
            }

            if self.row_open.is_match(line) && !pending.is_empty() {
                return Err(ParseError::RowNotClosed);
            }

            if let Some(caps) = self.cell.captures(line) {
                match caps.get(1) {
                    Some(text) if !text.as_str().is_empty() => {
                        pending.push(text.as_str().trim().to_string());
                    }
                    _ => {
                        let token = caps.get(2).map(|m| m.as_str().trim()).unwrap_or("");
                        if token != BLANK_CELL {
                            return Err(ParseError::BadCell(line.to_string()));
                        }
                        pending.push(self.blank_value.clone());
                    }
                }
            }

            if self.row_close.is_match(line) && !pending.is_empty() {
                rows.push(emit_row(std::mem::take(&mut pending)));
            }

            if self.table_close.is_match(line) {
                break;
            }
        }

        Ok(rows)
    }
}

fn emit_row(mut cells: Vec<String>) -> Row {
    let header = cells.pop().unwrap_or_default();
    if cells.is_empty() {
        Row::Header { label: header }
    } else {
        let source = cells.remove(0);
        Row::Data {
            source,
            values: cells,
            header,
        }
    }
}
