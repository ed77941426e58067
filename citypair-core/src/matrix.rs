//! Builds the partial city-pair matrix from scanned rows and completes it
//! into a full symmetric mapping.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::city::{CityCode, CityDirectory};
use crate::error::{Error, ParseError};
use crate::scan::{Row, TableScanner};
use crate::stats::{self, Stats};

/// Source city -> destination city -> measurement. Partial (lower-triangular)
/// after the build step, dense and symmetric after [`complete_matrix`].
pub type Matrix<V> = HashMap<CityCode, HashMap<CityCode, V>>;

/// A single measurement stored in a matrix cell: integer milliseconds for
/// delay, floating-point percent for loss.
pub trait CellValue: Copy + PartialEq + PartialOrd + fmt::Display {
    fn parse_cell(text: &str) -> Result<Self, ParseError>;
    fn to_f64(self) -> f64;
}

impl CellValue for i64 {
    fn parse_cell(text: &str) -> Result<Self, ParseError> {
        text.trim()
            .parse()
            .map_err(|_| ParseError::BadValue(text.to_string()))
    }

    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl CellValue for f64 {
    fn parse_cell(text: &str) -> Result<Self, ParseError> {
        text.trim()
            .parse()
            .map_err(|_| ParseError::BadValue(text.to_string()))
    }

    fn to_f64(self) -> f64 {
        self
    }
}

/// Consumes scanner rows and accumulates the partial matrix together with the
/// running column-header list.
pub struct MatrixBuilder<'a, V> {
    cities: &'a CityDirectory,
    headers: Vec<CityCode>,
    matrix: Matrix<V>,
}

impl<'a, V: CellValue> MatrixBuilder<'a, V> {
    pub fn new(cities: &'a CityDirectory) -> Self {
        Self {
            cities,
            headers: Vec::new(),
            matrix: Matrix::new(),
        }
    }

    /// Column headers resolved so far, in grid order.
    pub fn headers(&self) -> &[CityCode] {
        &self.headers
    }

    pub fn push(&mut self, row: &Row) -> Result<(), Error> {
        match row {
            Row::Header { label } => {
                let code = self.cities.resolve_abbrev(label)?;
                self.headers.push(code);
            }
            Row::Data {
                source,
                values,
                header,
            } => {
                // The header list runs one step ahead of the data row it
                // describes; the row's own trailing label extends it only
                // after the values are consumed.
                if values.len() != self.headers.len() {
                    return Err(ParseError::ColumnCount {
                        values: values.len(),
                        headers: self.headers.len(),
                    }
                    .into());
                }
                let src = self.cities.resolve_name(source)?;
                let row_values = self.matrix.entry(src).or_default();
                for (dst, text) in self.headers.iter().zip(values) {
                    row_values.insert(dst.clone(), V::parse_cell(text)?);
                }
                let code = self.cities.resolve_abbrev(header)?;
                self.headers.push(code);
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Matrix<V> {
        self.matrix
    }
}

/// Parse a whole report page into the partial matrix plus summary statistics
/// over the observed (non-missing) values.
pub fn parse_matrix<V: CellValue>(
    page: &str,
    cities: &CityDirectory,
    missing: V,
) -> Result<(Matrix<V>, Stats<V>), Error> {
    let scanner = TableScanner::new(&missing.to_string());
    let rows = scanner.scan(page)?;

    let mut builder = MatrixBuilder::new(cities);
    for row in &rows {
        builder.push(row)?;
    }
    let matrix = builder.finish();

    let stats = stats::compute(&matrix, missing)?;
    Ok((matrix, stats))
}

/// Complete the symmetric matrix given its lower-left triangle: every
/// observed entry is written in both orientations, and the result is dense
/// over the full key set (diagonal included) with `missing` in any cell
/// neither orientation observed. The input is left untouched; completing an
/// already-complete matrix is a no-op.
pub fn complete_matrix<V: Copy>(matrix: &Matrix<V>, missing: V) -> Matrix<V> {
    let mut codes: BTreeSet<&CityCode> = BTreeSet::new();
    for (src, row) in matrix {
        codes.insert(src);
        codes.extend(row.keys());
    }

    let mut full = Matrix::new();
    for src in &codes {
        let row = full.entry((*src).clone()).or_insert_with(HashMap::new);
        for dst in &codes {
            row.insert((*dst).clone(), missing);
        }
    }

    for (src, row) in matrix {
        for (dst, value) in row {
            if let Some(r) = full.get_mut(src) {
                r.insert(dst.clone(), *value);
            }
            if let Some(r) = full.get_mut(dst) {
                r.insert(src.clone(), *value);
            }
        }
    }
    full
}
