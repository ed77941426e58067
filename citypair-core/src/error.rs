//! Typed errors for matrix extraction. All of them are fatal for the
//! current document; there is no partial or degraded output.

use thiserror::Error;

/// Structural failures while scanning or building the measurement table.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("row opened before the previous row closed")]
    RowNotClosed,

    #[error("unrecognized cell content: {0}")]
    BadCell(String),

    #[error("bad numeric cell value: {0:?}")]
    BadValue(String),

    #[error("row carries {values} values for {headers} column headers")]
    ColumnCount { values: usize, headers: usize },
}

/// A city abbreviation, full name, or coordinate entry could not be
/// resolved through the externally supplied tables.
#[derive(Debug, Error, PartialEq)]
pub enum LookupError {
    #[error("unknown city abbreviation: {0}")]
    Abbreviation(String),

    #[error("unknown city name: {0}")]
    CityName(String),

    #[error("no coordinates for city: {0}")]
    Coordinates(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("matrix holds no observed values")]
    NoValues,
}

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("statistics error: {0}")]
    Stats(#[from] StatsError),

    #[error("cannot normalize {src} -> {dst}: zero great-circle distance")]
    ZeroDistance { src: String, dst: String },
}

pub type Result<T> = std::result::Result<T, Error>;
