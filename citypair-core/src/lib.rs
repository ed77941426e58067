//! Extraction of city-pair delay/loss matrices from semi-structured HTML
//! reports, symmetric matrix completion, and geodesic RTT inflation.

pub mod city;
pub mod constants;
pub mod error;
pub mod geo;
pub mod matrix;
pub mod scan;
pub mod stats;

pub use city::{CityCode, CityDirectory};
pub use error::{Error, LookupError, ParseError, StatsError};
pub use geo::{apply_inflation, expected_rtt_ms, haversine_km, rtt_inflation, GeoCoordinate};
pub use matrix::{complete_matrix, parse_matrix, CellValue, Matrix, MatrixBuilder};
pub use scan::{Row, TableScanner};
pub use stats::Stats;
