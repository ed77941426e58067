//! Great-circle distance and distance-normalized RTT inflation.

use std::collections::HashMap;

use crate::city::CityCode;
use crate::constants::{EARTH_RADIUS_KM, INFLATION_DECIMALS, NO_DELAY_MS, RTT_FACTOR};
use crate::error::{Error, LookupError};
use crate::matrix::Matrix;

/// Latitude and longitude in degrees. Supplied by the caller, never
/// invented here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCoordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Haversine distance between two points on the Earth's surface, in km.
pub fn haversine_km(a: GeoCoordinate, b: GeoCoordinate) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().asin();
    EARTH_RADIUS_KM * c
}

/// Round trip a signal needs to cover `dist_km` at `speed_km_ms`.
pub fn expected_rtt_ms(dist_km: f64, speed_km_ms: f64) -> f64 {
    RTT_FACTOR * dist_km / speed_km_ms
}

/// Ratio of the observed RTT to the geodesic expectation, rounded to a
/// fixed number of decimal places.
pub fn rtt_inflation(rtt_ms: f64, dist_km: f64, speed_km_ms: f64) -> f64 {
    round_ratio(rtt_ms / expected_rtt_ms(dist_km, speed_km_ms))
}

fn round_ratio(value: f64) -> f64 {
    let scale = 10f64.powi(INFLATION_DECIMALS);
    (value * scale).round() / scale
}

/// Rewrite every observed delay cell as an inflation ratio against the
/// city coordinates. Missing markers stay put; a coordinate miss for either
/// endpoint fails the run.
pub fn apply_inflation(
    matrix: &Matrix<i64>,
    locations: &HashMap<CityCode, GeoCoordinate>,
    speed_km_ms: f64,
) -> Result<Matrix<f64>, Error> {
    let mut out = Matrix::new();
    for (src, row) in matrix {
        let from = location_of(locations, src)?;
        let mut out_row = HashMap::new();
        for (dst, rtt) in row {
            let to = location_of(locations, dst)?;
            if *rtt == NO_DELAY_MS {
                out_row.insert(dst.clone(), NO_DELAY_MS as f64);
                continue;
            }
            let dist_km = haversine_km(from, to);
            if dist_km == 0.0 {
                return Err(Error::ZeroDistance {
                    src: src.clone(),
                    dst: dst.clone(),
                });
            }
            out_row.insert(dst.clone(), rtt_inflation(*rtt as f64, dist_km, speed_km_ms));
        }
        out.insert(src.clone(), out_row);
    }
    Ok(out)
}

fn location_of(
    locations: &HashMap<CityCode, GeoCoordinate>,
    code: &str,
) -> Result<GeoCoordinate, Error> {
    locations
        .get(code)
        .copied()
        .ok_or_else(|| LookupError::Coordinates(code.to_string()).into())
}
