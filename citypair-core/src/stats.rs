//! Simple statistics over the observed cells of a matrix.

use serde::Serialize;

use crate::error::StatsError;
use crate::matrix::{CellValue, Matrix};

/// Minimum, maximum, and mean of the observed (non-missing) values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stats<V> {
    pub min: V,
    pub max: V,
    pub avg: f64,
}

/// Cells equal to `missing` are excluded. A matrix with zero observed
/// values has no statistics and fails instead of yielding NaN.
pub fn compute<V: CellValue>(matrix: &Matrix<V>, missing: V) -> Result<Stats<V>, StatsError> {
    let mut values: Vec<V> = matrix
        .values()
        .flat_map(|row| row.values())
        .copied()
        .filter(|v| *v != missing)
        .collect();
    if values.is_empty() {
        return Err(StatsError::NoValues);
    }

    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let sum: f64 = values.iter().map(|v| v.to_f64()).sum();
    Ok(Stats {
        min: values[0],
        max: values[values.len() - 1],
        avg: sum / values.len() as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{NO_DELAY_MS, NO_LOSS_PCT};
    use std::collections::HashMap;

    fn matrix_of(entries: &[(&str, &str, i64)]) -> Matrix<i64> {
        let mut matrix = Matrix::new();
        for (src, dst, value) in entries {
            matrix
                .entry(src.to_string())
                .or_insert_with(HashMap::new)
                .insert(dst.to_string(), *value);
        }
        matrix
    }

    #[test]
    fn missing_markers_are_excluded() {
        let matrix = matrix_of(&[
            ("A", "B", 12),
            ("A", "C", NO_DELAY_MS),
            ("B", "C", 4),
            ("C", "A", NO_DELAY_MS),
        ]);
        let stats = compute(&matrix, NO_DELAY_MS).unwrap();
        assert_eq!(stats.min, 4);
        assert_eq!(stats.max, 12);
        assert_eq!(stats.avg, 8.0);
    }

    #[test]
    fn all_missing_is_an_error() {
        let matrix = matrix_of(&[("A", "B", NO_DELAY_MS)]);
        assert_eq!(compute(&matrix, NO_DELAY_MS), Err(StatsError::NoValues));
    }

    #[test]
    fn empty_matrix_is_an_error() {
        let matrix: Matrix<i64> = Matrix::new();
        assert_eq!(compute(&matrix, NO_DELAY_MS), Err(StatsError::NoValues));
    }

    #[test]
    fn loss_matrices_use_their_own_marker() {
        let mut matrix: Matrix<f64> = Matrix::new();
        matrix
            .entry("A".to_string())
            .or_insert_with(HashMap::new)
            .insert("B".to_string(), NO_LOSS_PCT);
        matrix
            .entry("A".to_string())
            .or_insert_with(HashMap::new)
            .insert("C".to_string(), 0.0);

        // A measured 0.0% loss is an observation, not a missing cell.
        let stats = compute(&matrix, NO_LOSS_PCT).unwrap();
        assert_eq!(stats.min, 0.0);
        assert_eq!(stats.max, 0.0);
        assert_eq!(stats.avg, 0.0);
    }
}
