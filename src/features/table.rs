//! Column-major feature table aligned to the input series rows.

use crate::features::error::FeatureError;
use std::collections::HashMap;

/// Named numeric feature columns, all of the same length, aligned row-for-row
/// with the series they were derived from. Missing values are `NaN`.
#[derive(Debug, Clone)]
pub struct FeatureTable {
    len: usize,
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
}

impl FeatureTable {
    pub(crate) fn new(len: usize) -> Self {
        Self {
            len,
            names: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, name: impl Into<String>, values: Vec<f64>) {
        debug_assert_eq!(values.len(), self.len);
        self.names.push(name.into());
        self.columns.push(values);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Feature names in construction order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// A single feature column by name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| self.columns[idx].as_slice())
    }

    /// The most recent row in which every feature is populated.
    ///
    /// Rows lacking full lookback history carry `NaN`s and are skipped; if no
    /// row survives, feature construction failed for this series.
    pub fn latest_complete_row(&self) -> Result<FeatureRow, FeatureError> {
        for row in (0..self.len).rev() {
            if self.columns.iter().all(|col| col[row].is_finite()) {
                let values = self
                    .names
                    .iter()
                    .zip(&self.columns)
                    .map(|(name, col)| (name.clone(), col[row]))
                    .collect();
                return Ok(FeatureRow { values });
            }
        }
        Err(FeatureError::NoCompleteRows)
    }
}

/// A single fully-populated feature row, addressable by feature name.
///
/// Consumers reindex this row to a model artifact's ordered feature-name list;
/// the row itself carries no ordering guarantees.
#[derive(Debug, Clone)]
pub struct FeatureRow {
    values: HashMap<String, f64>,
}

impl FeatureRow {
    /// The value of a named feature, if the row contains it.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Number of features in the row.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: &[(&str, f64)]) -> Self {
        Self {
            values: pairs
                .iter()
                .map(|(name, value)| (name.to_string(), *value))
                .collect(),
        }
    }
}
