// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::{FseqError, LabeledSeries};
use std::collections::{BTreeMap, BTreeSet};

/// 2^63: the first integral `f64` above `i64::MAX`.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// One flight: an integer index (elapsed seconds) and named numeric columns.
///
/// `NaN` marks a missing entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    name: String,
    index: Vec<i64>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl Record {
    /// Constructs a record, requiring every column to match the index length.
    pub fn new(
        name: impl Into<String>,
        index: Vec<i64>,
        columns: BTreeMap<String, Vec<f64>>,
    ) -> Result<Self, FseqError> {
        let name = name.into();
        if let Some((column, values)) = columns
            .iter()
            .find(|(_, values)| values.len() != index.len())
        {
            return Err(FseqError::invalid_input(format!(
                "column '{column}' of record {name} has {} values, index has {}",
                values.len(),
                index.len()
            )));
        }
        Ok(Self {
            name,
            index,
            columns,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> &[i64] {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn columns(&self) -> &BTreeMap<String, Vec<f64>> {
        &self.columns
    }

    pub fn column_names(&self) -> BTreeSet<String> {
        self.columns.keys().cloned().collect()
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    /// Number of missing entries across all columns.
    pub fn missing_count(&self) -> usize {
        self.columns
            .values()
            .map(|values| values.iter().filter(|v| v.is_nan()).count())
            .sum()
    }

    pub fn max_index(&self) -> Option<i64> {
        self.index.iter().copied().max()
    }

    /// Maximum of a column, skipping missing entries.
    pub fn column_max(&self, name: &str) -> Option<f64> {
        self.column(name)?
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .reduce(f64::max)
    }

    /// Reads `column` as integer labels timestamped by the record index.
    pub fn labels(&self, column: &str) -> Result<LabeledSeries<i64>, FseqError> {
        let values = self
            .column(column)
            .ok_or_else(|| FseqError::missing_column(&self.name, column))?;

        let mut labels = Vec::with_capacity(values.len());
        for (pos, &value) in values.iter().enumerate() {
            if !value.is_finite() || value.fract() != 0.0 {
                return Err(FseqError::invalid_input(format!(
                    "column '{column}' of record {} has non-integer label {value} at position {pos}",
                    self.name
                )));
            }
            if !(-I64_LIMIT..I64_LIMIT).contains(&value) {
                return Err(FseqError::invalid_input(format!(
                    "column '{column}' of record {} has label {value} outside the i64 range at position {pos}",
                    self.name
                )));
            }
            labels.push(value as i64);
        }
        LabeledSeries::new(self.index.clone(), labels)
    }
}
