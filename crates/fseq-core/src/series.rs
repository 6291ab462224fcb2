// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::FseqError;
use std::fmt::Debug;

/// Discrete label carried by a [`LabeledSeries`].
///
/// `Ord` is required so that mode ties resolve to the smallest label and so
/// that run tables are deterministic.
pub trait Label: Copy + Ord + Debug {}

impl<T: Copy + Ord + Debug> Label for T {}

/// Owned series of `(timestamp, label)` pairs indexed by position.
///
/// Timestamps are usually equal to positions (elapsed seconds of a record
/// sampled at 1 Hz), but nothing here requires it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabeledSeries<L> {
    timestamps: Vec<i64>,
    values: Vec<L>,
}

impl<L: Label> LabeledSeries<L> {
    /// Constructs a validated series from parallel timestamp and value buffers.
    pub fn new(timestamps: Vec<i64>, values: Vec<L>) -> Result<Self, FseqError> {
        if timestamps.len() != values.len() {
            return Err(FseqError::invalid_input(format!(
                "timestamp length mismatch: got {}, expected {}",
                timestamps.len(),
                values.len()
            )));
        }
        Ok(Self { timestamps, values })
    }

    /// Positional series: the timestamp of each value is its position.
    pub fn from_values(values: Vec<L>) -> Self {
        let timestamps = (0..values.len()).map(|idx| idx as i64).collect();
        Self { timestamps, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    pub fn values(&self) -> &[L] {
        &self.values
    }

    pub fn into_values(self) -> Vec<L> {
        self.values
    }

    /// Iterates `(timestamp, value)` pairs in position order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, L)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Returns a series with the same timestamps and new values.
    pub fn with_values(&self, values: Vec<L>) -> Result<Self, FseqError> {
        Self::new(self.timestamps.clone(), values)
    }
}

#[cfg(test)]
mod tests {
    use super::LabeledSeries;

    #[test]
    fn from_values_uses_positions_as_timestamps() {
        let series = LabeledSeries::from_values(vec![3_i64, 3, 1]);
        assert_eq!(series.timestamps(), &[0, 1, 2]);
        assert_eq!(series.len(), 3);
        assert!(!series.is_empty());
    }

    #[test]
    fn rejects_timestamp_length_mismatch() {
        let err = LabeledSeries::new(vec![0, 1], vec![1_i64, 2, 3])
            .expect_err("mismatched buffers must fail");
        assert!(err.to_string().contains("timestamp length mismatch"));
    }

    #[test]
    fn with_values_keeps_timestamps() {
        let series = LabeledSeries::new(vec![10, 20, 30], vec![0_u8, 1, 1])
            .expect("series should be valid");
        let replaced = series
            .with_values(vec![2, 2, 2])
            .expect("same length should succeed");
        assert_eq!(replaced.timestamps(), &[10, 20, 30]);
        assert_eq!(replaced.values(), &[2, 2, 2]);

        let err = series
            .with_values(vec![1])
            .expect_err("shorter buffer must fail");
        assert!(matches!(err, crate::FseqError::InvalidInput(_)));
    }

    #[test]
    fn iter_pairs_timestamps_with_values() {
        let series =
            LabeledSeries::new(vec![5, 6], vec!['a', 'b']).expect("series should be valid");
        let pairs: Vec<(i64, char)> = series.iter().collect();
        assert_eq!(pairs, vec![(5, 'a'), (6, 'b')]);
    }

    #[test]
    fn empty_series_is_allowed() {
        let series: LabeledSeries<i64> = LabeledSeries::from_values(vec![]);
        assert!(series.is_empty());
        assert_eq!(series.iter().count(), 0);
    }
}
