// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::{FseqError, Label, LabeledSeries};

/// Maximal stretch of consecutive identical labels.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Run<L> {
    pub beginning: i64,
    pub ending: i64,
    pub value: L,
    pub length: i64,
}

/// How the `ending` of each run in a [`RunTable`] must be read.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunExtent {
    /// `ending` is the timestamp of the last member; `length = ending - beginning + 1`.
    Inclusive,
    /// Sub-threshold runs were absorbed forward. `ending` is exclusive and
    /// equals the next surviving run's `beginning`, or `series_len` for the
    /// last run. `length` keeps the measured length of the surviving stretch.
    ForwardMerged {
        minimum_duration: usize,
        series_len: usize,
    },
}

/// Ordered runs of a labeled series.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunTable<L> {
    runs: Vec<Run<L>>,
    extent: RunExtent,
}

impl<L: Label> RunTable<L> {
    pub fn runs(&self) -> &[Run<L>] {
        &self.runs
    }

    pub fn into_runs(self) -> Vec<Run<L>> {
        self.runs
    }

    pub fn extent(&self) -> RunExtent {
        self.extent
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Run<L>> {
        self.runs.iter()
    }

    /// Sum of the run lengths.
    pub fn total_length(&self) -> i64 {
        self.runs
            .iter()
            .fold(0_i64, |acc, run| acc.saturating_add(run.length))
    }

    /// Rebuilds the series described by an unmerged table.
    ///
    /// Every run contributes the timestamps `beginning..=ending`.
    pub fn expand(&self) -> Result<LabeledSeries<L>, FseqError> {
        if self.extent != RunExtent::Inclusive {
            return Err(FseqError::invalid_input(
                "only unmerged run tables describe a full series",
            ));
        }

        let capacity = usize::try_from(self.total_length()).unwrap_or(0);
        let mut timestamps = Vec::with_capacity(capacity);
        let mut values = Vec::with_capacity(capacity);
        for run in &self.runs {
            if run.ending < run.beginning {
                return Err(FseqError::invalid_input(format!(
                    "run ending {} precedes beginning {}",
                    run.ending, run.beginning
                )));
            }
            for ts in run.beginning..=run.ending {
                timestamps.push(ts);
                values.push(run.value);
            }
        }
        LabeledSeries::new(timestamps, values)
    }

    fn merge_forward(self, minimum_duration: usize, series_len: usize) -> Self {
        let threshold = i64::try_from(minimum_duration).unwrap_or(i64::MAX);
        let series_end = i64::try_from(series_len).unwrap_or(i64::MAX);

        let mut kept: Vec<Run<L>> = self
            .runs
            .into_iter()
            .filter(|run| run.length > threshold)
            .collect();
        let next_beginnings: Vec<i64> = kept
            .iter()
            .skip(1)
            .map(|run| run.beginning)
            .chain(std::iter::once(series_end))
            .collect();
        for (run, ending) in kept.iter_mut().zip(next_beginnings) {
            run.ending = ending;
        }

        Self {
            runs: kept,
            extent: RunExtent::ForwardMerged {
                minimum_duration,
                series_len,
            },
        }
    }
}

impl<'a, L> IntoIterator for &'a RunTable<L> {
    type Item = &'a Run<L>;
    type IntoIter = std::slice::Iter<'a, Run<L>>;

    fn into_iter(self) -> Self::IntoIter {
        self.runs.iter()
    }
}

fn close_run<L>(beginning: i64, ending: i64, value: L) -> Run<L> {
    Run {
        beginning,
        ending,
        value,
        length: ending.saturating_sub(beginning).saturating_add(1),
    }
}

fn scan_runs<L: Label>(series: &LabeledSeries<L>) -> RunTable<L> {
    let mut runs = Vec::new();
    let mut pairs = series.iter();

    if let Some((first_ts, first_value)) = pairs.next() {
        let (mut beginning, mut ending, mut value) = (first_ts, first_ts, first_value);
        for (ts, current) in pairs {
            if current != value {
                runs.push(close_run(beginning, ending, value));
                beginning = ts;
                value = current;
            }
            ending = ts;
        }
        runs.push(close_run(beginning, ending, value));
    }

    RunTable {
        runs,
        extent: RunExtent::Inclusive,
    }
}

/// Segments `series` into maximal runs of identical labels.
///
/// With `minimum_duration = Some(t)` only runs with `length > t` survive, and
/// each survivor is extended forward to the next survivor's beginning so the
/// short runs in between are absorbed. The last survivor ends at the series
/// length (an element count, not a timestamp). Short runs before the first
/// survivor are dropped.
pub fn extract<L: Label>(
    series: &LabeledSeries<L>,
    minimum_duration: Option<usize>,
) -> RunTable<L> {
    let table = scan_runs(series);
    match minimum_duration {
        None => table,
        Some(threshold) => table.merge_forward(threshold, series.len()),
    }
}
