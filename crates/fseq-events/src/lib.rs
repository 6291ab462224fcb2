// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Event detection over labeled flight phases.
//!
//! An event is a run of a target label that survives the forward-merge
//! threshold and is followed by a clear gap before the next such run. A burst
//! of repeated attempts therefore collapses to its last attempt.

use fseq_core::{Dataset, FseqError, Label, LabeledSeries, Run, extract};
use std::collections::BTreeMap;
use tracing::{debug, info};

const DEFAULT_LABEL_COLUMN: &str = "CL";
const DEFAULT_SAMPLE_POSITION: usize = 1200;
const DEFAULT_MINIMUM_DURATION: usize = 20;
const DEFAULT_MINIMUM_DISTANCE: i64 = 2;

/// Gap between an occurrence's end and the next occurrence's beginning.
///
/// `Unbounded` sorts above every finite distance.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Distance {
    Finite(i64),
    Unbounded,
}

impl Distance {
    pub fn is_unbounded(self) -> bool {
        matches!(self, Self::Unbounded)
    }
}

/// Surviving run of the target label.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EventOccurrence<L> {
    pub run: Run<L>,
    pub distance: Distance,
}

impl<L> EventOccurrence<L> {
    pub fn beginning(&self) -> i64 {
        self.run.beginning
    }
}

/// How the target label is chosen when scanning a dataset.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetLabel {
    Fixed(i64),
    /// Label found at `position` of the first record's label column.
    SampledAt { position: usize },
}

/// Configuration for [`EventDetector`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventDetectorConfig {
    /// Record column holding the phase labels.
    pub column: String,
    pub target: TargetLabel,
    pub minimum_duration: usize,
    pub minimum_distance: i64,
}

impl Default for EventDetectorConfig {
    fn default() -> Self {
        Self {
            column: DEFAULT_LABEL_COLUMN.to_string(),
            target: TargetLabel::SampledAt {
                position: DEFAULT_SAMPLE_POSITION,
            },
            minimum_duration: DEFAULT_MINIMUM_DURATION,
            minimum_distance: DEFAULT_MINIMUM_DISTANCE,
        }
    }
}

impl EventDetectorConfig {
    fn validate(&self) -> Result<(), FseqError> {
        if self.column.trim().is_empty() {
            return Err(FseqError::invalid_input(
                "EventDetectorConfig.column must not be empty",
            ));
        }
        Ok(())
    }
}

/// Finds separated occurrences of a target label.
#[derive(Clone, Debug)]
pub struct EventDetector {
    config: EventDetectorConfig,
}

impl EventDetector {
    pub fn new(config: EventDetectorConfig) -> Result<Self, FseqError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EventDetectorConfig {
        &self.config
    }

    /// Occurrences of `target` whose distance to the next occurrence is at
    /// least `minimum_distance`. The last occurrence always qualifies.
    pub fn detect<L: Label>(
        &self,
        series: &LabeledSeries<L>,
        target: L,
    ) -> Vec<EventOccurrence<L>> {
        let table = extract(series, Some(self.config.minimum_duration));
        let retained: Vec<Run<L>> = table
            .into_runs()
            .into_iter()
            .filter(|run| run.value == target)
            .collect();

        let threshold = Distance::Finite(self.config.minimum_distance);
        retained
            .iter()
            .enumerate()
            .map(|(idx, run)| EventOccurrence {
                run: *run,
                distance: retained.get(idx + 1).map_or(Distance::Unbounded, |next| {
                    Distance::Finite(next.beginning.saturating_sub(run.ending))
                }),
            })
            .filter(|occurrence| occurrence.distance >= threshold)
            .collect()
    }

    /// Resolves the configured [`TargetLabel`] against `dataset`.
    pub fn resolve_target<D: Dataset>(&self, dataset: &mut D) -> Result<i64, FseqError> {
        match self.config.target {
            TargetLabel::Fixed(label) => Ok(label),
            TargetLabel::SampledAt { position } => {
                let reference = dataset.first()?;
                let labels = reference.labels(&self.config.column)?;
                labels.values().get(position).copied().ok_or_else(|| {
                    FseqError::invalid_input(format!(
                        "cannot sample target label at position {position}: record {} has {} samples",
                        reference.name(),
                        labels.len()
                    ))
                })
            }
        }
    }

    /// Maps every record with more than one occurrence to the beginnings of
    /// its occurrences.
    ///
    /// The dataset is rewound before and after the scan. An unreadable record
    /// aborts the scan; run the health check first on untrusted datasets.
    pub fn detect_dataset<D: Dataset>(
        &self,
        dataset: &mut D,
    ) -> Result<BTreeMap<String, Vec<i64>>, FseqError> {
        dataset.rewind();
        let result = self
            .resolve_target(dataset)
            .and_then(|target| self.scan(dataset, target));
        dataset.rewind();
        result
    }

    fn scan<D: Dataset>(
        &self,
        dataset: &mut D,
        target: i64,
    ) -> Result<BTreeMap<String, Vec<i64>>, FseqError> {
        let mut out = BTreeMap::new();
        let mut scanned = 0usize;
        for item in dataset.slice(0) {
            let record = item?;
            scanned += 1;
            let series = record.labels(&self.config.column)?;
            let occurrences = self.detect(&series, target);
            debug!(
                record = record.name(),
                occurrences = occurrences.len(),
                "scanned record for events"
            );
            if occurrences.len() > 1 {
                out.insert(
                    record.name().to_string(),
                    occurrences.iter().map(EventOccurrence::beginning).collect(),
                );
            }
        }
        info!(
            scanned,
            flagged = out.len(),
            target,
            "event scan complete"
        );
        Ok(out)
    }
}
