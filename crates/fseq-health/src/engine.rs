// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::probe::{for_each_readable, iteration_check};
use crate::{Check, CheckKind, CorruptRecord, FailureMode, HealthReport};
use fseq_core::{Dataset, FseqError, ProgressSink, Record};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

const DEFAULT_ALTITUDE_COLUMN: &str = "ALT [ft]";
const DEFAULT_MIN_ALTITUDE_FT: f64 = 2000.0;
const DEFAULT_MIN_DURATION_S: i64 = 2000;

/// Configuration for [`HealthCheckEngine`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct HealthCheckConfig {
    pub altitude_column: String,
    pub min_altitude_ft: f64,
    pub min_duration_s: i64,
    /// Enabled checks, evaluated in this order.
    pub checks: Vec<CheckKind>,
}

impl Default for HealthCheckConfig {
    fn default() -> Self {
        Self {
            altitude_column: DEFAULT_ALTITUDE_COLUMN.to_string(),
            min_altitude_ft: DEFAULT_MIN_ALTITUDE_FT,
            min_duration_s: DEFAULT_MIN_DURATION_S,
            checks: CheckKind::ALL.to_vec(),
        }
    }
}

impl HealthCheckConfig {
    fn validate(&self) -> Result<(), FseqError> {
        if self.altitude_column.trim().is_empty() {
            return Err(FseqError::invalid_input(
                "HealthCheckConfig.altitude_column must not be empty",
            ));
        }
        if !self.min_altitude_ft.is_finite() {
            return Err(FseqError::invalid_input(format!(
                "HealthCheckConfig.min_altitude_ft must be finite; got {}",
                self.min_altitude_ft
            )));
        }
        let unique: BTreeSet<CheckKind> = self.checks.iter().copied().collect();
        if unique.len() != self.checks.len() {
            return Err(FseqError::invalid_input(format!(
                "HealthCheckConfig.checks must not repeat a check; got {:?}",
                self.checks
            )));
        }
        Ok(())
    }
}

/// Two-phase dataset health check.
///
/// Phase one probes for unreadable records and removes them. Phase two
/// derives the reference schema from the first remaining record and runs
/// every enabled check on every record, collecting failures into a
/// [`HealthReport`] instead of stopping at the first one.
pub struct HealthCheckEngine<'a> {
    config: HealthCheckConfig,
    progress: Option<&'a dyn ProgressSink>,
}

impl<'a> HealthCheckEngine<'a> {
    pub fn new(config: HealthCheckConfig) -> Result<Self, FseqError> {
        config.validate()?;
        Ok(Self {
            config,
            progress: None,
        })
    }

    /// Sets an optional progress sink, notified during both phases.
    pub fn with_progress_sink(mut self, progress: &'a dyn ProgressSink) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn config(&self) -> &HealthCheckConfig {
        &self.config
    }

    /// Binds the enabled checks to `required_columns` and the thresholds.
    pub fn checks_for(&self, required_columns: BTreeSet<String>) -> Vec<Check> {
        let mut required = Some(required_columns);
        self.config
            .checks
            .iter()
            .map(|kind| match kind {
                CheckKind::Continuity => Check::Continuity,
                CheckKind::NoMissingValues => Check::NoMissingValues,
                CheckKind::SchemaMatch => Check::SchemaMatch {
                    required: required.take().unwrap_or_default(),
                },
                CheckKind::Sufficiency => Check::Sufficiency {
                    column: self.config.altitude_column.clone(),
                    min_altitude_ft: self.config.min_altitude_ft,
                    min_duration_s: self.config.min_duration_s,
                },
            })
            .collect()
    }

    /// Runs both phases. Unreadable records found by the probe are removed
    /// from `dataset`; nothing else is.
    ///
    /// A reference candidate that turns unreadable after the probe is
    /// reported as corrupted and removed, and the next record takes its
    /// place. Fails with [`FseqError::EmptyDataset`] when no readable record
    /// remains to derive the reference schema from.
    pub fn run<D: Dataset>(&self, dataset: &mut D) -> Result<HealthReport, FseqError> {
        dataset.rewind();
        let result = self.run_phases(dataset);
        dataset.rewind();
        result
    }

    fn run_phases<D: Dataset>(&self, dataset: &mut D) -> Result<HealthReport, FseqError> {
        let probed = iteration_check(dataset, self.progress);
        let mut positions: Vec<usize> = probed.iter().map(|c| c.position).collect();
        positions.sort_unstable_by(|a, b| b.cmp(a));
        for position in positions {
            if let Some(name) = dataset.remove_at(position) {
                debug!(position, record = %name, "removed unreadable record");
            }
        }

        let (reference, lost) = reference_record(dataset)?;
        let checks = self.checks_for(reference.column_names());
        let ids: Vec<String> = checks.iter().map(Check::id).collect();
        let mut report = HealthReport::new(ids.iter().cloned());
        for record in probed.into_iter().chain(lost) {
            report.record_corruption(record);
        }

        let mut checked = 0usize;
        let late = for_each_readable(dataset, self.progress, |record| {
            checked += 1;
            for (check, id) in checks.iter().zip(&ids) {
                if let Err(failure) = check.run(&record, FailureMode::Raise) {
                    debug!(check = %id, %failure, "record failed check");
                    report.record_failure(id, record.name());
                }
            }
        });
        for record in late {
            report.record_corruption(record);
        }

        info!(
            checked,
            failing = report.failing_records().len(),
            corrupted = report.corrupted().len(),
            "health check complete"
        );
        Ok(report)
    }
}

/// Reads the first readable record, removing candidates that fail to read.
fn reference_record<D: Dataset>(
    dataset: &mut D,
) -> Result<(Record, Vec<CorruptRecord>), FseqError> {
    let mut lost = Vec::new();
    loop {
        match dataset.first() {
            Ok(record) => return Ok((record, lost)),
            Err(FseqError::Corrupted {
                position,
                name,
                reason,
            }) => {
                let Some(removed) = dataset.remove_at(position) else {
                    return Err(FseqError::Corrupted {
                        position,
                        name,
                        reason,
                    });
                };
                let name = if name.is_empty() { removed } else { name };
                warn!(
                    position,
                    record = %name,
                    reason = %reason,
                    "reference record became unreadable"
                );
                lost.push(CorruptRecord {
                    position,
                    name,
                    reason,
                });
            }
            Err(err) => return Err(err),
        }
    }
}
