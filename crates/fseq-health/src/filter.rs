// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::{HealthCheckEngine, HealthReport};
use fseq_core::{Dataset, FseqError};
use tracing::{debug, info};

/// Removes every record named in `report` from `dataset`.
///
/// Records are removed by name, so earlier removals never shift a later
/// target. Returns the names actually removed, sorted.
pub fn remove_failing<D: Dataset>(dataset: &mut D, report: &HealthReport) -> Vec<String> {
    let mut removed = Vec::new();
    for name in report.failing_records() {
        if dataset.remove_named(&name) {
            debug!(record = %name, "removed failing record");
            removed.push(name);
        }
    }
    dataset.rewind();
    info!(
        removed = removed.len(),
        remaining = dataset.len(),
        "dataset filtered"
    );
    removed
}

/// Runs the full health check, then removes every failing record.
pub fn remove_problematic_records<D: Dataset>(
    dataset: &mut D,
    engine: &HealthCheckEngine<'_>,
) -> Result<HealthReport, FseqError> {
    let report = engine.run(dataset)?;
    remove_failing(dataset, &report);
    Ok(report)
}
