// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::CheckFailure;
use fseq_core::{Dataset, FseqError, ProgressSink, Record, report_progress};
use tracing::warn;

/// A dataset position the storage layer could not read.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorruptRecord {
    pub position: usize,
    pub name: String,
    pub reason: String,
}

impl CorruptRecord {
    pub fn to_failure(&self) -> CheckFailure {
        CheckFailure::Corruption {
            position: self.position,
            record: self.name.clone(),
            reason: self.reason.clone(),
        }
    }
}

/// Traverses `dataset` from the start, handing every readable record to
/// `visit` and collecting the unreadable positions.
///
/// After a failure at position `p` the traversal resumes at `p + 1`, so every
/// readable position is read exactly once and every unreadable one is
/// reported once. The dataset is rewound before and after.
pub fn for_each_readable<D, F>(
    dataset: &mut D,
    progress: Option<&dyn ProgressSink>,
    mut visit: F,
) -> Vec<CorruptRecord>
where
    D: Dataset,
    F: FnMut(Record),
{
    dataset.rewind();
    let total = dataset.len();
    let mut done = 0usize;
    let mut from = 0usize;
    let mut corrupted = Vec::new();

    loop {
        let mut failure = None;
        for item in dataset.slice(from) {
            match item {
                Ok(record) => {
                    visit(record);
                    done += 1;
                    report_progress(progress, done, total);
                }
                Err(err) => {
                    failure = Some(err);
                    break;
                }
            }
        }
        let Some(err) = failure else {
            break;
        };

        // The traversal leaves the cursor on the failing position.
        let position = dataset.position().max(from);
        let record = corrupt_record(dataset, position, err);
        warn!(
            position,
            record = %record.name,
            reason = %record.reason,
            "skipping unreadable record"
        );
        corrupted.push(record);
        done += 1;
        report_progress(progress, done, total);
        from = position + 1;
    }

    dataset.rewind();
    corrupted
}

/// Finds every unreadable position in `dataset` without stopping early.
pub fn iteration_check<D: Dataset>(
    dataset: &mut D,
    progress: Option<&dyn ProgressSink>,
) -> Vec<CorruptRecord> {
    for_each_readable(dataset, progress, |_| {})
}

/// Names the record behind a read failure, falling back to the dataset's
/// listing when the error carries no name. Stays empty if neither knows it.
fn corrupt_record<D: Dataset>(dataset: &D, position: usize, err: FseqError) -> CorruptRecord {
    let (name, reason) = match err {
        FseqError::Corrupted { name, reason, .. } => (name, reason),
        other => (String::new(), other.to_string()),
    };
    let name = if name.is_empty() {
        dataset
            .record_names()
            .get(position)
            .cloned()
            .unwrap_or_default()
    } else {
        name
    };
    CorruptRecord {
        position,
        name,
        reason,
    }
}
