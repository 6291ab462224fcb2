// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::CorruptRecord;
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of a full health check.
///
/// `failures` maps every enabled check id to the names of the records that
/// failed it, in traversal order. `corrupted` lists unreadable records from
/// both the probe and the battery phase.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HealthReport {
    failures: BTreeMap<String, Vec<String>>,
    corrupted: Vec<CorruptRecord>,
}

impl HealthReport {
    /// Report with an empty entry for each check id.
    pub fn new<I, S>(check_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            failures: check_ids
                .into_iter()
                .map(|id| (id.into(), Vec::new()))
                .collect(),
            corrupted: Vec::new(),
        }
    }

    pub fn record_failure(&mut self, check_id: &str, record: &str) {
        self.failures
            .entry(check_id.to_string())
            .or_default()
            .push(record.to_string());
    }

    pub fn record_corruption(&mut self, record: CorruptRecord) {
        self.corrupted.push(record);
    }

    pub fn failures(&self) -> &BTreeMap<String, Vec<String>> {
        &self.failures
    }

    /// Records failing `check_id`; empty for unknown ids.
    pub fn failing(&self, check_id: &str) -> &[String] {
        self.failures.get(check_id).map_or(&[], Vec::as_slice)
    }

    pub fn corrupted(&self) -> &[CorruptRecord] {
        &self.corrupted
    }

    /// Deduplicated union of every failing and corrupted record name.
    /// Corrupted records whose name could not be resolved are left out.
    pub fn failing_records(&self) -> BTreeSet<String> {
        self.failures
            .values()
            .flatten()
            .cloned()
            .chain(
                self.corrupted
                    .iter()
                    .filter(|c| !c.name.is_empty())
                    .map(|c| c.name.clone()),
            )
            .collect()
    }

    pub fn is_healthy(&self) -> bool {
        self.corrupted.is_empty() && self.failures.values().all(Vec::is_empty)
    }
}
