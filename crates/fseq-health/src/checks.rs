// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use crate::CheckFailure;
use fseq_core::Record;
use std::collections::BTreeSet;

/// How a check reports a failing record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FailureMode {
    /// Failures come back as a typed [`CheckFailure`].
    #[default]
    Raise,
    /// Failures come back as `Ok(false)`.
    Silence,
}

/// Selectable check families.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CheckKind {
    Continuity,
    NoMissingValues,
    SchemaMatch,
    Sufficiency,
}

impl CheckKind {
    pub const ALL: [CheckKind; 4] = [
        CheckKind::Continuity,
        CheckKind::NoMissingValues,
        CheckKind::SchemaMatch,
        CheckKind::Sufficiency,
    ];
}

/// A check with its parameters bound.
#[derive(Clone, Debug, PartialEq)]
pub enum Check {
    Continuity,
    NoMissingValues,
    SchemaMatch {
        required: BTreeSet<String>,
    },
    /// Passes when the record climbs high enough or lasts long enough.
    Sufficiency {
        column: String,
        min_altitude_ft: f64,
        min_duration_s: i64,
    },
}

/// Result of evaluating one check on one record.
#[derive(Clone, Debug, PartialEq)]
pub enum CheckOutcome {
    Pass,
    Fail(CheckFailure),
}

impl CheckOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }

    pub fn into_result(self) -> Result<(), CheckFailure> {
        match self {
            Self::Pass => Ok(()),
            Self::Fail(failure) => Err(failure),
        }
    }
}

impl Check {
    pub fn kind(&self) -> CheckKind {
        match self {
            Self::Continuity => CheckKind::Continuity,
            Self::NoMissingValues => CheckKind::NoMissingValues,
            Self::SchemaMatch { .. } => CheckKind::SchemaMatch,
            Self::Sufficiency { .. } => CheckKind::Sufficiency,
        }
    }

    /// Stable identifier used as the report key.
    pub fn id(&self) -> String {
        match self {
            Self::Continuity => "continuity".to_string(),
            Self::NoMissingValues => "no_missing_values".to_string(),
            Self::SchemaMatch { required } => {
                let columns: Vec<&str> = required.iter().map(String::as_str).collect();
                format!("schema_match({})", columns.join(","))
            }
            Self::Sufficiency {
                column,
                min_altitude_ft,
                min_duration_s,
            } => format!(
                "sufficiency({column} >= {min_altitude_ft} || index >= {min_duration_s})"
            ),
        }
    }

    pub fn evaluate(&self, record: &Record) -> CheckOutcome {
        match self {
            Self::Continuity => continuity(record),
            Self::NoMissingValues => {
                let missing = record.missing_count();
                if missing == 0 {
                    CheckOutcome::Pass
                } else {
                    CheckOutcome::Fail(CheckFailure::Quality {
                        record: record.name().to_string(),
                        missing,
                    })
                }
            }
            Self::SchemaMatch { required } => schema_match(record, required),
            Self::Sufficiency {
                column,
                min_altitude_ft,
                min_duration_s,
            } => {
                let max_altitude = record.column_max(column);
                let max_index = record.max_index();
                let high_enough = max_altitude.is_some_and(|alt| alt >= *min_altitude_ft);
                let long_enough = max_index.is_some_and(|idx| idx >= *min_duration_s);
                // A record without the altitude column cannot prove either branch.
                let has_altitude = record.column(column).is_some();
                if has_altitude && (high_enough || long_enough) {
                    CheckOutcome::Pass
                } else {
                    CheckOutcome::Fail(CheckFailure::Sufficiency {
                        record: record.name().to_string(),
                        max_altitude,
                        max_index,
                    })
                }
            }
        }
    }

    /// Evaluates the check, reporting failure according to `mode`.
    pub fn run(&self, record: &Record, mode: FailureMode) -> Result<bool, CheckFailure> {
        match (self.evaluate(record), mode) {
            (CheckOutcome::Pass, _) => Ok(true),
            (CheckOutcome::Fail(failure), FailureMode::Raise) => Err(failure),
            (CheckOutcome::Fail(_), FailureMode::Silence) => Ok(false),
        }
    }
}

fn continuity(record: &Record) -> CheckOutcome {
    let gap = record
        .index()
        .iter()
        .enumerate()
        .find(|&(pos, &value)| i64::try_from(pos).ok() != Some(value));
    match gap {
        None => CheckOutcome::Pass,
        Some((position, &found)) => CheckOutcome::Fail(CheckFailure::Structural {
            record: record.name().to_string(),
            position,
            found,
        }),
    }
}

fn schema_match(record: &Record, required: &BTreeSet<String>) -> CheckOutcome {
    let present = record.column_names();
    if &present == required {
        return CheckOutcome::Pass;
    }
    CheckOutcome::Fail(CheckFailure::Schema {
        record: record.name().to_string(),
        missing: required.difference(&present).cloned().collect(),
        unexpected: present.difference(required).cloned().collect(),
    })
}
