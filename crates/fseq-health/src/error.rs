// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use thiserror::Error;

/// Why a single record failed a health check.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CheckFailure {
    /// The index is not the contiguous range `0..len`.
    #[error("record {record}: index breaks continuity at position {position} (found {found})")]
    Structural {
        record: String,
        position: usize,
        found: i64,
    },
    #[error("record {record}: {missing} missing values")]
    Quality { record: String, missing: usize },
    #[error("record {record}: columns differ from reference (missing {missing:?}, unexpected {unexpected:?})")]
    Schema {
        record: String,
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
    #[error(
        "record {record}: too short (max altitude {max_altitude:?}, max index {max_index:?})"
    )]
    Sufficiency {
        record: String,
        max_altitude: Option<f64>,
        max_index: Option<i64>,
    },
    #[error("record at position {position} ({record}) is unreadable: {reason}")]
    Corruption {
        position: usize,
        record: String,
        reason: String,
    },
}

impl CheckFailure {
    /// Name of the offending record.
    pub fn record(&self) -> &str {
        match self {
            Self::Structural { record, .. }
            | Self::Quality { record, .. }
            | Self::Schema { record, .. }
            | Self::Sufficiency { record, .. }
            | Self::Corruption { record, .. } => record,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Self::Structural { .. } => "structural",
            Self::Quality { .. } => "quality",
            Self::Schema { .. } => "schema",
            Self::Sufficiency { .. } => "sufficiency",
            Self::Corruption { .. } => "corruption",
        }
    }
}
