// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use thiserror::Error;

/// Errors shared by every fseq crate.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FseqError {
    /// Caller-supplied data or configuration is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The storage layer cannot read the record at `position`.
    #[error("record at position {position} ({name}) is unreadable: {reason}")]
    Corrupted {
        position: usize,
        name: String,
        reason: String,
    },
    /// No record is available to derive the reference schema from.
    #[error("dataset is empty; required columns cannot be derived")]
    EmptyDataset,
    #[error("record {record} has no column '{column}'")]
    MissingColumn { record: String, column: String },
}

impl FseqError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn corrupted(position: usize, name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Corrupted {
            position,
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn missing_column(record: impl Into<String>, column: impl Into<String>) -> Self {
        Self::MissingColumn {
            record: record.into(),
            column: column.into(),
        }
    }

    /// Stable machine-readable code for reports and CLI envelopes.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Corrupted { .. } => "corrupted",
            Self::EmptyDataset => "empty_dataset",
            Self::MissingColumn { .. } => "missing_column",
        }
    }
}
