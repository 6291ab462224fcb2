// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Core types for flight-telemetry sequence analysis: labeled series, run
//! tables, records, and the cursor-based dataset contract.

pub mod dataset;
pub mod error;
pub mod observability;
pub mod record;
pub mod runs;
pub mod series;

pub use dataset::{Dataset, MemoryDataset, RecordSlot, Traversal};
pub use error::FseqError;
pub use observability::{ProgressSink, report_progress};
pub use record::Record;
pub use runs::{Run, RunExtent, RunTable, extract};
pub use series::{Label, LabeledSeries};
