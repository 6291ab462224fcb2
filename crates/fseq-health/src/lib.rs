// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! Dataset health checks for flight-telemetry records.
//!
//! [`HealthCheckEngine::run`] isolates unreadable records, then evaluates a
//! battery of per-record [`Check`]s into a [`HealthReport`];
//! [`remove_failing`] prunes what the report names.

pub mod checks;
pub mod engine;
pub mod error;
pub mod filter;
pub mod probe;
pub mod report;

pub use checks::{Check, CheckKind, CheckOutcome, FailureMode};
pub use engine::{HealthCheckConfig, HealthCheckEngine};
pub use error::CheckFailure;
pub use filter::{remove_failing, remove_problematic_records};
pub use probe::{CorruptRecord, for_each_readable, iteration_check};
pub use report::HealthReport;
