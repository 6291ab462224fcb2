// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod progress;
pub mod settings;
pub mod store;

pub use progress::LogProgress;
pub use settings::Settings;
pub use store::{DirectoryDataset, load_record};
