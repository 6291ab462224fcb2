// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

pub mod length;
pub mod mode;

pub use length::{LengthFilter, LengthFilterConfig};
pub use mode::{ModeFilter, ModeFilterConfig};
