// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use fseq_core::ProgressSink;
use std::cell::Cell;
use tracing::info;

/// [`ProgressSink`] that logs each completed tenth of a traversal.
#[derive(Debug)]
pub struct LogProgress {
    label: &'static str,
    last_decile: Cell<Option<u8>>,
}

impl LogProgress {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            last_decile: Cell::new(None),
        }
    }

    /// Decile of the last logged update.
    pub fn last_decile(&self) -> Option<u8> {
        self.last_decile.get()
    }
}

impl ProgressSink for LogProgress {
    fn on_progress(&self, fraction: f32) {
        let decile = (fraction.clamp(0.0, 1.0) * 10.0).floor() as u8;
        if self.last_decile.get().is_some_and(|last| decile == last) {
            return;
        }
        self.last_decile.set(Some(decile));
        info!(
            phase = self.label,
            percent = u32::from(decile) * 10,
            "progress"
        );
    }
}
