// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

/// Receives the completed fraction of a long traversal.
pub trait ProgressSink {
    fn on_progress(&self, fraction: f32);
}

/// Emits `done / total` to `sink`, clamped to `[0, 1]`.
///
/// Non-finite fractions (an empty traversal) are dropped.
pub fn report_progress(sink: Option<&dyn ProgressSink>, done: usize, total: usize) {
    let Some(sink) = sink else {
        return;
    };
    let fraction = done as f32 / total as f32;
    if !fraction.is_finite() {
        return;
    }
    sink.on_progress(fraction.clamp(0.0, 1.0));
}
