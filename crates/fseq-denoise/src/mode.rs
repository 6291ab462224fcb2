// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use fseq_core::{FseqError, Label, LabeledSeries};
use std::collections::BTreeMap;

const DEFAULT_MODE_WINDOW: usize = 300;

/// Configuration for [`ModeFilter`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModeFilterConfig {
    pub window: usize,
}

impl Default for ModeFilterConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_MODE_WINDOW,
        }
    }
}

impl ModeFilterConfig {
    fn validate(&self) -> Result<(), FseqError> {
        if self.window == 0 {
            return Err(FseqError::invalid_input(
                "ModeFilterConfig.window must be >= 1; got 0",
            ));
        }
        Ok(())
    }

    /// Positions after `i` covered by the centered window at `i`.
    fn trailing_offset(&self) -> usize {
        (self.window - 1) / 2
    }
}

/// Centered rolling-mode denoiser.
///
/// Every position at least `window` away from both ends takes the most
/// frequent label of its window, ties going to the smallest label. The first
/// `window` and last `window` positions are copied through unchanged.
#[derive(Clone, Debug)]
pub struct ModeFilter {
    config: ModeFilterConfig,
}

impl ModeFilter {
    pub fn new(config: ModeFilterConfig) -> Result<Self, FseqError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ModeFilterConfig {
        &self.config
    }

    pub fn denoise<L: Label>(
        &self,
        series: &LabeledSeries<L>,
    ) -> Result<LabeledSeries<L>, FseqError> {
        let values = series.values();
        let n = values.len();
        let window = self.config.window;
        if n <= window.saturating_mul(2) {
            return Ok(series.clone());
        }

        let offset = self.config.trailing_offset();
        let mut out = values.to_vec();
        let mut counts: BTreeMap<L, usize> = BTreeMap::new();

        // Window of the first filtered position `window` is [offset + 1, offset + window].
        for &label in &values[offset + 1..=offset + window] {
            *counts.entry(label).or_insert(0) += 1;
        }

        for i in window..n - window {
            if i > window {
                evict(&mut counts, values[i + offset - window]);
                *counts.entry(values[i + offset]).or_insert(0) += 1;
            }
            if let Some(label) = window_mode(&counts) {
                out[i] = label;
            }
        }

        series.with_values(out)
    }
}

fn evict<L: Label>(counts: &mut BTreeMap<L, usize>, label: L) {
    if let Some(count) = counts.get_mut(&label) {
        *count -= 1;
        if *count == 0 {
            counts.remove(&label);
        }
    }
}

fn window_mode<L: Label>(counts: &BTreeMap<L, usize>) -> Option<L> {
    let mut best: Option<(L, usize)> = None;
    for (&label, &count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((label, count));
        }
    }
    best.map(|(label, _)| label)
}
