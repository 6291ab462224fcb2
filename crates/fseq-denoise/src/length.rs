// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use fseq_core::{FseqError, Label, LabeledSeries, extract};

const DEFAULT_MINIMUM_DURATION: usize = 2 * 60;

/// Configuration for [`LengthFilter`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LengthFilterConfig {
    /// Runs of this length or shorter are relabeled.
    pub minimum_duration: usize,
}

impl Default for LengthFilterConfig {
    fn default() -> Self {
        Self {
            minimum_duration: DEFAULT_MINIMUM_DURATION,
        }
    }
}

/// Run-length denoiser built on the forward-merge policy of [`extract`].
///
/// Every stretch of runs no longer than `minimum_duration` takes the label of
/// the preceding surviving run. Stretches before the first survivor are left
/// untouched. Cost is one write per position covered by a survivor, with no
/// windowed recomputation.
#[derive(Clone, Debug, Default)]
pub struct LengthFilter {
    config: LengthFilterConfig,
}

impl LengthFilter {
    pub fn new(config: LengthFilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LengthFilterConfig {
        &self.config
    }

    pub fn denoise<L: Label>(
        &self,
        series: &LabeledSeries<L>,
    ) -> Result<LabeledSeries<L>, FseqError> {
        let table = extract(series, Some(self.config.minimum_duration));
        let mut values = series.values().to_vec();
        let n = values.len();

        for run in &table {
            let start = extent_position(run.beginning, n)?;
            let end = extent_position(run.ending, n)?;
            if start < end {
                values[start..end].fill(run.value);
            }
        }

        series.with_values(values)
    }
}

/// Run extents address positions; anything past the end is clamped.
fn extent_position(extent: i64, n: usize) -> Result<usize, FseqError> {
    let position = usize::try_from(extent).map_err(|_| {
        FseqError::invalid_input(format!(
            "run extent {extent} cannot address a series position"
        ))
    })?;
    Ok(position.min(n))
}
