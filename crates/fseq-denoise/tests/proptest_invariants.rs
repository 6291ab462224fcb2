// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use fseq_core::{LabeledSeries, extract};
use fseq_denoise::{LengthFilter, LengthFilterConfig, ModeFilter, ModeFilterConfig};
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

const MIN_PROPTEST_CASES: u32 = 512;

fn proptest_cases() -> u32 {
    std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .map(|parsed| parsed.max(MIN_PROPTEST_CASES))
        .unwrap_or(MIN_PROPTEST_CASES)
}

fn noisy_phases() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec((0i64..5, 1usize..15), 0..30).prop_map(|blocks| {
        let mut out = Vec::new();
        for (label, width) in blocks {
            out.extend(std::iter::repeat_n(label, width));
        }
        out
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: proptest_cases(),
        max_shrink_iters: 1024,
        failure_persistence: Some(Box::new(FileFailurePersistence::Direct("proptest-regressions/tests/proptest_invariants.txt"))),
        .. ProptestConfig::default()
    })]

    #[test]
    fn mode_filter_preserves_shape_and_boundaries(values in noisy_phases(), window in 1usize..12) {
        let n = values.len();
        let series = LabeledSeries::from_values(values.clone());
        let filter = ModeFilter::new(ModeFilterConfig { window }).expect("window >= 1");
        let cleaned = filter.denoise(&series).expect("denoise");

        prop_assert_eq!(cleaned.len(), n);
        prop_assert_eq!(cleaned.timestamps(), series.timestamps());
        let head = window.min(n);
        prop_assert_eq!(&cleaned.values()[..head], &values[..head]);
        let tail = n.saturating_sub(window);
        prop_assert_eq!(&cleaned.values()[tail..], &values[tail..]);
    }

    #[test]
    fn mode_filter_only_emits_labels_present_in_input(values in noisy_phases(), window in 1usize..12) {
        let series = LabeledSeries::from_values(values.clone());
        let filter = ModeFilter::new(ModeFilterConfig { window }).expect("window >= 1");
        let cleaned = filter.denoise(&series).expect("denoise");
        for label in cleaned.values() {
            prop_assert!(values.contains(label));
        }
    }

    #[test]
    fn length_filter_preserves_shape(values in noisy_phases(), minimum_duration in 0usize..16) {
        let series = LabeledSeries::from_values(values);
        let cleaned = LengthFilter::new(LengthFilterConfig { minimum_duration })
            .denoise(&series)
            .expect("positional series never fails");
        prop_assert_eq!(cleaned.len(), series.len());
        prop_assert_eq!(cleaned.timestamps(), series.timestamps());
    }

    #[test]
    fn length_filter_leaves_no_short_run_after_first_survivor(
        values in noisy_phases(),
        minimum_duration in 0usize..16,
    ) {
        let series = LabeledSeries::from_values(values);
        let merged = extract(&series, Some(minimum_duration));
        let cleaned = LengthFilter::new(LengthFilterConfig { minimum_duration })
            .denoise(&series)
            .expect("positional series never fails");

        if let Some(first) = merged.runs().first() {
            let start = first.beginning as usize;
            let prefix = &series.values()[..start];
            prop_assert_eq!(&cleaned.values()[..start], prefix);

            let tail = LabeledSeries::from_values(cleaned.values()[start..].to_vec());
            for run in &extract(&tail, None) {
                prop_assert!(run.length > minimum_duration as i64);
            }
        } else {
            prop_assert_eq!(cleaned, series);
        }
    }

    #[test]
    fn length_filter_with_zero_threshold_is_identity(values in noisy_phases()) {
        let series = LabeledSeries::from_values(values);
        let cleaned = LengthFilter::new(LengthFilterConfig { minimum_duration: 0 })
            .denoise(&series)
            .expect("positional series never fails");
        prop_assert_eq!(cleaned, series);
    }
}
