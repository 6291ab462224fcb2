// SPDX-License-Identifier: MIT OR Apache-2.0

#![no_main]

#[path = "common.rs"]
mod common;

use fseq_core::{LabeledSeries, RunExtent, extract};
use fseq_denoise::{LengthFilter, LengthFilterConfig, ModeFilter, ModeFilterConfig};
use fseq_events::{EventDetector, EventDetectorConfig, TargetLabel};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut cursor = common::ByteCursor::new(data);
    let window = common::bounded(cursor.next_u8(), 1, 64);
    let minimum_duration = common::bounded(cursor.next_u8(), 0, 32);
    let minimum_distance = i64::from(cursor.next_u8() % 16);
    let target = i64::from(cursor.next_u8() % 4);

    // Small alphabet keeps runs long enough to exercise merging.
    let values: Vec<i64> = cursor.rest().iter().map(|b| i64::from(b % 4)).collect();
    let n = values.len();
    let series = LabeledSeries::from_values(values);

    let unmerged = extract(&series, None);
    assert_eq!(unmerged.extent(), RunExtent::Inclusive);
    assert_eq!(unmerged.total_length(), n as i64);

    let merged = extract(&series, Some(minimum_duration));
    if let Some(last) = merged.runs().last() {
        assert_eq!(last.ending, n as i64);
    }

    let mode = ModeFilter::new(ModeFilterConfig { window }).expect("window is at least one");
    let cleaned = mode.denoise(&series).expect("mode filter keeps shape");
    assert_eq!(cleaned.len(), n);

    let length = LengthFilter::new(LengthFilterConfig { minimum_duration });
    let cleaned = length.denoise(&series).expect("length filter keeps shape");
    assert_eq!(cleaned.len(), n);

    let detector = EventDetector::new(EventDetectorConfig {
        column: "CL".to_string(),
        target: TargetLabel::Fixed(target),
        minimum_duration,
        minimum_distance,
    })
    .expect("detector config is valid");
    for occurrence in detector.detect(&series, target) {
        assert_eq!(occurrence.run.value, target);
    }
});
