// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

use fseq_core::FseqError;
use fseq_denoise::{LengthFilterConfig, ModeFilterConfig};
use fseq_events::EventDetectorConfig;
use fseq_health::HealthCheckConfig;
use serde::{Deserialize, Serialize};

/// Settings file layout. Every section is optional and falls back to its
/// defaults independently.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub health: HealthCheckConfig,
    pub events: EventDetectorConfig,
    pub mode_filter: ModeFilterConfig,
    pub length_filter: LengthFilterConfig,
}

impl Settings {
    pub fn from_json(raw: &str) -> Result<Self, FseqError> {
        serde_json::from_str(raw)
            .map_err(|err| FseqError::invalid_input(format!("invalid settings JSON: {err}")))
    }
}

#[cfg(test)]
mod tests {
    use super::Settings;
    use fseq_events::TargetLabel;
    use fseq_health::CheckKind;

    #[test]
    fn empty_document_yields_defaults() {
        let parsed = Settings::from_json("{}").expect("parse");
        assert_eq!(parsed, Settings::default());
    }

    #[test]
    fn sections_default_independently() {
        let settings = Settings::from_json(
            r#"{
                "health": {"min_altitude_ft": 1500.0, "checks": ["continuity", "sufficiency"]},
                "events": {"target": {"Fixed": 3}},
                "mode_filter": {"window": 60}
            }"#,
        )
        .expect("parse");
        assert_eq!(settings.health.min_altitude_ft, 1500.0);
        assert_eq!(settings.health.altitude_column, "ALT [ft]");
        assert_eq!(
            settings.health.checks,
            vec![CheckKind::Continuity, CheckKind::Sufficiency]
        );
        assert_eq!(settings.events.target, TargetLabel::Fixed(3));
        assert_eq!(settings.events.minimum_duration, 20);
        assert_eq!(settings.mode_filter.window, 60);
        assert_eq!(settings.length_filter.minimum_duration, 120);
    }

    #[test]
    fn unknown_section_is_rejected() {
        let err = Settings::from_json(r#"{"healthh": {}}"#).expect_err("typo must fail");
        assert!(err.to_string().contains("invalid settings JSON"));
    }
}
