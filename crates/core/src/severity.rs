//! Vital-sign severity classification.
//!
//! A reading is graded one sign at a time and the worst level across all
//! present signs wins; levels are never averaged. Within a single sign the
//! bands overlap at their edges (36.0 °C sits on the High floor and inside
//! the Elevated band), so each sign is checked Critical, then High, then
//! Elevated, short-circuiting at the first match.

use api_shared::model::SeverityLevel;

/// One set of vital-sign observations to classify.
///
/// Every field is independently optional; an absent measurement contributes
/// nothing to the result (it does not count as Normal). Weight and height
/// are carried for completeness but have no severity bands.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VitalReading {
    pub temperature: Option<f64>,
    pub blood_pressure_systolic: Option<i32>,
    pub blood_pressure_diastolic: Option<i32>,
    pub heart_rate: Option<i32>,
    pub oxygen_saturation: Option<i32>,
    pub respiratory_rate: Option<i32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
}

/// Classifies a reading as the worst severity implied by any present sign.
///
/// Deterministic, side-effect free, and total over any combination of
/// present/absent fields; an empty reading is `Normal`.
pub fn classify_severity(reading: &VitalReading) -> SeverityLevel {
    let mut worst = SeverityLevel::Normal;

    if let Some(celsius) = reading.temperature {
        worst = worst.max(temperature_level(celsius));
    }
    if let Some(mmhg) = reading.blood_pressure_systolic {
        worst = worst.max(systolic_level(mmhg));
    }
    if let Some(bpm) = reading.heart_rate {
        worst = worst.max(heart_rate_level(bpm));
    }
    if let Some(percent) = reading.oxygen_saturation {
        worst = worst.max(oxygen_saturation_level(percent));
    }
    if let Some(breaths) = reading.respiratory_rate {
        worst = worst.max(respiratory_rate_level(breaths));
    }

    worst
}

fn temperature_level(celsius: f64) -> SeverityLevel {
    if celsius >= 40.0 || celsius <= 35.0 {
        SeverityLevel::Critical
    } else if celsius >= 39.0 || celsius <= 36.0 {
        SeverityLevel::High
    } else if celsius >= 38.0 || celsius <= 36.5 {
        SeverityLevel::Elevated
    } else {
        SeverityLevel::Normal
    }
}

fn systolic_level(mmhg: i32) -> SeverityLevel {
    if mmhg >= 180 || mmhg <= 90 {
        SeverityLevel::Critical
    } else if mmhg >= 160 || mmhg <= 100 {
        SeverityLevel::High
    } else if mmhg >= 140 || mmhg <= 110 {
        SeverityLevel::Elevated
    } else {
        SeverityLevel::Normal
    }
}

fn heart_rate_level(bpm: i32) -> SeverityLevel {
    if bpm >= 120 || bpm <= 50 {
        SeverityLevel::Critical
    } else if bpm >= 100 || bpm <= 60 {
        SeverityLevel::High
    } else if bpm >= 90 || bpm <= 70 {
        SeverityLevel::Elevated
    } else {
        SeverityLevel::Normal
    }
}

fn oxygen_saturation_level(percent: i32) -> SeverityLevel {
    if percent <= 90 {
        SeverityLevel::Critical
    } else if percent <= 95 {
        SeverityLevel::High
    } else if percent <= 97 {
        SeverityLevel::Elevated
    } else {
        SeverityLevel::Normal
    }
}

fn respiratory_rate_level(breaths_per_min: i32) -> SeverityLevel {
    if breaths_per_min >= 30 || breaths_per_min <= 8 {
        SeverityLevel::Critical
    } else if breaths_per_min >= 25 || breaths_per_min <= 10 {
        SeverityLevel::High
    } else if breaths_per_min >= 20 || breaths_per_min <= 12 {
        SeverityLevel::Elevated
    } else {
        SeverityLevel::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_reading_is_normal() {
        assert_eq!(
            classify_severity(&VitalReading::default()),
            SeverityLevel::Normal
        );
    }

    #[test]
    fn test_normal_temperature_alone_is_normal() {
        let reading = VitalReading {
            temperature: Some(37.0),
            ..Default::default()
        };
        assert_eq!(classify_severity(&reading), SeverityLevel::Normal);
    }

    #[test]
    fn test_high_fever_alone_is_critical() {
        let reading = VitalReading {
            temperature: Some(40.0),
            ..Default::default()
        };
        assert_eq!(classify_severity(&reading), SeverityLevel::Critical);
    }

    #[test]
    fn test_hypothermia_is_critical() {
        let reading = VitalReading {
            temperature: Some(35.0),
            ..Default::default()
        };
        assert_eq!(classify_severity(&reading), SeverityLevel::Critical);
    }

    #[test]
    fn test_overlapping_temperature_bands_resolve_to_worst() {
        // 36.0 satisfies both the High low bound and the Elevated high
        // bound; the Critical→High→Elevated check order picks High.
        let at_high_floor = VitalReading {
            temperature: Some(36.0),
            ..Default::default()
        };
        assert_eq!(classify_severity(&at_high_floor), SeverityLevel::High);

        let inside_elevated = VitalReading {
            temperature: Some(36.4),
            ..Default::default()
        };
        assert_eq!(classify_severity(&inside_elevated), SeverityLevel::Elevated);
    }

    #[test]
    fn test_worst_sign_wins_across_signs() {
        // Elevated temperature plus critical heart rate → Critical overall.
        let reading = VitalReading {
            temperature: Some(38.0),
            heart_rate: Some(130),
            ..Default::default()
        };
        assert_eq!(classify_severity(&reading), SeverityLevel::Critical);
    }

    #[test]
    fn test_later_mild_sign_does_not_downgrade() {
        // Critical systolic pressure first, then a merely elevated
        // respiratory rate; the result must stay Critical.
        let reading = VitalReading {
            blood_pressure_systolic: Some(185),
            respiratory_rate: Some(20),
            ..Default::default()
        };
        assert_eq!(classify_severity(&reading), SeverityLevel::Critical);
    }

    #[test]
    fn test_low_oxygen_saturation_bands() {
        for (percent, expected) in [
            (90, SeverityLevel::Critical),
            (93, SeverityLevel::High),
            (96, SeverityLevel::Elevated),
            (98, SeverityLevel::Normal),
        ] {
            let reading = VitalReading {
                oxygen_saturation: Some(percent),
                ..Default::default()
            };
            assert_eq!(classify_severity(&reading), expected, "SpO2 {percent}");
        }
    }

    #[test]
    fn test_heart_rate_low_bounds() {
        for (bpm, expected) in [
            (50, SeverityLevel::Critical),
            (55, SeverityLevel::High),
            (65, SeverityLevel::Elevated),
            (75, SeverityLevel::Normal),
        ] {
            let reading = VitalReading {
                heart_rate: Some(bpm),
                ..Default::default()
            };
            assert_eq!(classify_severity(&reading), expected, "heart rate {bpm}");
        }
    }

    #[test]
    fn test_respiratory_rate_bounds() {
        for (breaths, expected) in [
            (30, SeverityLevel::Critical),
            (8, SeverityLevel::Critical),
            (25, SeverityLevel::High),
            (20, SeverityLevel::Elevated),
            (16, SeverityLevel::Normal),
        ] {
            let reading = VitalReading {
                respiratory_rate: Some(breaths),
                ..Default::default()
            };
            assert_eq!(classify_severity(&reading), expected, "resp rate {breaths}");
        }
    }

    #[test]
    fn test_weight_and_height_never_contribute() {
        let reading = VitalReading {
            weight: Some(250.0),
            height: Some(210.0),
            ..Default::default()
        };
        assert_eq!(classify_severity(&reading), SeverityLevel::Normal);
    }
}
