use super::{MetricKind, QualityBand};

/// Upper bounds (inclusive) for the good and needs-improvement bands,
/// in provider-native units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub good: f64,
    pub poor: f64,
}

const THRESHOLDS: &[(MetricKind, Thresholds)] = &[
    (MetricKind::Lcp, Thresholds { good: 2500.0, poor: 4000.0 }),
    (MetricKind::Inp, Thresholds { good: 200.0, poor: 500.0 }),
    (MetricKind::Cls, Thresholds { good: 0.1, poor: 0.25 }),
    (MetricKind::Fcp, Thresholds { good: 1800.0, poor: 3000.0 }),
    (MetricKind::Ttfb, Thresholds { good: 800.0, poor: 1800.0 }),
    (MetricKind::Fid, Thresholds { good: 100.0, poor: 300.0 }),
];

/// Look up the published thresholds for a metric
pub fn thresholds_for(kind: MetricKind) -> Option<Thresholds> {
    THRESHOLDS
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, thresholds)| *thresholds)
}

/// Classify a raw value into a quality band.
///
/// Returns `None` for metrics without published thresholds (TBT, Speed Index).
pub fn classify(kind: MetricKind, raw_value: f64) -> Option<QualityBand> {
    let thresholds = thresholds_for(kind)?;

    let band = if raw_value <= thresholds.good {
        QualityBand::Good
    } else if raw_value <= thresholds.poor {
        QualityBand::NeedsImprovement
    } else {
        QualityBand::Poor
    };

    Some(band)
}

/// Convert a raw value into its display value and unit
pub fn convert_to_display(kind: MetricKind, raw_value: f64) -> (f64, &'static str) {
    match kind {
        MetricKind::Lcp | MetricKind::Fcp | MetricKind::Ttfb => {
            (round_to(raw_value / 1000.0, 2), "s")
        }
        MetricKind::Inp | MetricKind::Tbt | MetricKind::Fid => (round_to(raw_value, 0), "ms"),
        MetricKind::Cls => (round_to(raw_value, 3), ""),
        MetricKind::SpeedIndex => (round_to(raw_value, 2), "ms"),
    }
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASSIFIED: [MetricKind; 6] = [
        MetricKind::Lcp,
        MetricKind::Inp,
        MetricKind::Cls,
        MetricKind::Fcp,
        MetricKind::Ttfb,
        MetricKind::Fid,
    ];

    #[test]
    fn test_boundaries_are_inclusive() {
        assert_eq!(classify(MetricKind::Lcp, 2500.0), Some(QualityBand::Good));
        assert_eq!(
            classify(MetricKind::Lcp, 2500.1),
            Some(QualityBand::NeedsImprovement)
        );
        assert_eq!(
            classify(MetricKind::Lcp, 4000.0),
            Some(QualityBand::NeedsImprovement)
        );
        assert_eq!(classify(MetricKind::Lcp, 4000.1), Some(QualityBand::Poor));
        assert_eq!(classify(MetricKind::Cls, 0.1), Some(QualityBand::Good));
        assert_eq!(classify(MetricKind::Cls, 0.26), Some(QualityBand::Poor));
    }

    #[test]
    fn test_unclassified_kinds() {
        assert_eq!(classify(MetricKind::Tbt, 10_000.0), None);
        assert_eq!(classify(MetricKind::SpeedIndex, 0.0), None);
    }

    #[test]
    fn test_classify_is_monotonic() {
        for kind in CLASSIFIED {
            let thresholds = thresholds_for(kind).unwrap();
            let step = thresholds.poor / 200.0;
            let mut previous = QualityBand::Good;
            for i in 0..=400 {
                let band = classify(kind, step * i as f64).unwrap();
                assert!(
                    band >= previous,
                    "{:?} moved from {:?} back to {:?}",
                    kind,
                    previous,
                    band
                );
                previous = band;
            }
        }
    }

    #[test]
    fn test_lcp_4200_is_poor_and_displays_in_seconds() {
        assert_eq!(classify(MetricKind::Lcp, 4200.0), Some(QualityBand::Poor));
        assert_eq!(convert_to_display(MetricKind::Lcp, 4200.0), (4.2, "s"));
    }

    #[test]
    fn test_display_units() {
        assert_eq!(convert_to_display(MetricKind::Inp, 187.6), (188.0, "ms"));
        assert_eq!(convert_to_display(MetricKind::Tbt, 42.2), (42.0, "ms"));
        assert_eq!(convert_to_display(MetricKind::Cls, 0.12345), (0.123, ""));
        assert_eq!(convert_to_display(MetricKind::Ttfb, 812.0), (0.81, "s"));
    }

    #[test]
    fn test_display_round_trips_within_precision() {
        let samples = [0.0, 1.0, 99.5, 812.3, 2499.9, 4200.0, 12_345.678];
        for raw in samples {
            let (seconds, _) = convert_to_display(MetricKind::Lcp, raw);
            assert!((seconds * 1000.0 - raw).abs() <= 5.0 + 1e-9);

            let (ms, _) = convert_to_display(MetricKind::Inp, raw);
            assert!((ms - raw).abs() <= 0.5 + 1e-9);

            let (cls, _) = convert_to_display(MetricKind::Cls, raw / 10_000.0);
            assert!((cls - raw / 10_000.0).abs() <= 0.0005 + 1e-9);
        }
    }
}
