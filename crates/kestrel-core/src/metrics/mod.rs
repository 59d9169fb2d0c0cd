mod thresholds;

pub use thresholds::{Thresholds, classify, convert_to_display, round_to, thresholds_for};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Page-load quality metrics tracked across lab and field data
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Lcp,
    Inp,
    Cls,
    Fcp,
    Ttfb,
    Tbt,
    SpeedIndex,
    /// Legacy field metric, only used when INP is unavailable
    Fid,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Lcp => "LCP",
            MetricKind::Inp => "INP",
            MetricKind::Cls => "CLS",
            MetricKind::Fcp => "FCP",
            MetricKind::Ttfb => "TTFB",
            MetricKind::Tbt => "TBT",
            MetricKind::SpeedIndex => "Speed Index",
            MetricKind::Fid => "FID",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityBand {
    Good,
    NeedsImprovement,
    Poor,
}

impl QualityBand {
    /// Human-readable label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            QualityBand::Good => "Good",
            QualityBand::NeedsImprovement => "Needs Improvement",
            QualityBand::Poor => "Poor",
        }
    }
}

/// Analysis strategy (device emulation) used by the lab provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Mobile,
    Desktop,
}

impl Strategy {
    /// Parse a strategy name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "mobile" => Some(Strategy::Mobile),
            "desktop" => Some(Strategy::Desktop),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Mobile => "mobile",
            Strategy::Desktop => "desktop",
        }
    }

    /// Capitalized label used in reports
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Mobile => "Mobile",
            Strategy::Desktop => "Desktop",
        }
    }
}

/// A single lab measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricReading {
    pub kind: MetricKind,
    pub raw_value: f64,
    pub display_value: f64,
    pub display_unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_band: Option<QualityBand>,
}

impl MetricReading {
    pub fn new(kind: MetricKind, raw_value: f64) -> Self {
        let (display_value, unit) = convert_to_display(kind, raw_value);
        Self {
            kind,
            raw_value,
            display_value,
            display_unit: unit.to_string(),
            quality_band: classify(kind, raw_value),
        }
    }

    /// Value and unit joined for display, e.g. `4.2s`
    pub fn formatted(&self) -> String {
        format!("{}{}", self.display_value, self.display_unit)
    }
}

/// Real-user measurement at the 75th percentile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMetricReading {
    pub kind: MetricKind,
    pub p75: f64,
    pub p75_raw: f64,
    pub display_unit: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality_band: Option<QualityBand>,
    /// Density per band; empty when the provider histogram is incomplete
    pub distribution: BTreeMap<QualityBand, f64>,
}

impl FieldMetricReading {
    pub fn new(kind: MetricKind, p75_raw: f64, distribution: BTreeMap<QualityBand, f64>) -> Self {
        let (p75, unit) = convert_to_display(kind, p75_raw);
        Self {
            kind,
            p75,
            p75_raw,
            display_unit: unit.to_string(),
            quality_band: classify(kind, p75_raw),
            distribution,
        }
    }

    pub fn formatted(&self) -> String {
        format!("{}{}", self.p75, self.display_unit)
    }
}

/// Field readings keyed by metric
pub type FieldMetrics = BTreeMap<MetricKind, FieldMetricReading>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lab_reading_for_slow_lcp() {
        let reading = MetricReading::new(MetricKind::Lcp, 4200.0);
        assert_eq!(reading.quality_band, Some(QualityBand::Poor));
        assert_eq!(reading.display_value, 4.2);
        assert_eq!(reading.display_unit, "s");
        assert_eq!(reading.formatted(), "4.2s");
    }

    #[test]
    fn test_tbt_reading_has_no_band() {
        let reading = MetricReading::new(MetricKind::Tbt, 350.4);
        assert_eq!(reading.quality_band, None);
        assert_eq!(reading.formatted(), "350ms");
    }

    #[test]
    fn test_field_band_uses_raw_p75() {
        // 2504ms displays as 2.5s, which would be "good" if the display value were classified
        let reading = FieldMetricReading::new(MetricKind::Lcp, 2504.0, BTreeMap::new());
        assert_eq!(reading.p75, 2.5);
        assert_eq!(reading.quality_band, Some(QualityBand::NeedsImprovement));
    }

    #[test]
    fn test_band_serializes_snake_case() {
        let json = serde_json::to_string(&QualityBand::NeedsImprovement).unwrap();
        assert_eq!(json, "\"needs_improvement\"");
    }
}
