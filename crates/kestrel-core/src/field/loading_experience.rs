use super::{FieldMetrics, LoadingExperience, LoadingMetric, distribution};
use crate::metrics::{FieldMetricReading, MetricKind};
use std::collections::BTreeMap;

/// PSI loading-experience keys, with the divisor that brings each percentile
/// into provider-native units (CLS is reported multiplied by 100)
const LOADING_METRICS: &[(&str, MetricKind, f64)] = &[
    ("LARGEST_CONTENTFUL_PAINT_MS", MetricKind::Lcp, 1.0),
    ("INTERACTION_TO_NEXT_PAINT", MetricKind::Inp, 1.0),
    ("CUMULATIVE_LAYOUT_SHIFT_SCORE", MetricKind::Cls, 100.0),
    ("FIRST_CONTENTFUL_PAINT_MS", MetricKind::Fcp, 1.0),
    ("EXPERIMENTAL_TIME_TO_FIRST_BYTE", MetricKind::Ttfb, 1.0),
];

const FID_KEY: &str = "FIRST_INPUT_DELAY_MS";

/// Normalize the field data embedded in a PageSpeed Insights response.
///
/// Returns `None` when the page (or origin) has no usable field data.
pub fn normalize_loading_experience(experience: &LoadingExperience) -> Option<FieldMetrics> {
    let mut metrics = BTreeMap::new();

    for (key, kind, divisor) in LOADING_METRICS {
        let Some(metric) = experience.metrics.get(*key) else {
            continue;
        };
        let Some(percentile) = metric.percentile else {
            continue;
        };
        metrics.insert(*kind, reading(*kind, percentile / divisor, metric));
    }

    // FID only stands in when INP is missing
    if !metrics.contains_key(&MetricKind::Inp)
        && let Some(fid) = experience.metrics.get(FID_KEY)
        && let Some(percentile) = fid.percentile
    {
        metrics.insert(MetricKind::Fid, reading(MetricKind::Fid, percentile, fid));
    }

    if metrics.is_empty() {
        tracing::debug!(
            "No field data in loading experience {}",
            experience.id.as_deref().unwrap_or("<unknown>")
        );
        return None;
    }

    Some(metrics)
}

fn reading(kind: MetricKind, raw: f64, metric: &LoadingMetric) -> FieldMetricReading {
    let densities: Vec<Option<f64>> = metric
        .distributions
        .iter()
        .map(|bucket| bucket.proportion)
        .collect();

    FieldMetricReading::new(kind, raw, distribution(&densities))
}
