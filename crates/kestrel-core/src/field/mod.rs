mod loading_experience;
mod types;

pub use crate::metrics::FieldMetrics;
pub use loading_experience::normalize_loading_experience;
pub use types::*;

use crate::lab::ProviderError;
use crate::metrics::{FieldMetricReading, MetricKind, QualityBand, round_to};
use crate::{Error, Normalizer, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// CrUX metric keys we understand; anything else in a record is skipped
const CRUX_METRICS: &[(&str, MetricKind)] = &[
    ("largest_contentful_paint", MetricKind::Lcp),
    ("interaction_to_next_paint", MetricKind::Inp),
    ("cumulative_layout_shift", MetricKind::Cls),
    ("first_contentful_paint", MetricKind::Fcp),
    ("experimental_time_to_first_byte", MetricKind::Ttfb),
    ("first_input_delay", MetricKind::Fid),
];

const NOT_FOUND_REASON: &str = "The requested URL or origin does not have enough data in CrUX";

/// Normalized real-user data for one URL or origin.
///
/// A record that is not in the dataset is a normal outcome for low-traffic
/// pages; it is reported with `in_crux = false` and a reason, not as an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldReport {
    pub in_crux: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_factor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_period: Option<CollectionPeriod>,
    pub metrics: FieldMetrics,
}

impl FieldReport {
    pub fn not_in_dataset(reason: impl Into<String>) -> Self {
        Self {
            in_crux: false,
            reason: Some(reason.into()),
            ..Default::default()
        }
    }

    /// Metrics when the record is usable, `None` otherwise
    pub fn usable_metrics(&self) -> Option<&FieldMetrics> {
        if self.in_crux && !self.metrics.is_empty() {
            Some(&self.metrics)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPeriod {
    pub first_date: String,
    pub last_date: String,
}

/// Turns a CrUX `queryRecord` response into a [`FieldReport`]
#[derive(Debug, Default)]
pub struct FieldNormalizer;

impl Normalizer for FieldNormalizer {
    type Input = CruxResponse;
    type Output = FieldReport;

    fn normalize(&self, response: &CruxResponse) -> Result<FieldReport> {
        tracing::debug!("Normalizing CrUX response");

        if let Some(error) = &response.error {
            if is_not_found(error) {
                tracing::info!("Record not in CrUX: {}", error.describe());
                return Ok(FieldReport::not_in_dataset(NOT_FOUND_REASON));
            }
            return Err(Error::MalformedInput(format!(
                "CrUX returned an error: {}",
                error.describe()
            )));
        }

        let Some(record) = &response.record else {
            return Ok(FieldReport::not_in_dataset("CrUX response contained no record"));
        };

        let metrics = parse_record_metrics(record);
        if metrics.is_empty() {
            return Ok(FieldReport::not_in_dataset(
                "CrUX record contains no recognized metrics",
            ));
        }

        let collection_period = record.collection_period.as_ref().and_then(|period| {
            match (&period.first_date, &period.last_date) {
                (Some(first), Some(last)) => Some(CollectionPeriod {
                    first_date: first.to_iso(),
                    last_date: last.to_iso(),
                }),
                _ => None,
            }
        });

        tracing::info!("Field normalization complete: {} metrics", metrics.len());

        Ok(FieldReport {
            in_crux: true,
            reason: None,
            url: record.key.url.clone(),
            origin: record.key.origin.clone(),
            form_factor: record.key.form_factor.clone(),
            collection_period,
            metrics,
        })
    }
}

fn is_not_found(error: &ProviderError) -> bool {
    error.code == Some(404) || error.status.as_deref() == Some("NOT_FOUND")
}

fn parse_record_metrics(record: &CruxRecord) -> FieldMetrics {
    let mut metrics = BTreeMap::new();

    for (key, metric) in &record.metrics {
        let Some(kind) = crux_kind(key) else {
            tracing::debug!("Skipping unrecognized CrUX metric: {}", key);
            continue;
        };

        let Some(p75_raw) = metric.percentiles.p75.as_ref().and_then(Decimal::to_f64) else {
            tracing::debug!("CrUX metric {} has no usable p75", key);
            continue;
        };

        let densities: Vec<Option<f64>> = metric
            .histogram
            .iter()
            .map(|bucket| bucket.density.as_ref().and_then(Decimal::to_f64))
            .collect();

        metrics.insert(
            kind,
            FieldMetricReading::new(kind, p75_raw, distribution(&densities)),
        );
    }

    metrics
}

fn crux_kind(key: &str) -> Option<MetricKind> {
    let key = key.to_lowercase();
    CRUX_METRICS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, kind)| *kind)
}

/// Build a good / needs-improvement / poor distribution from bucket densities.
///
/// Fewer than three buckets, or an unreadable density, yields an empty map.
pub(crate) fn distribution(densities: &[Option<f64>]) -> BTreeMap<QualityBand, f64> {
    let bands = [
        QualityBand::Good,
        QualityBand::NeedsImprovement,
        QualityBand::Poor,
    ];

    if densities.len() < bands.len() {
        return BTreeMap::new();
    }

    let mut result = BTreeMap::new();
    for (band, density) in bands.into_iter().zip(densities) {
        match density {
            Some(value) => {
                result.insert(band, round_to(*value, 3));
            }
            None => return BTreeMap::new(),
        }
    }
    result
}
