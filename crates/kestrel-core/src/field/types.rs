use crate::lab::ProviderError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Chrome UX Report `queryRecord` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CruxResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<CruxRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ProviderError>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CruxRecord {
    #[serde(default)]
    pub key: RecordKey,
    #[serde(default)]
    pub metrics: HashMap<String, CruxMetric>,
    #[serde(rename = "collectionPeriod", skip_serializing_if = "Option::is_none")]
    pub collection_period: Option<CruxCollectionPeriod>,
}

/// What the record was queried for
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordKey {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(rename = "formFactor", skip_serializing_if = "Option::is_none")]
    pub form_factor: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CruxMetric {
    #[serde(default)]
    pub histogram: Vec<HistogramBucket>,
    #[serde(default)]
    pub percentiles: Percentiles,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistogramBucket {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub density: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Percentiles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p75: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CruxCollectionPeriod {
    #[serde(rename = "firstDate", skip_serializing_if = "Option::is_none")]
    pub first_date: Option<CruxDate>,
    #[serde(rename = "lastDate", skip_serializing_if = "Option::is_none")]
    pub last_date: Option<CruxDate>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CruxDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl CruxDate {
    pub fn to_iso(&self) -> String {
        format!("{}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// CrUX reports some numbers as JSON numbers and others as decimal strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Decimal {
    Number(f64),
    Text(String),
}

impl Decimal {
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Decimal::Number(value) => Some(*value),
            Decimal::Text(text) => text.trim().parse::<f64>().ok(),
        }
    }
}

/// Field data embedded in a PageSpeed Insights response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadingExperience {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub metrics: HashMap<String, LoadingMetric>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_fallback: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadingMetric {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentile: Option<f64>,
    #[serde(default)]
    pub distributions: Vec<LoadingDistribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadingDistribution {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proportion: Option<f64>,
}
