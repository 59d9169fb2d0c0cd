use crate::field::LoadingExperience;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level PageSpeed Insights `runPagespeed` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PsiResponse {
    #[serde(rename = "lighthouseResult", skip_serializing_if = "Option::is_none")]
    pub lighthouse_result: Option<LighthouseResult>,
    #[serde(rename = "loadingExperience", skip_serializing_if = "Option::is_none")]
    pub loading_experience: Option<LoadingExperience>,
    #[serde(
        rename = "originLoadingExperience",
        skip_serializing_if = "Option::is_none"
    )]
    pub origin_loading_experience: Option<LoadingExperience>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ProviderError>,
}

/// Error object returned by Google APIs in place of a result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ProviderError {
    pub fn describe(&self) -> String {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => format!("{} - {}", code, message),
            (None, Some(message)) => message.clone(),
            (Some(code), None) => format!("provider error {}", code),
            (None, None) => "unknown provider error".to_string(),
        }
    }
}

/// Lighthouse run embedded in the PSI response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LighthouseResult {
    #[serde(rename = "requestedUrl", skip_serializing_if = "Option::is_none")]
    pub requested_url: Option<String>,
    #[serde(rename = "finalUrl", skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
    #[serde(default)]
    pub categories: HashMap<String, Category>,
    #[serde(default)]
    pub audits: HashMap<String, Audit>,
}

/// Scored category (only `performance` is consumed)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Category {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(rename = "auditRefs", default)]
    pub audit_refs: Vec<AuditRef>,
}

/// Reference from a category to one of its audits
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditRef {
    #[serde(default)]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// Individual Lighthouse audit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Audit {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(rename = "numericValue", skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<AuditDetails>,
}

/// Audit details; items are kept loosely typed since their shape varies per audit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditDetails {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "overallSavingsMs", skip_serializing_if = "Option::is_none")]
    pub overall_savings_ms: Option<f64>,
    #[serde(rename = "overallSavingsBytes", skip_serializing_if = "Option::is_none")]
    pub overall_savings_bytes: Option<f64>,
    #[serde(default)]
    pub items: Vec<serde_json::Value>,
}
