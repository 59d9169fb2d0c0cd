mod types;

pub use types::*;

use crate::field::{FieldMetrics, normalize_loading_experience};
use crate::metrics::{MetricKind, MetricReading};
use crate::{Error, Normalizer, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Audits that carry a lab metric value
const METRIC_AUDITS: &[(&str, MetricKind)] = &[
    ("largest-contentful-paint", MetricKind::Lcp),
    ("experimental-interaction-to-next-paint", MetricKind::Inp),
    ("cumulative-layout-shift", MetricKind::Cls),
    ("first-contentful-paint", MetricKind::Fcp),
    ("server-response-time", MetricKind::Ttfb),
    ("total-blocking-time", MetricKind::Tbt),
    ("speed-index", MetricKind::SpeedIndex),
];

/// Audits surfaced as diagnostics when they are not passing
const DIAGNOSTIC_AUDITS: &[&str] = &[
    "largest-contentful-paint-element",
    "layout-shift-elements",
    "long-tasks",
    "render-blocking-resources",
    "unused-javascript",
    "unused-css-rules",
    "modern-image-formats",
    "uses-responsive-images",
    "offscreen-images",
];

const PERFORMANCE_CATEGORY: &str = "performance";
const OPPORTUNITY_GROUP: &str = "load-opportunities";

/// Audits scoring at or above this are considered passing
const PASSING_SCORE: f64 = 0.9;

/// Normalized result of one (URL, strategy) lab run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    pub performance_score: u8,
    pub metrics: BTreeMap<MetricKind, MetricReading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_metrics: Option<FieldMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_field_metrics: Option<FieldMetrics>,
    pub opportunities: Vec<Opportunity>,
    pub diagnostics: Vec<Diagnostic>,
}

impl StrategyResult {
    pub fn metric(&self, kind: MetricKind) -> Option<&MetricReading> {
        self.metrics.get(&kind)
    }

    /// Opportunity with the highest estimated savings
    pub fn top_opportunity(&self) -> Option<&Opportunity> {
        self.opportunities.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<DiagnosticTarget>,
}

/// What a diagnostic points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticTarget {
    Element(String),
    Resource(String),
}

/// Turns a PageSpeed Insights response into a [`StrategyResult`]
#[derive(Debug, Default)]
pub struct LabNormalizer;

impl Normalizer for LabNormalizer {
    type Input = PsiResponse;
    type Output = StrategyResult;

    fn normalize(&self, response: &PsiResponse) -> Result<StrategyResult> {
        tracing::debug!("Normalizing PageSpeed Insights response");

        if let Some(error) = &response.error {
            return Err(Error::MalformedInput(format!(
                "provider returned an error: {}",
                error.describe()
            )));
        }

        let lighthouse = response
            .lighthouse_result
            .as_ref()
            .ok_or_else(|| Error::MalformedInput("missing lighthouseResult".to_string()))?;

        let result = StrategyResult {
            performance_score: performance_score(lighthouse),
            metrics: parse_metrics(lighthouse),
            field_metrics: response
                .loading_experience
                .as_ref()
                .and_then(normalize_loading_experience),
            origin_field_metrics: response
                .origin_loading_experience
                .as_ref()
                .and_then(normalize_loading_experience),
            opportunities: parse_opportunities(lighthouse),
            diagnostics: parse_diagnostics(lighthouse),
        };

        tracing::info!(
            "Lab normalization complete: score={}, {} metrics, {} opportunities, {} diagnostics",
            result.performance_score,
            result.metrics.len(),
            result.opportunities.len(),
            result.diagnostics.len()
        );

        Ok(result)
    }
}

/// A missing category and a zero score both yield 0
fn performance_score(lighthouse: &LighthouseResult) -> u8 {
    let score = lighthouse
        .categories
        .get(PERFORMANCE_CATEGORY)
        .and_then(|category| category.score)
        .unwrap_or(0.0);

    (score * 100.0).round().clamp(0.0, 100.0) as u8
}

fn parse_metrics(lighthouse: &LighthouseResult) -> BTreeMap<MetricKind, MetricReading> {
    let mut metrics = BTreeMap::new();

    for (audit_id, kind) in METRIC_AUDITS {
        let Some(audit) = lighthouse.audits.get(*audit_id) else {
            continue;
        };
        match audit.numeric_value {
            Some(value) => {
                metrics.insert(*kind, MetricReading::new(*kind, value));
            }
            None => tracing::debug!("Audit {} has no numeric value", audit_id),
        }
    }

    metrics
}

fn parse_opportunities(lighthouse: &LighthouseResult) -> Vec<Opportunity> {
    let Some(category) = lighthouse.categories.get(PERFORMANCE_CATEGORY) else {
        return vec![];
    };

    let mut opportunities: Vec<Opportunity> = category
        .audit_refs
        .iter()
        .filter(|audit_ref| audit_ref.group.as_deref() == Some(OPPORTUNITY_GROUP))
        .filter_map(|audit_ref| lighthouse.audits.get(&audit_ref.id).map(|a| (audit_ref, a)))
        .filter(|(_, audit)| matches!(audit.score, Some(score) if score < PASSING_SCORE))
        .map(|(audit_ref, audit)| {
            let details = audit.details.as_ref();
            Opportunity {
                id: audit_ref.id.clone(),
                title: audit.title.clone(),
                description: audit.description.clone(),
                savings_ms: details
                    .and_then(|d| d.overall_savings_ms)
                    .map(non_negative_round),
                savings_bytes: details
                    .and_then(|d| d.overall_savings_bytes)
                    .map(non_negative_round),
            }
        })
        .collect();

    // Stable, so equal savings keep provider order
    opportunities.sort_by(|a, b| b.savings_ms.unwrap_or(0).cmp(&a.savings_ms.unwrap_or(0)));

    opportunities
}

fn parse_diagnostics(lighthouse: &LighthouseResult) -> Vec<Diagnostic> {
    DIAGNOSTIC_AUDITS
        .iter()
        .filter_map(|audit_id| lighthouse.audits.get(*audit_id).map(|a| (*audit_id, a)))
        .filter(|(_, audit)| audit.score.is_none_or(|score| score < PASSING_SCORE))
        .map(|(audit_id, audit)| Diagnostic {
            id: audit_id.to_string(),
            title: audit.title.clone(),
            description: audit.description.clone(),
            target: audit.details.as_ref().and_then(diagnostic_target),
        })
        .collect()
}

/// Only the first detail item is inspected; a node selector wins over a URL
fn diagnostic_target(details: &AuditDetails) -> Option<DiagnosticTarget> {
    let item = details.items.first()?;

    let selector = item
        .get("node")
        .and_then(|node| node.get("selector"))
        .and_then(|selector| selector.as_str())
        .filter(|selector| !selector.is_empty());
    if let Some(selector) = selector {
        return Some(DiagnosticTarget::Element(selector.to_string()));
    }

    item.get("url")
        .and_then(|url| url.as_str())
        .map(|url| DiagnosticTarget::Resource(url.to_string()))
}

fn non_negative_round(value: f64) -> u64 {
    value.max(0.0).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::QualityBand;
    use serde_json::json;

    fn response(value: serde_json::Value) -> PsiResponse {
        serde_json::from_value(value).unwrap()
    }

    fn opportunity_audit(score: Option<f64>, savings_ms: Option<f64>) -> serde_json::Value {
        let mut details = json!({ "type": "opportunity", "items": [] });
        if let Some(ms) = savings_ms {
            details["overallSavingsMs"] = json!(ms);
        }
        json!({ "title": "t", "description": "d", "score": score, "details": details })
    }

    #[test]
    fn test_missing_lighthouse_result_is_malformed() {
        let result = LabNormalizer.normalize(&response(json!({ "id": "x" })));
        assert!(matches!(result, Err(Error::MalformedInput(_))));
    }

    #[test]
    fn test_provider_error_is_malformed() {
        let result = LabNormalizer.normalize(&response(json!({
            "error": { "code": 429, "message": "Quota exceeded" }
        })));
        match result {
            Err(Error::MalformedInput(message)) => assert!(message.contains("429")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_performance_category_scores_zero() {
        let result = LabNormalizer
            .normalize(&response(json!({ "lighthouseResult": { "audits": {} } })))
            .unwrap();
        assert_eq!(result.performance_score, 0);
        assert!(result.metrics.is_empty());
        assert!(result.opportunities.is_empty());
    }

    #[test]
    fn test_score_and_metrics() {
        let result = LabNormalizer
            .normalize(&response(json!({
                "lighthouseResult": {
                    "categories": { "performance": { "score": 0.654, "auditRefs": [] } },
                    "audits": {
                        "largest-contentful-paint": { "numericValue": 4200.0, "score": 0.3 },
                        "cumulative-layout-shift": { "numericValue": 0.0, "score": 1 },
                        "total-blocking-time": { "numericValue": 120.4 },
                        "speed-index": { "title": "Speed Index" }
                    }
                }
            })))
            .unwrap();

        assert_eq!(result.performance_score, 65);

        let lcp = result.metric(MetricKind::Lcp).unwrap();
        assert_eq!(lcp.quality_band, Some(QualityBand::Poor));
        assert_eq!(lcp.formatted(), "4.2s");

        // A zero reading is kept; an audit without a value is not
        let cls = result.metric(MetricKind::Cls).unwrap();
        assert_eq!(cls.raw_value, 0.0);
        assert!(result.metric(MetricKind::SpeedIndex).is_none());
        assert!(result.metric(MetricKind::Inp).is_none());

        assert_eq!(result.metric(MetricKind::Tbt).unwrap().quality_band, None);
    }

    #[test]
    fn test_opportunities_filtered_and_sorted() {
        let result = LabNormalizer
            .normalize(&response(json!({
                "lighthouseResult": {
                    "categories": { "performance": { "score": 0.5, "auditRefs": [
                        { "id": "a", "group": "load-opportunities" },
                        { "id": "b", "group": "load-opportunities" },
                        { "id": "c", "group": "load-opportunities" },
                        { "id": "d", "group": "load-opportunities" },
                        { "id": "e", "group": "load-opportunities" },
                        { "id": "f", "group": "diagnostics" },
                        { "id": "g", "group": "load-opportunities" }
                    ] } },
                    "audits": {
                        "a": opportunity_audit(Some(0.5), Some(300.0)),
                        "b": opportunity_audit(Some(0.2), Some(1200.4)),
                        "c": opportunity_audit(Some(0.95), Some(5000.0)),
                        "d": opportunity_audit(None, Some(800.0)),
                        "e": opportunity_audit(Some(0.1), Some(300.0)),
                        "f": opportunity_audit(Some(0.1), Some(9000.0)),
                        "g": opportunity_audit(Some(0.0), None)
                    }
                }
            })))
            .unwrap();

        let ids: Vec<&str> = result.opportunities.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "e", "g"]);
        assert_eq!(result.opportunities[0].savings_ms, Some(1200));
        assert_eq!(result.opportunities[3].savings_ms, None);

        let savings: Vec<u64> = result
            .opportunities
            .iter()
            .map(|o| o.savings_ms.unwrap_or(0))
            .collect();
        assert!(savings.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn test_opportunity_savings_bytes() {
        let result = LabNormalizer
            .normalize(&response(json!({
                "lighthouseResult": {
                    "categories": { "performance": { "score": 0.5, "auditRefs": [
                        { "id": "unused-javascript", "group": "load-opportunities" }
                    ] } },
                    "audits": {
                        "unused-javascript": {
                            "title": "Reduce unused JavaScript",
                            "score": 0.3,
                            "details": { "overallSavingsMs": 450.6, "overallSavingsBytes": 123456.7 }
                        }
                    }
                }
            })))
            .unwrap();

        let opportunity = &result.opportunities[0];
        assert_eq!(opportunity.savings_ms, Some(451));
        assert_eq!(opportunity.savings_bytes, Some(123457));
    }

    #[test]
    fn test_diagnostics_allow_list_and_targets() {
        let result = LabNormalizer
            .normalize(&response(json!({
                "lighthouseResult": {
                    "audits": {
                        "largest-contentful-paint-element": {
                            "title": "LCP element",
                            "details": { "items": [
                                { "node": { "selector": "div.hero > img" }, "url": "https://x/hero.jpg" },
                                { "url": "https://x/ignored.jpg" }
                            ] }
                        },
                        "render-blocking-resources": {
                            "title": "Render blocking",
                            "score": 0.4,
                            "details": { "items": [ { "url": "https://x/app.css" } ] }
                        },
                        "unused-css-rules": { "title": "Unused CSS", "score": 1.0 },
                        "long-tasks": { "title": "Long tasks", "score": 0.5, "details": { "items": [] } },
                        "font-display": { "title": "Not in the allow-list", "score": 0.0 }
                    }
                }
            })))
            .unwrap();

        let ids: Vec<&str> = result.diagnostics.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["largest-contentful-paint-element", "long-tasks", "render-blocking-resources"]
        );
        assert_eq!(
            result.diagnostics[0].target,
            Some(DiagnosticTarget::Element("div.hero > img".to_string()))
        );
        assert_eq!(result.diagnostics[1].target, None);
        assert_eq!(
            result.diagnostics[2].target,
            Some(DiagnosticTarget::Resource("https://x/app.css".to_string()))
        );
    }
}
