use crate::field::{CruxResponse, FieldNormalizer};
use crate::lab::{LabNormalizer, PsiResponse, StrategyResult};
use crate::metrics::Strategy;
use crate::network::{NetworkAggregator, NetworkInput, NetworkSummary};
use crate::{Error, Normalizer, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Largest number of URLs a single analysis is meant to cover
const RECOMMENDED_MAX_URLS: usize = 10;

/// All analyzed strategies for one URL
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub url: String,
    pub strategies: BTreeMap<Strategy, StrategyResult>,
}

impl PageResult {
    pub fn strategy(&self, strategy: Strategy) -> Option<&StrategyResult> {
        self.strategies.get(&strategy)
    }
}

/// The canonical aggregate handed to report rendering.
///
/// Built once through [`DocumentBuilder`] and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisDocument {
    urls: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    templates: BTreeMap<String, String>,
    pages: BTreeMap<String, PageResult>,
    network: BTreeMap<String, NetworkSummary>,
}

impl AnalysisDocument {
    /// URLs in analysis order
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn page(&self, url: &str) -> Option<&PageResult> {
        self.pages.get(url)
    }

    pub fn network(&self, url: &str) -> Option<&NetworkSummary> {
        self.network.get(url)
    }

    pub fn template(&self, url: &str) -> Option<&str> {
        self.templates.get(url).map(String::as_str)
    }

    pub fn url_count(&self) -> usize {
        self.urls.len()
    }
}

/// Incrementally collects normalized results, then freezes them into an
/// [`AnalysisDocument`]
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: AnalysisDocument,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a URL; repeated URLs keep their first position
    pub fn add_url(&mut self, url: &str, template: Option<&str>) -> &mut Self {
        if !self.document.urls.iter().any(|u| u == url) {
            self.document.urls.push(url.to_string());
        }
        if let Some(template) = template.filter(|t| !t.is_empty()) {
            self.document
                .templates
                .insert(url.to_string(), template.to_string());
        }
        self
    }

    pub fn add_strategy(
        &mut self,
        url: &str,
        strategy: Strategy,
        result: StrategyResult,
    ) -> &mut Self {
        self.add_url(url, None);
        self.document
            .pages
            .entry(url.to_string())
            .or_insert_with(|| PageResult {
                url: url.to_string(),
                strategies: BTreeMap::new(),
            })
            .strategies
            .insert(strategy, result);
        self
    }

    pub fn add_network(&mut self, url: &str, summary: NetworkSummary) -> &mut Self {
        self.add_url(url, None);
        self.document.network.insert(url.to_string(), summary);
        self
    }

    /// Freeze the document; fails only when nothing at all was analyzable
    pub fn build(self) -> Result<AnalysisDocument> {
        let has_lab = self.document.pages.values().any(|p| !p.strategies.is_empty());
        if !has_lab && self.document.network.is_empty() {
            return Err(Error::NoPageData);
        }
        Ok(self.document)
    }
}

/// A URL to analyze, optionally labelled with its page template
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UrlEntry {
    Plain(String),
    Templated {
        url: String,
        #[serde(default)]
        template_type: String,
    },
}

impl UrlEntry {
    pub fn url(&self) -> &str {
        match self {
            UrlEntry::Plain(url) | UrlEntry::Templated { url, .. } => url,
        }
    }

    pub fn template(&self) -> Option<&str> {
        match self {
            UrlEntry::Plain(_) => None,
            UrlEntry::Templated { template_type, .. } => Some(template_type),
        }
    }
}

/// Raw provider documents collected for one URL.
///
/// Provider payloads and strategy keys stay untyped here so that one malformed
/// entry only costs its own strategy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageInput {
    pub url: String,
    #[serde(default)]
    pub pagespeed: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub crux: BTreeMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<serde_json::Value>,
}

/// Everything gathered for one analysis run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(default)]
    pub urls: Vec<UrlEntry>,
    #[serde(default)]
    pub pages: Vec<PageInput>,
}

impl AnalysisDocument {
    /// Normalize every provider document in the bundle and assemble the result.
    ///
    /// Failures are scoped: a bad PSI document drops one strategy, a bad CrUX
    /// record falls back to PSI field data, a bad capture drops one summary.
    pub fn from_bundle(bundle: &Bundle) -> Result<AnalysisDocument> {
        Self::from_bundle_with(bundle, |_| {})
    }

    /// Like [`AnalysisDocument::from_bundle`], calling `on_page` after each page is normalized
    pub fn from_bundle_with(
        bundle: &Bundle,
        mut on_page: impl FnMut(&PageInput),
    ) -> Result<AnalysisDocument> {
        tracing::debug!(
            "Normalizing bundle: {} URLs, {} pages",
            bundle.urls.len(),
            bundle.pages.len()
        );

        let mut builder = DocumentBuilder::new();
        for entry in &bundle.urls {
            builder.add_url(entry.url(), entry.template());
        }
        for page in &bundle.pages {
            add_page(&mut builder, page);
            on_page(page);
        }

        let document = builder.build()?;
        if document.url_count() > RECOMMENDED_MAX_URLS {
            tracing::warn!(
                "Bundle covers {} URLs; analyses are tuned for at most {}",
                document.url_count(),
                RECOMMENDED_MAX_URLS
            );
        }

        tracing::info!(
            "Built analysis document: {} URLs, {} with lab data, {} with network data",
            document.url_count(),
            document.pages.len(),
            document.network.len()
        );

        Ok(document)
    }
}

/// Normalize one page's inputs into the builder
fn add_page(builder: &mut DocumentBuilder, page: &PageInput) {
    if page.url.is_empty() {
        tracing::warn!("Skipping page entry without a URL");
        return;
    }
    builder.add_url(&page.url, None);

    let lab = by_strategy(&page.url, "lab", &page.pagespeed);
    let crux = by_strategy(&page.url, "CrUX", &page.crux);

    for (strategy, raw) in &lab {
        let mut result = match normalize_lab(raw) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    "Dropping {} lab result for {}: {}",
                    strategy.as_str(),
                    page.url,
                    e
                );
                continue;
            }
        };

        if let Some(raw) = crux.get(strategy) {
            match normalize_field(raw) {
                Ok(report) => match report.usable_metrics() {
                    Some(metrics) => result.field_metrics = Some(metrics.clone()),
                    None => tracing::debug!(
                        "No CrUX {} data for {}: {}",
                        strategy.as_str(),
                        page.url,
                        report.reason.as_deref().unwrap_or("no metrics")
                    ),
                },
                Err(e) => tracing::warn!(
                    "Ignoring {} CrUX record for {}: {}",
                    strategy.as_str(),
                    page.url,
                    e
                ),
            }
        }

        builder.add_strategy(&page.url, *strategy, result);
    }

    for strategy in crux.keys() {
        if !lab.contains_key(strategy) {
            tracing::debug!(
                "CrUX {} record for {} has no lab result to attach to",
                strategy.as_str(),
                page.url
            );
        }
    }

    if let Some(raw) = &page.network {
        match normalize_network(raw) {
            Ok(summary) => {
                builder.add_network(&page.url, summary);
            }
            Err(e) => tracing::warn!("Dropping network capture for {}: {}", page.url, e),
        }
    }
}

/// Key provider documents by strategy, skipping names that are not a strategy
fn by_strategy<'a>(
    url: &str,
    source: &str,
    raw: &'a BTreeMap<String, serde_json::Value>,
) -> BTreeMap<Strategy, &'a serde_json::Value> {
    let mut known = BTreeMap::new();
    for (name, value) in raw {
        match Strategy::from_name(name) {
            Some(strategy) => {
                known.insert(strategy, value);
            }
            None => tracing::warn!(
                "Skipping {} entry for {}: unknown strategy '{}'",
                source,
                url,
                name
            ),
        }
    }
    known
}

fn normalize_lab(raw: &serde_json::Value) -> Result<StrategyResult> {
    let response = PsiResponse::deserialize(raw)?;
    LabNormalizer.normalize(&response)
}

fn normalize_field(raw: &serde_json::Value) -> Result<crate::field::FieldReport> {
    let response = CruxResponse::deserialize(raw)?;
    FieldNormalizer.normalize(&response)
}

fn normalize_network(raw: &serde_json::Value) -> Result<NetworkSummary> {
    let input = NetworkInput::deserialize(raw)?;
    NetworkAggregator::default().normalize(&input)
}
