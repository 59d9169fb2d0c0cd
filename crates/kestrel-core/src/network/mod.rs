mod capture;

pub use capture::{ContentLength, NetworkCapture, NetworkEvent};

use crate::{Normalizer, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Simplified resource category of a captured request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Document,
    Script,
    Stylesheet,
    Image,
    Font,
    Xhr,
    Media,
    Websocket,
    Other,
}

impl ResourceType {
    /// Map a browser resource-type hint onto a category
    pub fn from_hint(hint: &str) -> Self {
        match hint.to_lowercase().as_str() {
            "document" => ResourceType::Document,
            "script" => ResourceType::Script,
            "stylesheet" => ResourceType::Stylesheet,
            "image" => ResourceType::Image,
            "font" => ResourceType::Font,
            "xhr" | "fetch" => ResourceType::Xhr,
            "media" => ResourceType::Media,
            "websocket" => ResourceType::Websocket,
            _ => ResourceType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Document => "document",
            ResourceType::Script => "script",
            ResourceType::Stylesheet => "stylesheet",
            ResourceType::Image => "image",
            ResourceType::Font => "font",
            ResourceType::Xhr => "xhr",
            ResourceType::Media => "media",
            ResourceType::Websocket => "websocket",
            ResourceType::Other => "other",
        }
    }
}

/// A captured resource request.
///
/// `size_bytes` stays 0 until a response header or resource timing supplies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkRequestRecord {
    pub url: String,
    pub resource_type: ResourceType,
    pub start_time_ms: f64,
    pub duration_ms: f64,
    pub size_bytes: u64,
    pub http_status: u16,
    pub from_cache: bool,
}

impl NetworkRequestRecord {
    pub fn new(url: String, resource_type: ResourceType) -> Self {
        Self {
            url,
            resource_type,
            start_time_ms: 0.0,
            duration_ms: 0.0,
            size_bytes: 0,
            http_status: 0,
            from_cache: false,
        }
    }
}

/// Navigation timing of the captured page load, in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationTiming {
    pub time_to_first_byte: f64,
    pub dom_interactive: f64,
    pub dom_content_loaded: f64,
    pub load_event: f64,
}

/// Network capture for one page as produced by the browser collaborator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<NavigationTiming>,
    #[serde(default)]
    pub events: Vec<NetworkEvent>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeTotals {
    pub count: usize,
    pub bytes: u64,
}

/// What an early stylesheet or script is presumed to block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Blocks {
    Render,
    Parser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockingResource {
    pub url: String,
    pub resource_type: ResourceType,
    pub size_bytes: u64,
    pub blocks: Blocks,
}

/// Aggregated view of a page's network activity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub total_requests: usize,
    pub total_transfer_bytes: u64,
    pub by_type: BTreeMap<ResourceType, TypeTotals>,
    pub largest_resources: Vec<NetworkRequestRecord>,
    pub blocking_resources: Vec<BlockingResource>,
    pub waterfall: Vec<NetworkRequestRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing: Option<NavigationTiming>,
}

impl NetworkSummary {
    /// Totals for one resource type, zero when none were captured
    pub fn totals(&self, resource_type: ResourceType) -> TypeTotals {
        self.by_type
            .get(&resource_type)
            .copied()
            .unwrap_or_default()
    }

    pub fn largest(&self) -> Option<&NetworkRequestRecord> {
        self.largest_resources.first()
    }
}

/// Reduces captured requests into a [`NetworkSummary`]
#[derive(Debug, Clone)]
pub struct NetworkAggregator {
    top_n: usize,
    waterfall_limit: usize,
    blocking_cutoff_ms: f64,
}

impl NetworkAggregator {
    pub fn new(top_n: usize, waterfall_limit: usize, blocking_cutoff_ms: f64) -> Self {
        Self {
            top_n,
            waterfall_limit,
            blocking_cutoff_ms,
        }
    }

    /// Summarize already-merged records
    pub fn summarize(
        &self,
        records: &[NetworkRequestRecord],
        timing: Option<NavigationTiming>,
    ) -> NetworkSummary {
        tracing::debug!("Aggregating {} network requests", records.len());

        let mut by_type: BTreeMap<ResourceType, TypeTotals> = BTreeMap::new();
        for record in records {
            let totals = by_type.entry(record.resource_type).or_default();
            totals.count += 1;
            totals.bytes = totals.bytes.saturating_add(record.size_bytes);
        }
        let total_transfer_bytes = records
            .iter()
            .fold(0u64, |total, r| total.saturating_add(r.size_bytes));

        // Zero-size entries never rank; sort is stable so ties keep capture order
        let mut largest_resources: Vec<NetworkRequestRecord> = records
            .iter()
            .filter(|r| r.size_bytes > 0)
            .cloned()
            .collect();
        largest_resources.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
        largest_resources.truncate(self.top_n);

        let blocking_resources = records
            .iter()
            .filter(|r| r.start_time_ms < self.blocking_cutoff_ms)
            .filter_map(|r| {
                let blocks = match r.resource_type {
                    ResourceType::Stylesheet => Blocks::Render,
                    ResourceType::Script => Blocks::Parser,
                    _ => return None,
                };
                Some(BlockingResource {
                    url: r.url.clone(),
                    resource_type: r.resource_type,
                    size_bytes: r.size_bytes,
                    blocks,
                })
            })
            .collect();

        let mut waterfall = records.to_vec();
        waterfall.sort_by(|a, b| a.start_time_ms.total_cmp(&b.start_time_ms));
        waterfall.truncate(self.waterfall_limit);

        let summary = NetworkSummary {
            total_requests: records.len(),
            total_transfer_bytes,
            by_type,
            largest_resources,
            blocking_resources,
            waterfall,
            timing,
        };

        tracing::info!(
            "Network aggregation complete: {} requests, {} bytes",
            summary.total_requests,
            summary.total_transfer_bytes
        );

        summary
    }
}

impl Default for NetworkAggregator {
    fn default() -> Self {
        Self::new(10, 100, 500.0)
    }
}

impl Normalizer for NetworkAggregator {
    type Input = NetworkInput;
    type Output = NetworkSummary;

    fn normalize(&self, input: &NetworkInput) -> Result<NetworkSummary> {
        let capture = NetworkCapture::from_events(&input.events);
        Ok(self.summarize(capture.records(), input.timing.clone()))
    }
}
