use super::{NetworkRequestRecord, ResourceType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One request-lifecycle event observed during a page load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum NetworkEvent {
    RequestStarted {
        url: String,
        #[serde(default)]
        resource_type: String,
    },
    ResponseReceived {
        url: String,
        #[serde(default)]
        status: u16,
        #[serde(default)]
        from_cache: bool,
        /// Raw `content-length` header value
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content_length: Option<ContentLength>,
    },
    TimingResolved {
        url: String,
        #[serde(default)]
        start_time_ms: f64,
        #[serde(default)]
        duration_ms: f64,
        #[serde(default)]
        transfer_size: u64,
        #[serde(default)]
        encoded_body_size: u64,
    },
}

/// Declared `content-length`, as a header string or an already parsed number.
///
/// Anything else is kept but ignored so one odd header never rejects the capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentLength {
    Bytes(u64),
    Header(String),
    Other(serde_json::Value),
}

impl ContentLength {
    pub fn to_bytes(&self) -> Option<u64> {
        match self {
            ContentLength::Bytes(bytes) => Some(*bytes),
            ContentLength::Header(value) => value.trim().parse::<u64>().ok(),
            ContentLength::Other(_) => None,
        }
    }
}

impl NetworkEvent {
    pub fn url(&self) -> &str {
        match self {
            NetworkEvent::RequestStarted { url, .. }
            | NetworkEvent::ResponseReceived { url, .. }
            | NetworkEvent::TimingResolved { url, .. } => url,
        }
    }
}

/// Registry of captured requests, one logical record per URL.
///
/// The first `request_started` for a URL establishes the record; every later
/// event updates individual fields in place. Insertion order is preserved.
#[derive(Debug, Default)]
pub struct NetworkCapture {
    records: Vec<NetworkRequestRecord>,
    index: HashMap<String, usize>,
}

impl NetworkCapture {
    /// Create an empty capture
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a capture by applying events in arrival order
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a NetworkEvent>) -> Self {
        let mut capture = Self::new();
        for event in events {
            capture.apply(event);
        }
        capture
    }

    /// Apply a single event
    pub fn apply(&mut self, event: &NetworkEvent) {
        match event {
            NetworkEvent::RequestStarted { url, resource_type } => {
                self.add_request(url, ResourceType::from_hint(resource_type))
            }
            NetworkEvent::ResponseReceived {
                url,
                status,
                from_cache,
                content_length,
            } => self.add_response(
                url,
                *status,
                *from_cache,
                content_length.as_ref().and_then(ContentLength::to_bytes),
            ),
            NetworkEvent::TimingResolved {
                url,
                start_time_ms,
                duration_ms,
                transfer_size,
                encoded_body_size,
            } => self.resolve_timing(
                url,
                *start_time_ms,
                *duration_ms,
                *transfer_size,
                *encoded_body_size,
            ),
        }
    }

    /// Register a request, or refresh the type of one already seen
    pub fn add_request(&mut self, url: &str, resource_type: ResourceType) {
        if let Some(&idx) = self.index.get(url) {
            self.records[idx].resource_type = resource_type;
            return;
        }

        self.index.insert(url.to_string(), self.records.len());
        self.records
            .push(NetworkRequestRecord::new(url.to_string(), resource_type));
    }

    /// Record response status and, when present, the declared content length
    pub fn add_response(
        &mut self,
        url: &str,
        status: u16,
        from_cache: bool,
        content_length: Option<u64>,
    ) {
        let Some(record) = self.get_mut(url) else {
            tracing::debug!("Ignoring response for unknown request: {}", url);
            return;
        };

        record.http_status = status;
        record.from_cache = from_cache;
        if let Some(length) = content_length {
            record.size_bytes = length;
        }
    }

    /// Apply resource timing; a non-zero transfer size wins over the encoded body size
    pub fn resolve_timing(
        &mut self,
        url: &str,
        start_time_ms: f64,
        duration_ms: f64,
        transfer_size: u64,
        encoded_body_size: u64,
    ) {
        let Some(record) = self.get_mut(url) else {
            tracing::debug!("Ignoring timing for unknown request: {}", url);
            return;
        };

        record.start_time_ms = start_time_ms;
        record.duration_ms = duration_ms;
        if transfer_size > 0 {
            record.size_bytes = transfer_size;
        } else if encoded_body_size > 0 {
            record.size_bytes = encoded_body_size;
        }
    }

    /// All captured requests in first-seen order
    pub fn records(&self) -> &[NetworkRequestRecord] {
        &self.records
    }

    /// Number of distinct requests
    pub fn count(&self) -> usize {
        self.records.len()
    }

    fn get_mut(&mut self, url: &str) -> Option<&mut NetworkRequestRecord> {
        let idx = *self.index.get(url)?;
        self.records.get_mut(idx)
    }
}
