use super::SheetBuilder;
use crate::sheet::{Cell, Column, Sheet};
use kestrel_core::AnalysisDocument;
use kestrel_core::metrics::round_to;
use kestrel_core::network::{NetworkRequestRecord, NetworkSummary, ResourceType};
use url::Url;

const COLUMNS: &[Column] = &[
    Column::new("URL", 60.0),
    Column::new("Total Requests", 14.0),
    Column::new("Transfer (MB)", 14.0),
    Column::new("Scripts (count)", 14.0),
    Column::new("Scripts (KB)", 14.0),
    Column::new("Images (count)", 14.0),
    Column::new("Images (KB)", 14.0),
    Column::new("CSS (count)", 14.0),
    Column::new("CSS (KB)", 14.0),
    Column::new("Fonts (count)", 14.0),
    Column::new("Fonts (KB)", 14.0),
    Column::new("Largest Resource", 14.0),
];

/// Resource types broken out into their own count/KB columns
const BREAKDOWN: [ResourceType; 4] = [
    ResourceType::Script,
    ResourceType::Image,
    ResourceType::Stylesheet,
    ResourceType::Font,
];

const NAME_CHARS: usize = 30;

/// One row per URL with a network capture
pub struct NetworkSheet;

impl NetworkSheet {
    pub const NAME: &'static str = "Network Analysis";
}

impl SheetBuilder for NetworkSheet {
    fn build(&self, document: &AnalysisDocument) -> Sheet {
        tracing::debug!("Building {} sheet", Self::NAME);

        let mut sheet = Sheet::new(Self::NAME, COLUMNS);

        for url in document.urls() {
            if let Some(summary) = document.network(url) {
                sheet.push_row(row(url, summary));
            }
        }

        sheet
    }
}

fn row(url: &str, summary: &NetworkSummary) -> Vec<Cell> {
    let mut cells = vec![
        Cell::text(url),
        Cell::number(summary.total_requests as f64),
        Cell::number(round_to(summary.total_transfer_bytes as f64 / 1024.0 / 1024.0, 2)),
    ];

    for resource_type in BREAKDOWN {
        let totals = summary.totals(resource_type);
        cells.push(Cell::number(totals.count as f64));
        cells.push(Cell::number(kilobytes(totals.bytes)));
    }

    cells.push(
        summary
            .largest()
            .map(|record| Cell::text(largest_label(record)))
            .unwrap_or(Cell::Empty),
    );

    cells
}

fn kilobytes(bytes: u64) -> f64 {
    round_to(bytes as f64 / 1024.0, 0)
}

/// `name (NKB)` with the file name cut to `NAME_CHARS`
fn largest_label(record: &NetworkRequestRecord) -> String {
    format!(
        "{} ({}KB)",
        resource_name(&record.url),
        kilobytes(record.size_bytes)
    )
}

/// Last path segment of a resource URL
fn resource_name(raw: &str) -> String {
    let name = match Url::parse(raw) {
        Ok(url) => url
            .path_segments()
            .and_then(|segments| segments.last())
            .unwrap_or_default()
            .to_string(),
        Err(_) => raw.rsplit('/').next().unwrap_or_default().to_string(),
    };

    name.chars().take(NAME_CHARS).collect()
}
