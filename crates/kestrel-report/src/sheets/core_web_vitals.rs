use super::SheetBuilder;
use crate::sheet::{Cell, Column, Sheet};
use kestrel_core::AnalysisDocument;
use kestrel_core::lab::StrategyResult;
use kestrel_core::metrics::MetricKind;

const COLUMNS: &[Column] = &[
    Column::new("URL", 60.0),
    Column::new("Strategy", 10.0),
    Column::new("Score", 8.0),
    Column::new("LCP Lab", 12.0),
    Column::new("LCP Field", 12.0),
    Column::new("INP Lab", 12.0),
    Column::new("INP Field", 12.0),
    Column::new("CLS Lab", 12.0),
    Column::new("CLS Field", 12.0),
    Column::new("FCP", 12.0),
    Column::new("TTFB", 12.0),
    Column::new("TBT", 12.0),
];

/// Field cells are never blank so "not captured" reads differently from zero
const NOT_AVAILABLE: &str = "N/A";

/// One row per (URL, strategy) actually analyzed
pub struct CoreWebVitalsSheet;

impl CoreWebVitalsSheet {
    pub const NAME: &'static str = "Core Web Vitals";
}

impl SheetBuilder for CoreWebVitalsSheet {
    fn build(&self, document: &AnalysisDocument) -> Sheet {
        tracing::debug!("Building {} sheet", Self::NAME);

        let mut sheet = Sheet::new(Self::NAME, COLUMNS);

        for url in document.urls() {
            let Some(page) = document.page(url) else {
                continue;
            };

            for (strategy, result) in &page.strategies {
                sheet.push_row(vec![
                    Cell::text(url),
                    Cell::label(strategy.label()),
                    Cell::number(result.performance_score),
                    lab(result, MetricKind::Lcp),
                    field(result, &[MetricKind::Lcp]),
                    lab(result, MetricKind::Inp),
                    field(result, &[MetricKind::Inp, MetricKind::Fid]),
                    lab(result, MetricKind::Cls),
                    field(result, &[MetricKind::Cls]),
                    lab(result, MetricKind::Fcp),
                    lab(result, MetricKind::Ttfb),
                    lab(result, MetricKind::Tbt),
                ]);
            }
        }

        sheet
    }
}

fn lab(result: &StrategyResult, kind: MetricKind) -> Cell {
    result
        .metric(kind)
        .map(|reading| Cell::label(&reading.formatted()))
        .unwrap_or(Cell::Empty)
}

/// First available field reading among `kinds`
fn field(result: &StrategyResult, kinds: &[MetricKind]) -> Cell {
    result
        .field_metrics
        .as_ref()
        .and_then(|metrics| kinds.iter().find_map(|kind| metrics.get(kind)))
        .map(|reading| Cell::label(&reading.formatted()))
        .unwrap_or_else(|| Cell::label(NOT_AVAILABLE))
}
