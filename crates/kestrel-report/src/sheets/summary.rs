use super::SheetBuilder;
use crate::sheet::{Cell, ColorScale, Column, Sheet};
use kestrel_core::AnalysisDocument;
use kestrel_core::lab::StrategyResult;
use kestrel_core::metrics::{MetricKind, Strategy};

const COLUMNS: &[Column] = &[
    Column::new("URL", 60.0),
    Column::new("Mobile Score", 14.0),
    Column::new("Desktop Score", 14.0),
    Column::new("LCP Status", 12.0),
    Column::new("INP Status", 12.0),
    Column::new("CLS Status", 12.0),
    Column::new("Top Issue", 50.0),
];

/// One row per URL: both scores, mobile lab bands and the top mobile issue
pub struct SummarySheet;

impl SummarySheet {
    pub const NAME: &'static str = "Summary";
}

impl SheetBuilder for SummarySheet {
    fn build(&self, document: &AnalysisDocument) -> Sheet {
        tracing::debug!("Building {} sheet", Self::NAME);

        let mut sheet = Sheet::new(Self::NAME, COLUMNS);

        for url in document.urls() {
            let page = document.page(url);
            let mobile = page.and_then(|p| p.strategy(Strategy::Mobile));
            let desktop = page.and_then(|p| p.strategy(Strategy::Desktop));

            sheet.push_row(vec![
                Cell::text(url),
                score(mobile),
                score(desktop),
                status(mobile, MetricKind::Lcp),
                status(mobile, MetricKind::Inp),
                status(mobile, MetricKind::Cls),
                mobile
                    .and_then(StrategyResult::top_opportunity)
                    .map(|opportunity| Cell::text(&opportunity.title))
                    .unwrap_or(Cell::Empty),
            ]);
        }

        if sheet.row_count() > 0 {
            sheet.color_scale = Some(ColorScale {
                first_col: 1,
                last_col: 2,
            });
        }

        sheet
    }
}

fn score(result: Option<&StrategyResult>) -> Cell {
    result
        .map(|r| Cell::number(r.performance_score))
        .unwrap_or(Cell::Empty)
}

fn status(result: Option<&StrategyResult>, kind: MetricKind) -> Cell {
    result
        .and_then(|r| r.metric(kind))
        .and_then(|reading| reading.quality_band)
        .map(|band| Cell::label(band.label()))
        .unwrap_or(Cell::Empty)
}
