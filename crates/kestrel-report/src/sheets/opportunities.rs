use super::SheetBuilder;
use crate::sanitize::ellipsize;
use crate::sheet::{Cell, Column, Sheet};
use kestrel_core::AnalysisDocument;
use kestrel_core::lab::Opportunity;
use kestrel_core::metrics::round_to;

const COLUMNS: &[Column] = &[
    Column::new("URL", 50.0),
    Column::new("Strategy", 10.0),
    Column::new("Opportunity", 40.0),
    Column::new("Est. Savings (ms)", 16.0),
    Column::new("Est. Savings (KB)", 16.0),
    Column::new("Description", 80.0),
];

const DESCRIPTION_CHARS: usize = 200;

/// Every opportunity of every analyzed strategy, in savings order
pub struct OpportunitiesSheet;

impl OpportunitiesSheet {
    pub const NAME: &'static str = "Opportunities";
}

impl SheetBuilder for OpportunitiesSheet {
    fn build(&self, document: &AnalysisDocument) -> Sheet {
        tracing::debug!("Building {} sheet", Self::NAME);

        let mut sheet = Sheet::new(Self::NAME, COLUMNS);

        for url in document.urls() {
            let Some(page) = document.page(url) else {
                continue;
            };

            for (strategy, result) in &page.strategies {
                for opportunity in &result.opportunities {
                    sheet.push_row(vec![
                        Cell::text(url),
                        Cell::label(strategy.label()),
                        Cell::text(&opportunity.title),
                        opportunity
                            .savings_ms
                            .map(|ms| Cell::number(ms as f64))
                            .unwrap_or(Cell::Empty),
                        savings_kb(opportunity),
                        Cell::text(ellipsize(&opportunity.description, DESCRIPTION_CHARS)),
                    ]);
                }
            }
        }

        sheet
    }
}

/// Zero or unknown byte savings leave the cell empty
fn savings_kb(opportunity: &Opportunity) -> Cell {
    match opportunity.savings_bytes {
        Some(bytes) if bytes > 0 => Cell::number(round_to(bytes as f64 / 1024.0, 1)),
        _ => Cell::Empty,
    }
}
