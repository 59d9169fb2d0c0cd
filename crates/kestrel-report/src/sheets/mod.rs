mod core_web_vitals;
mod network;
mod opportunities;
mod summary;

pub use core_web_vitals::CoreWebVitalsSheet;
pub use network::NetworkSheet;
pub use opportunities::OpportunitiesSheet;
pub use summary::SummarySheet;

use crate::sheet::Sheet;
use kestrel_core::AnalysisDocument;

/// Lays out one worksheet from a finished analysis document
pub trait SheetBuilder {
    fn build(&self, document: &AnalysisDocument) -> Sheet;
}

/// Worksheet names in workbook order
pub const SHEET_NAMES: [&str; 4] = [
    SummarySheet::NAME,
    CoreWebVitalsSheet::NAME,
    NetworkSheet::NAME,
    OpportunitiesSheet::NAME,
];

/// Build every worksheet in workbook order
pub fn build_all(document: &AnalysisDocument) -> Vec<Sheet> {
    let builders: [&dyn SheetBuilder; 4] = [
        &SummarySheet,
        &CoreWebVitalsSheet,
        &NetworkSheet,
        &OpportunitiesSheet,
    ];

    builders
        .iter()
        .map(|builder| builder.build(document))
        .collect()
}
