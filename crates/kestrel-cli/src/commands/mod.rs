pub mod completion;
pub mod field;
pub mod lab;
pub mod network;
pub mod report;

use console::{StyledObject, style};
use kestrel_core::metrics::QualityBand;

/// Score colored the way the workbook scale reads: red, yellow, green
fn styled_score(score: u8) -> StyledObject<u8> {
    if score >= 90 {
        style(score).green()
    } else if score >= 50 {
        style(score).yellow()
    } else {
        style(score).red()
    }
}

fn styled_band(band: Option<QualityBand>) -> StyledObject<&'static str> {
    match band {
        Some(QualityBand::Good) => style(QualityBand::Good.label()).green(),
        Some(QualityBand::NeedsImprovement) => {
            style(QualityBand::NeedsImprovement.label()).yellow()
        }
        Some(QualityBand::Poor) => style(QualityBand::Poor.label()).red(),
        None => style(""),
    }
}

fn kilobytes(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}
