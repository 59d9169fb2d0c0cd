use crate::OutputFormat;
use anyhow::Result;
use kestrel_core::field::{CruxResponse, FieldNormalizer, FieldReport};
use kestrel_core::metrics::QualityBand;
use kestrel_core::{InputReader, Normalizer};
use std::path::Path;

/// Read and normalize a Chrome UX Report record
pub fn normalize_field(file: &Path) -> Result<FieldReport> {
    let response: CruxResponse = InputReader::from_file(file)?;
    Ok(FieldNormalizer.normalize(&response)?)
}

pub fn execute(file: &Path, format: OutputFormat) -> Result<()> {
    tracing::info!("Normalizing field data: {}", file.display());

    let report = normalize_field(file)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => output_table(&report),
        OutputFormat::Pretty => output_pretty(&report),
    }

    Ok(())
}

fn output_pretty(report: &FieldReport) {
    use console::style;

    println!("\n{}", style("Field Data (Chrome UX Report)").bold().cyan());
    println!("{}", style("=============================").cyan());

    if !report.in_crux {
        println!(
            "\n  {} {}",
            style("Not in dataset:").yellow(),
            report.reason.as_deref().unwrap_or("no data")
        );
        println!();
        return;
    }

    if let Some(target) = report.url.as_deref().or(report.origin.as_deref()) {
        println!("\n  Target:       {}", target);
    }
    if let Some(form_factor) = &report.form_factor {
        println!("  Form Factor:  {}", form_factor);
    }
    if let Some(period) = &report.collection_period {
        println!("  Collected:    {} to {}", period.first_date, period.last_date);
    }

    println!("\n{}", style("Metrics (p75):").bold());
    for reading in report.metrics.values() {
        let distribution = if reading.distribution.is_empty() {
            String::new()
        } else {
            reading
                .distribution
                .iter()
                .map(|(band, share)| format!("{} {:.1}%", band.label(), share * 100.0))
                .collect::<Vec<_>>()
                .join(" / ")
        };
        println!(
            "  {:<6} {:>10}  {}  {}",
            reading.kind.as_str(),
            reading.formatted(),
            super::styled_band(reading.quality_band),
            style(distribution).dim()
        );
    }

    println!();
}

fn output_table(report: &FieldReport) {
    println!("Metric,p75,Rating,Good,Needs Improvement,Poor");
    if !report.in_crux {
        return;
    }
    for reading in report.metrics.values() {
        let share = |band: QualityBand| {
            reading
                .distribution
                .get(&band)
                .map(|v| v.to_string())
                .unwrap_or_default()
        };
        println!(
            "{},{},{},{},{},{}",
            reading.kind.as_str(),
            reading.formatted(),
            reading.quality_band.map(|b| b.label()).unwrap_or(""),
            share(QualityBand::Good),
            share(QualityBand::NeedsImprovement),
            share(QualityBand::Poor)
        );
    }
}
