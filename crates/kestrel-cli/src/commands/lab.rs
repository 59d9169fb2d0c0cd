use crate::OutputFormat;
use anyhow::Result;
use kestrel_core::lab::{LabNormalizer, PsiResponse, StrategyResult};
use kestrel_core::metrics::Strategy;
use kestrel_core::{InputReader, Normalizer};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct LabOutput<'a> {
    strategy: Strategy,
    #[serde(flatten)]
    result: &'a StrategyResult,
}

/// Read and normalize a PageSpeed Insights response
pub fn normalize_lab(file: &Path) -> Result<StrategyResult> {
    let response: PsiResponse = InputReader::from_file(file)?;
    Ok(LabNormalizer.normalize(&response)?)
}

pub fn execute(file: &Path, strategy: Strategy, format: OutputFormat) -> Result<()> {
    tracing::info!("Normalizing lab data: {}", file.display());

    let result = normalize_lab(file)?;

    match format {
        OutputFormat::Json => {
            let output = LabOutput {
                strategy,
                result: &result,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table => output_table(&result, strategy),
        OutputFormat::Pretty => output_pretty(&result, strategy),
    }

    Ok(())
}

fn output_pretty(result: &StrategyResult, strategy: Strategy) {
    use console::style;

    let title = format!("Lab Results ({})", strategy.label());
    println!("\n{}", style(&title).bold().cyan());
    println!("{}", style("=".repeat(title.len())).cyan());

    println!(
        "\n  Performance Score: {}",
        super::styled_score(result.performance_score)
    );

    if !result.metrics.is_empty() {
        println!("\n{}", style("Metrics:").bold());
        for reading in result.metrics.values() {
            println!(
                "  {:<12} {:>10}  {}",
                reading.kind.as_str(),
                reading.formatted(),
                super::styled_band(reading.quality_band)
            );
        }
    }

    if let Some(field) = &result.field_metrics {
        println!("\n{}", style("Field Data (p75):").bold());
        for reading in field.values() {
            println!(
                "  {:<12} {:>10}  {}",
                reading.kind.as_str(),
                reading.formatted(),
                super::styled_band(reading.quality_band)
            );
        }
    }

    if !result.opportunities.is_empty() {
        println!("\n{}", style("Opportunities:").bold());
        for (i, opportunity) in result.opportunities.iter().enumerate() {
            let savings = opportunity
                .savings_ms
                .map(|ms| format!("{} ms", ms))
                .unwrap_or_else(|| "-".to_string());
            println!("  {}. [{}] {}", i + 1, savings, opportunity.title);
        }
    }

    if !result.diagnostics.is_empty() {
        println!("\n{}", style("Diagnostics:").bold());
        for diagnostic in &result.diagnostics {
            println!("  - {}", diagnostic.title);
        }
    }

    println!();
}

fn output_table(result: &StrategyResult, strategy: Strategy) {
    println!("Metric,Value,Rating");
    println!("Strategy,{},", strategy.as_str());
    println!("Performance Score,{},", result.performance_score);
    for reading in result.metrics.values() {
        println!(
            "{},{},{}",
            reading.kind.as_str(),
            reading.formatted(),
            reading.quality_band.map(|b| b.label()).unwrap_or("")
        );
    }
    println!("Opportunities,{},", result.opportunities.len());
    println!("Diagnostics,{},", result.diagnostics.len());
}
