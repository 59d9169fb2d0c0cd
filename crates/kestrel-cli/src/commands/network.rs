use crate::OutputFormat;
use anyhow::Result;
use kestrel_core::network::{NetworkAggregator, NetworkInput, NetworkSummary};
use kestrel_core::{InputReader, Normalizer};
use std::path::Path;

/// Read a capture and reduce it to a summary
pub fn summarize_network(file: &Path) -> Result<NetworkSummary> {
    let input: NetworkInput = InputReader::from_file(file)?;
    Ok(NetworkAggregator::default().normalize(&input)?)
}

pub fn execute(file: &Path, format: OutputFormat) -> Result<()> {
    tracing::info!("Summarizing network capture: {}", file.display());

    let summary = summarize_network(file)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Table => output_table(&summary),
        OutputFormat::Pretty => output_pretty(&summary),
    }

    Ok(())
}

fn output_pretty(summary: &NetworkSummary) {
    use console::style;

    println!("\n{}", style("Network Summary").bold().cyan());
    println!("{}", style("===============").cyan());

    println!("\n  Total Requests:  {}", summary.total_requests);
    println!(
        "  Total Transfer:  {}",
        super::kilobytes(summary.total_transfer_bytes)
    );

    if let Some(timing) = &summary.timing {
        println!("\n{}", style("Navigation Timing:").bold());
        println!("  Time to First Byte:  {:.0} ms", timing.time_to_first_byte);
        println!("  DOM Interactive:     {:.0} ms", timing.dom_interactive);
        println!("  DOM Content Loaded:  {:.0} ms", timing.dom_content_loaded);
        println!("  Load Event:          {:.0} ms", timing.load_event);
    }

    if !summary.by_type.is_empty() {
        println!("\n{}", style("By Type:").bold());
        for (resource_type, totals) in &summary.by_type {
            println!(
                "  {:<12} {:>5} requests  {:>12}",
                resource_type.as_str(),
                totals.count,
                super::kilobytes(totals.bytes)
            );
        }
    }

    if !summary.largest_resources.is_empty() {
        println!("\n{}", style("Largest Resources:").bold());
        for (i, record) in summary.largest_resources.iter().enumerate() {
            println!(
                "  {}. [{}] {}",
                i + 1,
                super::kilobytes(record.size_bytes),
                record.url
            );
        }
    }

    if !summary.blocking_resources.is_empty() {
        println!("\n{}", style("Potentially Blocking:").bold());
        for resource in &summary.blocking_resources {
            println!(
                "  {} {}",
                style(format!("[{:?}]", resource.blocks).to_lowercase()).yellow(),
                resource.url
            );
        }
    }

    println!();
}

fn output_table(summary: &NetworkSummary) {
    println!("Type,Count,Bytes");
    for (resource_type, totals) in &summary.by_type {
        println!("{},{},{}", resource_type.as_str(), totals.count, totals.bytes);
    }
    println!(
        "total,{},{}",
        summary.total_requests, summary.total_transfer_bytes
    );
}
