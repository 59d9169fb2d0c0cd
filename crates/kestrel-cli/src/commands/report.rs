use crate::OutputFormat;
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use kestrel_core::metrics::Strategy;
use kestrel_core::{AnalysisDocument, Bundle, InputReader};
use kestrel_report::{ReportConfig, ReportManifest, WorkbookWriter};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A finished report run: the document that was rendered and what was written
pub struct ReportRun {
    pub document: AnalysisDocument,
    pub manifest: ReportManifest,
}

#[derive(Serialize)]
struct ReportFailure {
    success: bool,
    error: String,
}

/// Normalize a bundle and write its workbook
pub fn build_report(
    bundle_path: &Path,
    config: ReportConfig,
    show_progress: bool,
) -> Result<ReportRun> {
    tracing::debug!("Reading bundle: {}", bundle_path.display());

    let bundle: Bundle = InputReader::from_file(bundle_path)?;

    let progress = if show_progress {
        let bar = ProgressBar::new(bundle.pages.len() as u64);
        bar.set_style(ProgressStyle::with_template(
            "{spinner} [{bar:30}] {pos}/{len} {wide_msg}",
        )?);
        bar
    } else {
        ProgressBar::hidden()
    };

    let document = AnalysisDocument::from_bundle_with(&bundle, |page| {
        progress.set_message(page.url.clone());
        progress.inc(1);
    });
    progress.finish_and_clear();
    let document = document?;

    let manifest = WorkbookWriter::new(config).write(&document)?;

    Ok(ReportRun { document, manifest })
}

pub fn execute(
    bundle: &Path,
    output_dir: PathBuf,
    job_id: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    tracing::info!("Building report from bundle: {}", bundle.display());

    let config = ReportConfig::new(output_dir, job_id);
    let run = match build_report(bundle, config, format == OutputFormat::Pretty) {
        Ok(run) => run,
        Err(e) => {
            if format == OutputFormat::Json {
                let failure = ReportFailure {
                    success: false,
                    error: format!("{:#}", e),
                };
                println!("{}", serde_json::to_string_pretty(&failure)?);
            }
            return Err(e);
        }
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&run.manifest)?),
        OutputFormat::Table => output_table(&run),
        OutputFormat::Pretty => output_pretty(&run),
    }

    Ok(())
}

fn output_pretty(run: &ReportRun) {
    use console::style;

    println!("\n{}", style("Page Speed Report").bold().cyan());
    println!("{}", style("=================").cyan());

    println!("\n  Workbook:  {}", style(&run.manifest.file_path).green());
    println!("  Sheets:    {}", run.manifest.sheets.join(", "));
    println!("  URLs:      {}", run.manifest.url_count);

    println!("\n{}", style("Scores (mobile / desktop):").bold());
    for url in run.document.urls() {
        let page = run.document.page(url);
        let score = |strategy| {
            page.and_then(|p| p.strategy(strategy))
                .map(|r| super::styled_score(r.performance_score).to_string())
                .unwrap_or_else(|| style("-").dim().to_string())
        };
        let template = run
            .document
            .template(url)
            .map(|t| format!(" {}", style(format!("[{}]", t)).dim()))
            .unwrap_or_default();

        println!(
            "  {:>3} / {:<3}  {}{}",
            score(Strategy::Mobile),
            score(Strategy::Desktop),
            url,
            template
        );
    }

    println!();
}

fn output_table(run: &ReportRun) {
    println!("URL,Template,Mobile Score,Desktop Score");
    for url in run.document.urls() {
        let page = run.document.page(url);
        let score = |strategy| {
            page.and_then(|p| p.strategy(strategy))
                .map(|r| r.performance_score.to_string())
                .unwrap_or_default()
        };
        println!(
            "{},{},{},{}",
            url,
            run.document.template(url).unwrap_or(""),
            score(Strategy::Mobile),
            score(Strategy::Desktop)
        );
    }
}
