use crate::config::ReportConfig;
use crate::sanitize::PLACEHOLDER;
use crate::sheet::{Cell, Sheet};
use crate::sheets::build_all;
use crate::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use kestrel_core::AnalysisDocument;
use rust_xlsxwriter::{
    Color, ConditionalFormat3ColorScale, ConditionalFormatType, Format, FormatAlign, Workbook,
    Worksheet,
};
use serde::{Deserialize, Serialize};

const HEADER_FILL: u32 = 0xCCE5FF;
const SCALE_MIN: u32 = 0xF8696B;
const SCALE_MID: u32 = 0xFFEB84;
const SCALE_MAX: u32 = 0x63BE7B;

/// What was written, for whoever assembles the final report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportManifest {
    pub success: bool,
    pub file_path: String,
    pub filename: String,
    pub sheets: Vec<String>,
    pub url_count: usize,
    pub generated_at: String,
}

/// Persists an analysis document as a four-sheet workbook
pub struct WorkbookWriter {
    config: ReportConfig,
}

impl WorkbookWriter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn write(&self, document: &AnalysisDocument) -> Result<ReportManifest> {
        let sheets = build_all(document);
        self.write_sheets(&sheets, document.url_count(), Utc::now())
    }

    fn write_sheets(
        &self,
        sheets: &[Sheet],
        url_count: usize,
        now: DateTime<Utc>,
    ) -> Result<ReportManifest> {
        let filename = report_filename(self.config.job_id.as_deref(), &now);
        std::fs::create_dir_all(&self.config.output_dir)?;
        let file_path = self.config.output_dir.join(&filename);

        tracing::debug!("Writing workbook to {}", file_path.display());

        let mut workbook = render(sheets)?;
        workbook.save(&file_path)?;

        tracing::info!(
            "Report written: {} ({} sheets, {} URLs)",
            file_path.display(),
            sheets.len(),
            url_count
        );

        Ok(ReportManifest {
            success: true,
            file_path: file_path.display().to_string(),
            filename,
            sheets: sheets.iter().map(|s| s.name.to_string()).collect(),
            url_count,
            generated_at: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        })
    }
}

/// `page_speed_analysis_[<job_id>_]<YYYYmmdd_HHMMSS>.xlsx`
pub fn report_filename(job_id: Option<&str>, now: &DateTime<Utc>) -> String {
    let prefix = job_id.map(|id| format!("{}_", id)).unwrap_or_default();
    format!(
        "page_speed_analysis_{}{}.xlsx",
        prefix,
        now.format("%Y%m%d_%H%M%S")
    )
}

/// Lay the sheets out into an in-memory workbook
pub fn render(sheets: &[Sheet]) -> Result<Workbook> {
    let header = Format::new()
        .set_bold()
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_align(FormatAlign::Center);

    let mut workbook = Workbook::new();
    for sheet in sheets {
        workbook.push_worksheet(render_sheet(sheet, &header)?);
    }
    Ok(workbook)
}

fn render_sheet(sheet: &Sheet, header: &Format) -> Result<Worksheet> {
    let mut worksheet = Worksheet::new();
    worksheet.set_name(sheet.name)?;

    for (col, column) in sheet.columns.iter().enumerate() {
        let col = col as u16;
        worksheet.write_string_with_format(0, col, column.header, header)?;
        worksheet.set_column_width(col, column.width)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    for (idx, row) in sheet.rows.iter().enumerate() {
        let row_num = idx as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Empty => {}
                Cell::Number(value) => {
                    worksheet.write_number(row_num, col, *value)?;
                }
                Cell::Text(text) => {
                    write_text(&mut worksheet, row_num, col, text)?;
                }
            }
        }
    }

    if let Some(scale) = sheet.color_scale
        && !sheet.rows.is_empty()
    {
        let format = ConditionalFormat3ColorScale::new()
            .set_minimum_color(Color::RGB(SCALE_MIN))
            .set_midpoint(ConditionalFormatType::Percentile, 50)
            .set_midpoint_color(Color::RGB(SCALE_MID))
            .set_maximum_color(Color::RGB(SCALE_MAX));
        worksheet.add_conditional_format(
            1,
            scale.first_col,
            sheet.rows.len() as u32,
            scale.last_col,
            &format,
        )?;
    }

    tracing::debug!("Rendered sheet {} with {} rows", sheet.name, sheet.rows.len());

    Ok(worksheet)
}

/// Write a text cell, replacing a rejected value with the placeholder.
///
/// Returns the string that ended up in the cell.
fn write_text<'a>(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    text: &'a str,
) -> Result<&'a str> {
    let written = worksheet.write_string(row, col, text).map(|_| ());
    match written {
        Ok(()) => Ok(text),
        Err(e) => {
            tracing::warn!("Cell ({}, {}) rejected, writing placeholder: {}", row, col, e);
            worksheet.write_string(row, col, PLACEHOLDER)?;
            Ok(PLACEHOLDER)
        }
    }
}
