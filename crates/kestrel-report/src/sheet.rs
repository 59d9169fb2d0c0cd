use crate::sanitize::sanitize;
use serde::Serialize;

/// Value of one worksheet cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Sanitized free text
    pub fn text(value: impl AsRef<str>) -> Self {
        Cell::Text(sanitize(value.as_ref()))
    }

    /// Fixed label that never needs sanitizing
    pub fn label(value: &str) -> Self {
        Cell::Text(value.to_string())
    }

    pub fn number(value: impl Into<f64>) -> Self {
        Cell::Number(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        value.map(Cell::text).unwrap_or(Cell::Empty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Column {
    pub header: &'static str,
    pub width: f64,
}

impl Column {
    pub const fn new(header: &'static str, width: f64) -> Self {
        Self { header, width }
    }
}

/// Inclusive column span that gets a red-yellow-green color scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorScale {
    pub first_col: u16,
    pub last_col: u16,
}

/// A fully laid out worksheet, independent of the file format
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub rows: Vec<Vec<Cell>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_scale: Option<ColorScale>,
}

impl Sheet {
    pub fn new(name: &'static str, columns: &'static [Column]) -> Self {
        Self {
            name,
            columns,
            rows: Vec::new(),
            color_scale: None,
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        debug_assert_eq!(row.len(), self.columns.len(), "row width for {}", self.name);
        self.rows.push(row);
    }

    pub fn headers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.header)
    }

    /// Cell by data row (0 = first row under the header) and header name
    pub fn cell(&self, row: usize, header: &str) -> Option<&Cell> {
        let col = self.columns.iter().position(|c| c.header == header)?;
        self.rows.get(row)?.get(col)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLUMNS: &[Column] = &[Column::new("URL", 60.0), Column::new("Score", 8.0)];

    #[test]
    fn test_text_cells_are_sanitized() {
        assert_eq!(Cell::text("a\x01b"), Cell::Text("ab".to_string()));
        assert_eq!(Cell::from(None::<String>), Cell::Empty);
    }

    #[test]
    fn test_cell_lookup_by_header() {
        let mut sheet = Sheet::new("Test", COLUMNS);
        sheet.push_row(vec![Cell::text("https://a/"), Cell::number(87)]);

        assert_eq!(sheet.headers().collect::<Vec<_>>(), vec!["URL", "Score"]);
        assert_eq!(sheet.cell(0, "Score").and_then(Cell::as_number), Some(87.0));
        assert!(sheet.cell(0, "Missing").is_none());
        assert!(sheet.cell(1, "URL").is_none());
    }
}
