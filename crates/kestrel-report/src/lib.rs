pub mod config;
pub mod error;
pub mod sanitize;
pub mod sheet;
pub mod sheets;
pub mod writer;

pub use config::ReportConfig;
pub use error::{Error, Result};
pub use sheet::{Cell, Column, Sheet};
pub use sheets::{SHEET_NAMES, SheetBuilder, build_all};
pub use writer::{ReportManifest, WorkbookWriter};
