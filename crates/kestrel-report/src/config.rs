use std::path::PathBuf;

/// Where and under which name reports are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    /// Prefixed to the file name when set
    pub job_id: Option<String>,
}

impl ReportConfig {
    pub fn new(output_dir: impl Into<PathBuf>, job_id: Option<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            job_id: job_id.filter(|id| !id.is_empty()),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::new("./output", None)
    }
}
