use crate::Result;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Reads provider documents and bundles from JSON
pub struct InputReader;

impl InputReader {
    /// Read and parse a JSON document from the given path
    pub fn from_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
        tracing::debug!("Reading input file: {}", path.display());

        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let value: T = serde_json::from_reader(reader)?;

        tracing::debug!("Parsed input file: {}", path.display());

        Ok(value)
    }

    /// Parse a JSON document from a string
    pub fn from_str<T: DeserializeOwned>(content: &str) -> Result<T> {
        let value: T = serde_json::from_str(content)?;
        Ok(value)
    }
}
