use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read input file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse provider document: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Malformed provider document: {0}")]
    MalformedInput(String),

    #[error("No analyzable page data in bundle")]
    NoPageData,
}

pub type Result<T> = std::result::Result<T, Error>;
