pub mod document;
pub mod error;
pub mod field;
pub mod lab;
pub mod metrics;
pub mod network;
pub mod reader;

pub use document::{AnalysisDocument, Bundle, DocumentBuilder, PageInput, PageResult, UrlEntry};
pub use error::{Error, Result};
pub use reader::InputReader;

/// Common seam for everything that turns provider-native data into the
/// canonical model.
pub trait Normalizer {
    type Input: ?Sized;
    type Output;

    fn normalize(&self, input: &Self::Input) -> crate::Result<Self::Output>;
}
