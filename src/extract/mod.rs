//! Extraction module: turns a fetched page body into named field values
//!
//! Extraction is a pluggable step. The orchestrator only sees the
//! [`Extractor`] trait; [`SelectorExtractor`] is the CSS-selector
//! implementation used by the command-line tool.

mod parser;
mod selector;

pub use parser::{SelectorExtractor, DEFAULT_FIELDS};
pub use selector::Selector;

use std::collections::BTreeMap;
use thiserror::Error;

/// Field name -> extracted values (empty when nothing matched)
pub type ExtractedData = BTreeMap<String, Vec<String>>;

/// Errors raised while extracting fields from a fetched body
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Selector '{name}' could not be applied: {message}")]
    Selector { name: String, message: String },

    #[error("{0}")]
    Failed(String),
}

/// Extracts fields from a successfully fetched page body
///
/// Implementations must be shareable across the concurrent per-URL tasks of a
/// run. A returned error is reported for that URL only.
pub trait Extractor: Send + Sync {
    fn extract(&self, body: &str) -> Result<ExtractedData, ExtractError>;
}

impl<F> Extractor for F
where
    F: Fn(&str) -> Result<ExtractedData, ExtractError> + Send + Sync,
{
    fn extract(&self, body: &str) -> Result<ExtractedData, ExtractError> {
        self(body)
    }
}
