//! Output module for rendering batch results
//!
//! This module handles:
//! - Writing results as line-delimited JSON or CSV
//! - Printing a per-URL console summary
//! - Batch statistics

mod csv_output;
mod jsonl;
pub mod stats;
mod traits;

pub use csv_output::CsvWriter;
pub use jsonl::JsonlWriter;
pub use stats::{format_summary_line, print_statistics, print_summary, RunStatistics};
pub use traits::{OutputError, OutputFormat, OutputResult, ResultWriter};

use crate::fetch::PageResult;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Returns the writer for `format`
///
/// # Arguments
///
/// * `format` - The output format
/// * `columns` - Field columns, used by tabular formats
pub fn writer_for(format: OutputFormat, columns: Vec<String>) -> Box<dyn ResultWriter> {
    match format {
        OutputFormat::Jsonl => Box::new(JsonlWriter),
        OutputFormat::Csv => Box::new(CsvWriter::new(columns)),
    }
}

/// Writes a batch of results to a file
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote every result
/// * `Err(OutputError)` - Failed to create or write the file
pub fn write_results_to_file(
    path: &Path,
    format: OutputFormat,
    columns: Vec<String>,
    results: &[PageResult],
) -> OutputResult<()> {
    let mut file = BufWriter::new(File::create(path)?);
    writer_for(format, columns).write_results(&mut file, results)
}
