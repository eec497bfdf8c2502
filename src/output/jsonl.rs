//! Line-delimited JSON output

use crate::fetch::PageResult;
use crate::output::traits::{OutputResult, ResultWriter};
use std::io::Write;

/// Writes one JSON object per result: `{"url","ok","data"}` or `{"url","ok","error"}`
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonlWriter;

impl ResultWriter for JsonlWriter {
    fn write_results(&self, out: &mut dyn Write, results: &[PageResult]) -> OutputResult<()> {
        for result in results {
            serde_json::to_writer(&mut *out, result)?;
            out.write_all(b"\n")?;
        }
        out.flush()?;
        Ok(())
    }
}
