//! CSV output

use crate::fetch::PageResult;
use crate::output::traits::{OutputResult, ResultWriter};
use std::io::Write;

/// Separator between multiple values of one field
const VALUE_SEPARATOR: &str = " | ";

/// Writes a `url,<fields...>` header and one row per result
///
/// Multiple values of a field share one cell. A failed URL carries
/// `ERROR: <cause>` in its first field column.
#[derive(Debug, Clone)]
pub struct CsvWriter {
    columns: Vec<String>,
}

impl CsvWriter {
    /// Creates a writer for the given field columns
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns }
    }

    fn row(&self, result: &PageResult) -> Vec<String> {
        let mut row = Vec::with_capacity(self.columns.len() + 1);
        row.push(result.url.clone());

        match &result.data {
            Some(data) if result.ok => {
                for column in &self.columns {
                    let cell = data
                        .get(column)
                        .map(|values| values.join(VALUE_SEPARATOR))
                        .unwrap_or_default();
                    row.push(cell);
                }
            }
            _ => {
                let error = result.error.as_deref().unwrap_or_default();
                row.push(format!("ERROR: {}", error));
                row.extend(std::iter::repeat(String::new()).take(self.columns.len().saturating_sub(1)));
            }
        }

        row
    }
}

impl ResultWriter for CsvWriter {
    fn write_results(&self, out: &mut dyn Write, results: &[PageResult]) -> OutputResult<()> {
        let mut writer = csv::Writer::from_writer(out);

        let mut header = vec!["url".to_string()];
        header.extend(self.columns.iter().cloned());
        writer.write_record(&header)?;

        for result in results {
            writer.write_record(self.row(result))?;
        }

        writer.flush()?;
        Ok(())
    }
}
