//! Batch statistics and console summary

use crate::fetch::PageResult;

/// Counts for one finished batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStatistics {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl RunStatistics {
    /// Tallies a batch of results
    pub fn from_results(results: &[PageResult]) -> Self {
        let succeeded = results.iter().filter(|r| r.ok).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
        }
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.succeeded as f64 / self.total as f64) * 100.0
    }
}

/// One console line per result
///
/// `OK  <url> -> {field: count, ...}` or `ERR <url> -> <cause>`
pub fn format_summary_line(result: &PageResult) -> String {
    match (&result.data, &result.error) {
        (Some(data), _) if result.ok => {
            let sizes: Vec<String> = data
                .iter()
                .map(|(name, values)| format!("{}: {}", name, values.len()))
                .collect();
            format!("OK  {} -> {{{}}}", result.url, sizes.join(", "))
        }
        (_, error) => format!(
            "ERR {} -> {}",
            result.url,
            error.as_deref().unwrap_or("unknown error")
        ),
    }
}

/// Prints one summary line per result to stdout
pub fn print_summary(results: &[PageResult]) {
    for result in results {
        println!("{}", format_summary_line(result));
    }
}

/// Prints batch statistics to stdout
pub fn print_statistics(stats: &RunStatistics) {
    println!(
        "\n{} URLs: {} ok, {} failed ({:.1}% success)",
        stats.total,
        stats.succeeded,
        stats.failed,
        stats.success_rate()
    );
}
