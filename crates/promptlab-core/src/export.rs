//! CSV export of a result set

use std::fmt::Write as _;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::TestResult;

/// Header row of the exported file
pub const CSV_HEADER: &str = "Input,Output,Latency(ms),Cost($),Quality(0-1)";

/// Quote a field: line breaks become single spaces, quotes are doubled
pub fn escape_csv_field(value: &str) -> String {
    let flattened = value.replace("\r\n", " ").replace(['\n', '\r'], " ");
    format!("\"{}\"", flattened.replace('"', "\"\""))
}

/// Render results as CSV text, one row per input, header first
pub fn results_to_csv(results: &[TestResult]) -> String {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for result in results {
        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "{},{},{},{},{}",
            escape_csv_field(result.question()),
            escape_csv_field(&result.ai_response),
            escape_csv_field(&result.response_time_ms.to_string()),
            escape_csv_field(&format!("{:.6}", result.cost_usd)),
            escape_csv_field(&format!("{:.2}", result.quality_score)),
        );
    }
    out
}

/// Write the CSV export to `path`, creating parent directories
pub fn write_csv(path: &Path, results: &[TestResult]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::export(format!("Failed to create {}: {}", parent.display(), e)))?;
    }
    std::fs::write(path, results_to_csv(results))
        .map_err(|e| Error::export(format!("Failed to write {}: {}", path.display(), e)))?;
    tracing::info!("Exported {} results to {:?}", results.len(), path);
    Ok(())
}
