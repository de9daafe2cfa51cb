//! External rendering layer: charts and CSV.
//!
//! Nothing here is part of the pipeline core — these are stateless
//! functions a host calls with an already-assembled report. The CLI
//! writes them as files; the REST layer embeds the charts base64 in
//! its JSON response.

pub mod charts;
pub mod csv;

use crate::report::AnalysisReport;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// File names written by [`write_outputs`].
pub const PIE_CHART_FILE: &str = "url_categories_pie.svg";
pub const BAR_CHART_FILE: &str = "url_categories_bar.svg";
pub const CSV_FILE: &str = "url_classification_results.csv";

/// Write the charts and CSV for a report under `dir`.
///
/// Returns the paths written, in a stable order.
pub fn write_outputs(dir: &Path, report: &AnalysisReport) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    let outputs = [
        (PIE_CHART_FILE, charts::pie_chart_svg(&report.distribution)),
        (BAR_CHART_FILE, charts::bar_chart_svg(&report.distribution)),
        (CSV_FILE, csv::classification_csv(&report.links)),
    ];

    let mut written = Vec::with_capacity(outputs.len());
    for (name, content) in outputs {
        let path = dir.join(name);
        std::fs::write(&path, content)
            .with_context(|| format!("writing {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}
