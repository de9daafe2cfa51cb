//! `linkscope analyze <target>` — run one analysis end-to-end.

use super::output;
use crate::pipeline::Analyzer;
use crate::render::write_outputs;
use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

pub struct AnalyzeOptions<'a> {
    pub extended: bool,
    pub json: bool,
    pub quiet: bool,
    /// Write charts and CSV here when set.
    pub out_dir: Option<&'a Path>,
}

/// Run one target through an already-built analyzer.
///
/// Returns `Ok(false)` when the run failed in a reportable way, so the
/// interactive prompt can keep going while the one-shot command exits
/// non-zero.
pub async fn run_one(analyzer: &Analyzer, target: &str, opts: &AnalyzeOptions<'_>) -> Result<bool> {
    let spinner = if opts.quiet || opts.json {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("analyzing {target}..."));
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    };

    let result = analyzer.analyze_input(target, opts.extended).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            if opts.json {
                println!(
                    "{}",
                    serde_json::json!({ "error": { "code": e.code(), "message": e.to_string() } })
                );
            } else {
                eprintln!("error: {e}");
            }
            return Ok(false);
        }
    };

    if opts.json {
        output::print_report_json(&report);
    } else {
        output::print_report(&report);
    }

    if let Some(dir) = opts.out_dir {
        let written = write_outputs(dir, &report)?;
        if !opts.quiet && !opts.json {
            println!();
            for path in written {
                println!("wrote {}", path.display());
            }
        }
    }

    Ok(true)
}
