//! CLI subcommand implementations for the linkscope binary.

pub mod analyze_cmd;
pub mod output;
pub mod prompt;
pub mod serve_cmd;

use crate::insight::RiskTaxonomy;
use crate::model::artifacts::load_bundle;
use crate::pipeline::Analyzer;
use anyhow::{Context, Result};
use std::path::Path;

/// Build an analyzer from the command-line artifact locations.
pub fn build_analyzer(models_dir: &Path, taxonomy_path: Option<&Path>) -> Result<Analyzer> {
    let bundle = load_bundle(models_dir);
    if !bundle.is_complete() {
        tracing::warn!(
            dir = %models_dir.display(),
            missing = %bundle.missing().join(", "),
            "classifier artifacts incomplete"
        );
    }

    let taxonomy = match taxonomy_path {
        Some(path) => RiskTaxonomy::from_file(path).context("loading risk taxonomy")?,
        None => RiskTaxonomy::default(),
    };

    Ok(Analyzer::new(bundle, taxonomy))
}
