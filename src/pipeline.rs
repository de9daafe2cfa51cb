//! End-to-end analysis pipeline.
//!
//! validate → model check → fetch → extract → classify → aggregate →
//! assemble. Validation, model-load, and fetch failures fail the whole
//! run with no partial report; per-link classification failures are
//! absorbed as sentinel rows inside the report.

use crate::classify::ClassifierAdapter;
use crate::error::AnalysisError;
use crate::extract::extract_links;
use crate::fetch::PageFetcher;
use crate::insight::{aggregate, RiskTaxonomy};
use crate::model::ModelBundle;
use crate::report::{assemble, AnalysisReport};
use crate::target::{validate, AnalysisTarget};

/// One-stop analyzer: holds the fetcher, the immutable model bundle,
/// and the taxonomy. Cheap to share behind an `Arc` across concurrent
/// host requests; each call runs one target end-to-end.
pub struct Analyzer {
    fetcher: PageFetcher,
    adapter: ClassifierAdapter,
    taxonomy: RiskTaxonomy,
}

impl Analyzer {
    pub fn new(bundle: ModelBundle, taxonomy: RiskTaxonomy) -> Self {
        Self {
            fetcher: PageFetcher::default(),
            adapter: ClassifierAdapter::new(bundle),
            taxonomy,
        }
    }

    pub fn with_fetcher(mut self, fetcher: PageFetcher) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn taxonomy(&self) -> &RiskTaxonomy {
        &self.taxonomy
    }

    /// Analyze a raw user input (domain or IP literal).
    pub async fn analyze(
        &self,
        input: &str,
        extended: bool,
    ) -> Result<AnalysisReport, AnalysisError> {
        let target = validate(input)
            .await
            .ok_or_else(|| AnalysisError::InvalidTarget(input.to_string()))?;
        self.ensure_model()?;
        self.run(target, extended).await
    }

    /// Dispatch on input shape: scheme-qualified URLs skip the
    /// domain/IP validator (the host vouches for them); bare inputs go
    /// through [`validate`].
    pub async fn analyze_input(
        &self,
        input: &str,
        extended: bool,
    ) -> Result<AnalysisReport, AnalysisError> {
        if input.starts_with("http://") || input.starts_with("https://") {
            self.analyze_url(input, extended).await
        } else {
            self.analyze(input, extended).await
        }
    }

    /// Analyze a base URL the host already validated.
    pub async fn analyze_url(
        &self,
        base_url: &str,
        extended: bool,
    ) -> Result<AnalysisReport, AnalysisError> {
        let target = AnalysisTarget::from_base_url(base_url)
            .ok_or_else(|| AnalysisError::InvalidTarget(base_url.to_string()))?;
        self.ensure_model()?;
        self.run(target, extended).await
    }

    /// Model completeness check, before any network traffic.
    fn ensure_model(&self) -> Result<(), AnalysisError> {
        if self.adapter.is_ready() {
            Ok(())
        } else {
            Err(AnalysisError::ModelUnavailable(
                self.adapter.bundle().missing().join(", "),
            ))
        }
    }

    async fn run(
        &self,
        target: AnalysisTarget,
        extended: bool,
    ) -> Result<AnalysisReport, AnalysisError> {
        let html = self.fetcher.fetch(target.base_url()).await?;
        let links = extract_links(&html, target.base_url());
        tracing::info!(input = target.raw(), links = links.len(), "classifying links");

        let rows = self.adapter.classify_all(&links);
        let (distribution, insights) = aggregate(target.raw(), &rows, &self.taxonomy);

        Ok(assemble(
            &target,
            rows,
            distribution,
            insights,
            &self.taxonomy,
            extended,
        ))
    }
}
