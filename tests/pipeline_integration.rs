//! End-to-end pipeline tests against a local mock web server.

use anyhow::Result;
use linkscope::classify::{CLASSIFICATION_ERROR, CLASSIFICATION_UNAVAILABLE};
use linkscope::error::AnalysisError;
use linkscope::insight::{RiskTaxonomy, RiskTier, Severity};
use linkscope::model::{LabelDecoder, ModelBundle, Predictor, SparseVector, Vectorizer};
use linkscope::pipeline::Analyzer;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Vectorizer that passes the URL through as a single pseudo-feature:
/// column 0 for URLs containing "login" or "verify", column 1 otherwise.
struct KeywordVectorizer;
impl Vectorizer for KeywordVectorizer {
    fn transform(&self, text: &str) -> Result<SparseVector> {
        if text.contains("boom") {
            anyhow::bail!("synthetic transform failure");
        }
        let column = usize::from(!(text.contains("login") || text.contains("verify")));
        Ok(vec![(column, 1.0)])
    }
}

struct ColumnPredictor;
impl Predictor for ColumnPredictor {
    fn predict(&self, features: &SparseVector) -> Result<usize> {
        Ok(features.first().map(|&(column, _)| column).unwrap_or(1))
    }
}

struct PhishingLabels;
impl LabelDecoder for PhishingLabels {
    fn decode(&self, index: usize) -> Result<String> {
        self.labels()
            .get(index)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("bad index {index}"))
    }
    fn labels(&self) -> &[String] {
        static LABELS: std::sync::OnceLock<Vec<String>> = std::sync::OnceLock::new();
        LABELS.get_or_init(|| vec!["Phishing".to_string(), "Benign".to_string()])
    }
}

fn keyword_bundle() -> ModelBundle {
    ModelBundle::new(
        Arc::new(KeywordVectorizer),
        Arc::new(ColumnPredictor),
        Arc::new(PhishingLabels),
    )
}

fn analyzer() -> Analyzer {
    Analyzer::new(keyword_bundle(), RiskTaxonomy::default())
}

async fn serve_page(html: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html.to_string()))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn analyze_url_classifies_and_aggregates() {
    let server = serve_page(
        r#"<html><body>
            <a href="/login">sign in</a>
            <a href="/about">about</a>
            <a href="https://partner.example/docs">docs</a>
            <a href="mailto:x@example.com">mail</a>
        </body></html>"#,
    )
    .await;

    let report = analyzer().analyze_url(&server.uri(), false).await.unwrap();

    // mailto is excluded; three rows in document order.
    assert_eq!(report.links.len(), 3);
    assert!(report.links[0].url.ends_with("/login"));
    assert_eq!(report.links[0].category, "Phishing");
    assert_eq!(report.links[1].category, "Benign");
    assert_eq!(report.links[2].category, "Benign");

    assert_eq!(report.distribution.total, 3);
    assert_eq!(report.distribution.categories[0].category, "Benign");
    assert_eq!(report.distribution.categories[0].count, 2);

    // 33.3% malicious → moderate risk.
    assert_eq!(report.risk_tier, Some(RiskTier::ModerateRisk));
    let overall = report.insights.last().unwrap();
    assert_eq!(overall.severity, Severity::Warning);
    assert!(overall.text.contains("moderate risk"));
}

#[tokio::test]
async fn one_bad_link_degrades_to_sentinel_only() {
    let server = serve_page(
        r#"<a href="/boom">bad</a><a href="/fine">ok</a>"#,
    )
    .await;

    let report = analyzer().analyze_url(&server.uri(), false).await.unwrap();
    assert_eq!(report.links.len(), 2);
    assert_eq!(report.links[0].category, CLASSIFICATION_ERROR);
    assert_eq!(report.links[1].category, "Benign");
}

#[tokio::test]
async fn incomplete_bundle_fails_before_any_fetch() {
    let analyzer = Analyzer::new(ModelBundle::default(), RiskTaxonomy::default());
    // Nothing is listening on this port; if the pipeline tried to
    // fetch first, we would see a Network error instead.
    match analyzer.analyze_url("http://127.0.0.1:1/", false).await {
        Err(AnalysisError::ModelUnavailable(missing)) => {
            assert!(missing.contains("vectorizer"));
        }
        other => panic!("expected ModelUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn incomplete_bundle_sentinel_when_used_directly() {
    use linkscope::classify::ClassifierAdapter;
    let adapter = ClassifierAdapter::new(ModelBundle::default());
    assert_eq!(adapter.classify("http://x.example"), CLASSIFICATION_UNAVAILABLE);
}

#[tokio::test]
async fn invalid_target_fails_fast() {
    match analyzer().analyze("not a valid host", false).await {
        Err(AnalysisError::InvalidTarget(input)) => assert_eq!(input, "not a valid host"),
        other => panic!("expected InvalidTarget, got {other:?}"),
    }
}

#[tokio::test]
async fn http_error_status_aborts_the_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    match analyzer().analyze_url(&server.uri(), false).await {
        Err(AnalysisError::Http { status, .. }) => assert_eq!(status, 503),
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn page_with_no_links_yields_empty_report() {
    let server = serve_page("<html><body><p>nothing here</p></body></html>").await;

    let report = analyzer().analyze_url(&server.uri(), false).await.unwrap();
    assert!(report.links.is_empty());
    assert_eq!(report.distribution.total, 0);
    assert!(report.insights.is_empty());
    assert!(report.risk_tier.is_none());
}

#[tokio::test]
async fn extended_stats_attach_on_request() {
    let server = serve_page(
        r#"<a href="/a">a</a><a href="https://other.example/bb">b</a>"#,
    )
    .await;

    let report = analyzer().analyze_url(&server.uri(), true).await.unwrap();
    let extended = report.extended.expect("extended stats requested");
    assert!(!extended.url_lengths.is_empty());
    assert!(!extended.domain_breakdown.is_empty());

    let without = analyzer().analyze_url(&server.uri(), false).await.unwrap();
    assert!(without.extended.is_none());
}
