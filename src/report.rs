//! Report assembly: pure packaging, no I/O.
//!
//! Bundles the classified rows, distribution, and insights into one
//! immutable value the host can render as console text, JSON, CSV, or
//! charts. Extended statistics (URL length per category, unique-domain
//! breakdown) are computed on request with the same group-by-category
//! approach.

use crate::classify::ClassifiedLink;
use crate::insight::{CategoryDistribution, Insight, RiskTaxonomy, RiskTier};
use crate::target::AnalysisTarget;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use url::Url;

/// URL length statistics for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlLengthStats {
    pub category: String,
    pub mean: f64,
    pub median: f64,
    pub max: usize,
    pub longest_url: String,
}

/// Unique-domain breakdown for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainBreakdown {
    pub category: String,
    pub unique_domains: usize,
    pub domains: Vec<String>,
}

/// Optional secondary statistics attached to a report on request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedStats {
    pub url_lengths: Vec<UrlLengthStats>,
    pub domain_breakdown: Vec<DomainBreakdown>,
}

/// Complete output of one analysis run. Owned by that run; no
/// cross-run identity.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub target: String,
    pub base_url: String,
    pub generated_at: DateTime<Utc>,
    pub links: Vec<ClassifiedLink>,
    pub distribution: CategoryDistribution,
    pub insights: Vec<Insight>,
    /// Absent when the page had no classifiable links.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_tier: Option<RiskTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended: Option<ExtendedStats>,
}

/// Assemble the final report from the run's pieces.
pub fn assemble(
    target: &AnalysisTarget,
    links: Vec<ClassifiedLink>,
    distribution: CategoryDistribution,
    insights: Vec<Insight>,
    taxonomy: &RiskTaxonomy,
    extended: bool,
) -> AnalysisReport {
    let risk_tier = (distribution.total > 0).then(|| {
        RiskTier::from_percentage(distribution.malicious_percentage(taxonomy), taxonomy)
    });
    let extended = extended.then(|| extended_stats(&links, &distribution));

    AnalysisReport {
        target: target.raw().to_string(),
        base_url: target.base_url().to_string(),
        generated_at: Utc::now(),
        links,
        distribution,
        insights,
        risk_tier,
        extended,
    }
}

/// Group rows by category (distribution order) and compute the
/// secondary statistics.
pub fn extended_stats(
    links: &[ClassifiedLink],
    distribution: &CategoryDistribution,
) -> ExtendedStats {
    let mut url_lengths = Vec::with_capacity(distribution.categories.len());
    let mut domain_breakdown = Vec::with_capacity(distribution.categories.len());

    for entry in &distribution.categories {
        let in_category: Vec<&ClassifiedLink> = links
            .iter()
            .filter(|l| l.category == entry.category)
            .collect();
        if in_category.is_empty() {
            continue;
        }

        let mut lengths: Vec<usize> = in_category.iter().map(|l| l.url.len()).collect();
        lengths.sort_unstable();
        let sum: usize = lengths.iter().sum();
        let longest = in_category
            .iter()
            .max_by_key(|l| l.url.len())
            .map(|l| l.url.clone())
            .unwrap_or_default();

        url_lengths.push(UrlLengthStats {
            category: entry.category.clone(),
            mean: sum as f64 / lengths.len() as f64,
            median: median_of_sorted(&lengths),
            max: *lengths.last().unwrap_or(&0),
            longest_url: longest,
        });

        let domains: BTreeSet<String> = in_category
            .iter()
            .filter_map(|l| Url::parse(&l.url).ok())
            .filter_map(|u| u.host_str().map(str::to_string))
            .collect();
        domain_breakdown.push(DomainBreakdown {
            category: entry.category.clone(),
            unique_domains: domains.len(),
            domains: domains.into_iter().collect(),
        });
    }

    ExtendedStats {
        url_lengths,
        domain_breakdown,
    }
}

fn median_of_sorted(sorted: &[usize]) -> f64 {
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        sorted[n / 2] as f64
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) as f64 / 2.0
    }
}
