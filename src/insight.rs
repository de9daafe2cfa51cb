//! Category distribution statistics and risk insight derivation.
//!
//! The taxonomy (which categories count as malicious or benign, and
//! the tier thresholds) is configuration, not code: the defaults match
//! the model this crate ships with, but a host can load its own from
//! JSON.

use crate::classify::ClassifiedLink;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Which categories indicate risk, which reassure, and where the
/// overall tier cutoffs sit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskTaxonomy {
    pub malicious: Vec<String>,
    pub benign: Vec<String>,
    /// Above this summed malicious percentage → highly suspicious.
    pub high_risk_threshold: f64,
    /// Above this (and at or below high) → moderate risk.
    pub moderate_risk_threshold: f64,
}

impl Default for RiskTaxonomy {
    fn default() -> Self {
        Self {
            malicious: ["Phishing", "Malware", "Defacement", "Spam"]
                .map(String::from)
                .to_vec(),
            benign: ["Benign", "Safe"].map(String::from).to_vec(),
            high_risk_threshold: 50.0,
            moderate_risk_threshold: 20.0,
        }
    }
}

impl RiskTaxonomy {
    /// Load a taxonomy override from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading taxonomy {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing taxonomy {}", path.display()))
    }

    pub fn is_malicious(&self, category: &str) -> bool {
        self.malicious.iter().any(|c| c == category)
    }

    pub fn is_benign(&self, category: &str) -> bool {
        self.benign.iter().any(|c| c == category)
    }
}

/// One category's share of the classified links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
    pub percentage: f64,
}

/// Count and percentage per category over the full link set,
/// sentinel rows included. Ordered by descending count; ties keep
/// first-seen order. Recomputed per run, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryDistribution {
    pub total: usize,
    pub categories: Vec<CategoryCount>,
}

impl CategoryDistribution {
    pub fn from_rows(rows: &[ClassifiedLink]) -> Self {
        let total = rows.len();
        if total == 0 {
            return Self::default();
        }

        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for row in rows {
            let category = row.category.as_str();
            if !counts.contains_key(category) {
                order.push(category);
            }
            *counts.entry(category).or_insert(0) += 1;
        }

        let mut categories: Vec<CategoryCount> = order
            .into_iter()
            .map(|category| {
                let count = counts[category];
                CategoryCount {
                    category: category.to_string(),
                    count,
                    percentage: count as f64 / total as f64 * 100.0,
                }
            })
            .collect();
        // Stable sort: ties stay in first-seen order.
        categories.sort_by(|a, b| b.count.cmp(&a.count));

        Self { total, categories }
    }

    /// Summed percentage of categories in the taxonomy's malicious set.
    pub fn malicious_percentage(&self, taxonomy: &RiskTaxonomy) -> f64 {
        self.categories
            .iter()
            .filter(|c| taxonomy.is_malicious(&c.category))
            .map(|c| c.percentage)
            .sum()
    }
}

/// Overall risk tier from the summed malicious percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    HighlySuspicious,
    ModerateRisk,
    RelativelySafe,
}

impl RiskTier {
    pub fn from_percentage(pct: f64, taxonomy: &RiskTaxonomy) -> RiskTier {
        if pct > taxonomy.high_risk_threshold {
            RiskTier::HighlySuspicious
        } else if pct > taxonomy.moderate_risk_threshold {
            RiskTier::ModerateRisk
        } else {
            RiskTier::RelativelySafe
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::HighlySuspicious => "highly suspicious",
            RiskTier::ModerateRisk => "moderate risk",
            RiskTier::RelativelySafe => "relatively safe",
        }
    }
}

/// How strongly an insight should be flagged by a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    HighRisk,
    Warning,
    Reassuring,
    Neutral,
}

/// One generated risk statement. Ephemeral, produced once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub severity: Severity,
    pub text: String,
}

/// Compute the distribution and derive insights for one run.
///
/// Zero classified links is a defined, non-error outcome: empty
/// distribution, no insights, no division by zero.
pub fn aggregate(
    target: &str,
    rows: &[ClassifiedLink],
    taxonomy: &RiskTaxonomy,
) -> (CategoryDistribution, Vec<Insight>) {
    let distribution = CategoryDistribution::from_rows(rows);
    if distribution.total == 0 {
        return (distribution, Vec::new());
    }

    let mut insights = Vec::with_capacity(distribution.categories.len() + 1);
    for entry in &distribution.categories {
        let pct = entry.percentage;
        let lower = entry.category.to_lowercase();
        let insight = if taxonomy.is_malicious(&entry.category) {
            Insight {
                severity: Severity::HighRisk,
                text: format!("{target} shows a high risk of {lower} attacks ({pct:.1}%)."),
            }
        } else if taxonomy.is_benign(&entry.category) {
            Insight {
                severity: Severity::Reassuring,
                text: format!("{target} has a significant portion of safe links ({pct:.1}%)."),
            }
        } else {
            Insight {
                severity: Severity::Neutral,
                text: format!("{target} has {pct:.1}% of links categorized as {lower}."),
            }
        };
        insights.push(insight);
    }

    let malicious_pct = distribution.malicious_percentage(taxonomy);
    let overall = match RiskTier::from_percentage(malicious_pct, taxonomy) {
        RiskTier::HighlySuspicious => Insight {
            severity: Severity::HighRisk,
            text: format!(
                "{target} is highly suspicious, with {malicious_pct:.1}% of links classified as malicious."
            ),
        },
        RiskTier::ModerateRisk => Insight {
            severity: Severity::Warning,
            text: format!(
                "{target} shows moderate risk, with {malicious_pct:.1}% of links classified as malicious."
            ),
        },
        RiskTier::RelativelySafe => Insight {
            severity: Severity::Reassuring,
            text: format!(
                "{target} appears to be relatively safe, with only {malicious_pct:.1}% of links classified as malicious."
            ),
        },
    };
    insights.push(overall);

    (distribution, insights)
}
