//! Console rendering of an analysis report.

use crate::insight::Severity;
use crate::report::AnalysisReport;

fn glyph(severity: Severity) -> &'static str {
    match severity {
        Severity::HighRisk => "🚨",
        Severity::Warning => "⚠️",
        Severity::Reassuring => "✅",
        Severity::Neutral => "•",
    }
}

/// Pretty-print a report: rows, distribution, insights.
pub fn print_report(report: &AnalysisReport) {
    println!("\nAnalysis of {} ({})", report.target, report.base_url);
    println!("Found {} links.\n", report.distribution.total);

    if report.distribution.total == 0 {
        println!("No classifiable links on the page.");
        return;
    }

    println!("Classification:");
    for link in &report.links {
        println!("  {:<28} {}", link.category, link.url);
    }

    println!("\nCategory distribution:");
    for entry in &report.distribution.categories {
        println!(
            "  {:<28} {:>4}  ({:.1}%)",
            entry.category, entry.count, entry.percentage
        );
    }

    if let Some(extended) = &report.extended {
        println!("\nURL length by category (mean / median / max):");
        for stats in &extended.url_lengths {
            println!(
                "  {:<28} {:.1} / {:.1} / {}",
                stats.category, stats.mean, stats.median, stats.max
            );
        }
        println!("\nUnique domains by category:");
        for breakdown in &extended.domain_breakdown {
            println!(
                "  {:<28} {:>4}  [{}]",
                breakdown.category,
                breakdown.unique_domains,
                breakdown.domains.join(", ")
            );
        }
    }

    println!("\nInsights:");
    for insight in &report.insights {
        println!("  {} {}", glyph(insight.severity), insight.text);
    }
}

/// Machine-readable variant for `--json`.
pub fn print_report_json(report: &AnalysisReport) {
    match serde_json::to_string_pretty(report) {
        Ok(body) => println!("{body}"),
        Err(e) => eprintln!("error: failed to serialize report: {e}"),
    }
}
