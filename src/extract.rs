//! Hyperlink extraction from fetched HTML.
//!
//! Collects every `<a href>` whose value is an absolute URL or an
//! absolute path; `mailto:`, `javascript:`, and fragment-only anchors
//! never reach the classifier. The result is fully materialized —
//! downstream percentage math needs the complete count up front.

use crate::target::normalize;
use scraper::{Html, Selector};

/// Extract candidate links from a page, resolved against `base_url`.
///
/// Output order is document order and is preserved through
/// classification and aggregation.
pub fn extract_links(html: &str, base_url: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let sel = Selector::parse("a[href]").unwrap();

    let mut links = Vec::new();
    for element in document.select(&sel) {
        let href = element.value().attr("href").unwrap_or("");
        if !(href.starts_with("http") || href.starts_with('/')) {
            continue;
        }
        links.push(normalize(base_url, href));
    }

    tracing::debug!(count = links.len(), base_url, "extracted links");
    links
}
