//! CSV export of classification rows.

use crate::classify::ClassifiedLink;

/// Render the rows as RFC-4180 CSV with a header line.
pub fn classification_csv(rows: &[ClassifiedLink]) -> String {
    let mut out = String::from("url,category\n");
    for row in rows {
        out.push_str(&format!(
            "{},{}\n",
            csv_escape(&row.url),
            csv_escape(&row.category)
        ));
    }
    out
}

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(url: &str, category: &str) -> ClassifiedLink {
        ClassifiedLink {
            url: url.to_string(),
            category: category.to_string(),
        }
    }

    #[test]
    fn test_plain_rows() {
        let csv = classification_csv(&[row("http://a.com/x", "Benign")]);
        assert_eq!(csv, "url,category\nhttp://a.com/x,Benign\n");
    }

    #[test]
    fn test_empty_rows_still_emit_header() {
        assert_eq!(classification_csv(&[]), "url,category\n");
    }

    #[test]
    fn test_quoting_of_commas_and_quotes() {
        let csv = classification_csv(&[row("http://a.com/?q=1,2", "Say \"hi\"")]);
        assert_eq!(
            csv,
            "url,category\n\"http://a.com/?q=1,2\",\"Say \"\"hi\"\"\"\n"
        );
    }
}
