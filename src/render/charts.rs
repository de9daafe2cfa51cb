//! Stateless SVG chart rendering.
//!
//! Each function takes the distribution as an explicit argument and
//! returns a standalone SVG document — no shared figure state, no
//! plotting framework. Hosts write the string to a file or embed it
//! base64 in a JSON response.

use crate::insight::CategoryDistribution;
use std::f64::consts::PI;

/// Fixed palette, cycled when there are more categories than colors.
const PALETTE: [&str; 8] = [
    "#4e79a7", "#f28e2b", "#e15759", "#76b7b2", "#59a14f", "#edc948", "#b07aa1", "#9c755f",
];

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 420.0;

fn color(i: usize) -> &'static str {
    PALETTE[i % PALETTE.len()]
}

fn svg_open(title: &str) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}" font-family="sans-serif">
<text x="{x}" y="24" text-anchor="middle" font-size="16">{title}</text>
"#,
        x = WIDTH / 2.0,
        title = escape(title),
    )
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn empty_chart(title: &str) -> String {
    let mut svg = svg_open(title);
    svg.push_str(&format!(
        r##"<text x="{x}" y="{y}" text-anchor="middle" font-size="14" fill="#888">no classified links</text>
</svg>
"##,
        x = WIDTH / 2.0,
        y = HEIGHT / 2.0,
    ));
    svg
}

/// Pie chart of the category shares.
pub fn pie_chart_svg(distribution: &CategoryDistribution) -> String {
    if distribution.total == 0 {
        return empty_chart("URL Categories");
    }

    let (cx, cy, r) = (220.0f64, 230.0f64, 160.0f64);
    let mut svg = svg_open("URL Categories");

    let mut angle = -PI / 2.0;
    for (i, entry) in distribution.categories.iter().enumerate() {
        let fraction = entry.count as f64 / distribution.total as f64;
        let sweep = fraction * 2.0 * PI;

        if fraction >= 1.0 {
            // A full-circle arc degenerates; draw a circle instead.
            svg.push_str(&format!(
                r#"<circle cx="{cx}" cy="{cy}" r="{r}" fill="{fill}"/>
"#,
                fill = color(i),
            ));
        } else {
            let (x1, y1) = (cx + r * angle.cos(), cy + r * angle.sin());
            let end = angle + sweep;
            let (x2, y2) = (cx + r * end.cos(), cy + r * end.sin());
            let large_arc = i32::from(sweep > PI);
            svg.push_str(&format!(
                r##"<path d="M {cx:.2} {cy:.2} L {x1:.2} {y1:.2} A {r:.2} {r:.2} 0 {large_arc} 1 {x2:.2} {y2:.2} Z" fill="{fill}" stroke="#fff" stroke-width="1"/>
"##,
                fill = color(i),
            ));
        }
        angle += sweep;
    }

    // Legend on the right.
    for (i, entry) in distribution.categories.iter().enumerate() {
        let y = 60.0 + i as f64 * 22.0;
        svg.push_str(&format!(
            r#"<rect x="420" y="{ry}" width="14" height="14" fill="{fill}"/>
<text x="440" y="{ty}" font-size="13">{label} ({pct:.1}%)</text>
"#,
            ry = y - 11.0,
            ty = y,
            fill = color(i),
            label = escape(&entry.category),
            pct = entry.percentage,
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

/// Bar chart of the category counts.
pub fn bar_chart_svg(distribution: &CategoryDistribution) -> String {
    if distribution.total == 0 {
        return empty_chart("URL Categories Distribution");
    }

    let max_count = distribution
        .categories
        .iter()
        .map(|c| c.count)
        .max()
        .unwrap_or(1) as f64;

    let n = distribution.categories.len() as f64;
    let plot_left = 60.0;
    let plot_bottom = HEIGHT - 70.0;
    let plot_height = plot_bottom - 50.0;
    let plot_width = WIDTH - plot_left - 30.0;
    let slot = plot_width / n;
    let bar_width = (slot * 0.7).min(80.0);

    let mut svg = svg_open("URL Categories Distribution");
    svg.push_str(&format!(
        r##"<line x1="{plot_left}" y1="{plot_bottom}" x2="{x2}" y2="{plot_bottom}" stroke="#333"/>
"##,
        x2 = plot_left + plot_width,
    ));

    for (i, entry) in distribution.categories.iter().enumerate() {
        let height = entry.count as f64 / max_count * plot_height;
        let x = plot_left + i as f64 * slot + (slot - bar_width) / 2.0;
        let y = plot_bottom - height;
        let label_x = x + bar_width / 2.0;
        svg.push_str(&format!(
            r#"<rect x="{x:.2}" y="{y:.2}" width="{bar_width:.2}" height="{height:.2}" fill="{fill}"/>
<text x="{label_x:.2}" y="{count_y:.2}" text-anchor="middle" font-size="12">{count}</text>
<text x="{label_x:.2}" y="{cat_y:.2}" text-anchor="middle" font-size="12" transform="rotate(30 {label_x:.2} {cat_y:.2})">{label}</text>
"#,
            fill = color(i),
            count_y = y - 6.0,
            count = entry.count,
            cat_y = plot_bottom + 18.0,
            label = escape(&entry.category),
        ));
    }

    svg.push_str("</svg>\n");
    svg
}
