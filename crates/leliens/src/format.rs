// Markdown Report
//
// *Le Format* (The Format) - Human-readable rendering of the link report

use crate::report::{PageReport, Report};
use crate::shortfall::Shortfall;

/// Recommendations listed per page in the Markdown report.
pub const MARKDOWN_TOP: usize = 5;

/// Render `report` as a human-readable Markdown document.
pub fn render_markdown(report: &Report, shortfalls: &[Shortfall]) -> String {
    let summary = &report.summary;
    let mut out = String::from("# Internal Link Report\n\n");
    out.push_str(&format!("Generated: {}\n\n", report.run_at));

    out.push_str("## Summary\n\n");
    out.push_str(&format!("- Pages: {}\n", summary.pages));
    out.push_str(&format!("- Orphans: {}\n", summary.orphans));
    out.push_str(&format!("- Weak pages: {}\n", summary.weak_pages.len()));
    out.push_str(&format!(
        "- Over-linked pages: {}\n\n",
        summary.overlinked_pages.len()
    ));

    if !summary.opportunities_by_pillar.is_empty() {
        out.push_str("## Opportunities by pillar\n\n");
        for (pillar, urls) in &summary.opportunities_by_pillar {
            let listed = if urls.is_empty() {
                "none".to_string()
            } else {
                urls.join(", ")
            };
            out.push_str(&format!("- **{pillar}**: {listed}\n"));
        }
        out.push('\n');
    }

    out.push_str("## Pages\n\n");
    for page in &report.pages {
        out.push_str(&render_page(page));
    }

    out.push_str("## Shortfalls\n\n");
    if shortfalls.is_empty() {
        out.push_str("None.\n\n");
    } else {
        for s in shortfalls {
            out.push_str(&format!(
                "- {}: {} {} (minimum {})\n",
                s.url, s.found, s.kind, s.expected
            ));
        }
        out.push('\n');
    }

    out.push_str("## Orphan pages\n\n");
    if summary.orphan_pages.is_empty() {
        out.push_str("None.\n");
    } else {
        for url in &summary.orphan_pages {
            out.push_str(&format!("- {url}\n"));
        }
    }

    out
}

fn render_page(page: &PageReport) -> String {
    let mut out = format!(
        "### {} ({}, {})\n\n",
        page.url,
        page.page_type,
        page.locale.as_str()
    );
    if page.recommendations.is_empty() {
        out.push_str("_No recommendations._\n\n");
        return out;
    }

    for rec in page.recommendations.iter().take(MARKDOWN_TOP) {
        out.push_str(&format!(
            "- [{}]({}) `{}` {:.3} ({})\n",
            rec.label, rec.url, rec.type_badge, rec.score, rec.reason
        ));
    }
    if page.recommendations.len() > MARKDOWN_TOP {
        out.push_str(&format!(
            "- ... {} more\n",
            page.recommendations.len() - MARKDOWN_TOP
        ));
    }
    out.push('\n');
    out
}
