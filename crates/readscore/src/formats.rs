// ABOUTME: Output formats for a ranked category: HTML table, plain text, and JSON.
// ABOUTME: Unscored pages are rendered with a placeholder instead of being dropped.

//! Output formatting for pipeline results.
//!
//! The HTML table links each title to its article by page id. All formats list
//! pages in ranking order and show unscored pages with [`UNSCORED_PLACEHOLDER`].

use crate::pipeline::Outcome;
use crate::result::{Readscore, ResultSet};

/// Text shown in place of a score for pages that could not be scored.
pub const UNSCORED_PLACEHOLDER: &str = "n/a";

/// Message for a category with no articles.
pub const NO_RESULTS_MESSAGE: &str = "No results found.";

/// Base URL for linking to an article by page id.
pub const ARTICLE_BY_ID_URL: &str = "https://en.wikipedia.org/?curid=";

/// Format a readscore with one decimal, or the placeholder.
pub fn format_readscore(score: Readscore) -> String {
    match score {
        Readscore::Scored(v) => format!("{:.1}", v),
        Readscore::Unscored => UNSCORED_PLACEHOLDER.to_string(),
    }
}

/// Render the ranking as an HTML table wrapped in `<div class="wrapper">`.
///
/// Titles are escaped with `ammonia::clean_text`, which also encodes spaces.
pub fn render_html_table(set: &ResultSet) -> String {
    let mut out = Vec::with_capacity(set.len() + 2);
    out.push(
        "<table><thead><tr><th>Title</th><th class=\"int\">Readability score</th></tr></thead><tbody>"
            .to_string(),
    );
    for (title, score, page_id) in set.triples() {
        out.push(format!(
            "<tr><td><a title=\"View article on Wikipedia\" href=\"{}{}\">{}</a></td><td class=\"int\">{}</td></tr>",
            ARTICLE_BY_ID_URL,
            page_id,
            ammonia::clean_text(title),
            format_readscore(score)
        ));
    }
    out.push("</tbody></table>".to_string());
    format!("<div class=\"wrapper\">{}</div>", out.concat())
}

/// Render the ranking as aligned plain-text lines: score, then title.
pub fn render_text(set: &ResultSet) -> String {
    set.triples()
        .map(|(title, score, _)| format!("{:>7}  {}", format_readscore(score), title))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render an outcome as HTML, using the no-results message for empty categories.
pub fn render_outcome_html(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Ranked(set) => render_html_table(set),
        Outcome::NoArticles { .. } => format!("<p>{}</p>", NO_RESULTS_MESSAGE),
    }
}

/// Render an outcome as plain text, using the no-results message for empty categories.
pub fn render_outcome_text(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Ranked(set) => render_text(set),
        Outcome::NoArticles { .. } => NO_RESULTS_MESSAGE.to_string(),
    }
}

/// Render an outcome as JSON. Empty categories produce `"pages": []` with `"found": false`.
///
/// `"complete": false` marks a ranking built from a partial extract batch.
pub fn render_outcome_json(outcome: &Outcome, compact: bool) -> Result<String, serde_json::Error> {
    let value = match outcome {
        Outcome::Ranked(set) => serde_json::json!({
            "category": set.category,
            "found": true,
            "scored": set.scored_count(),
            "complete": set.complete,
            "pages": set.pages,
        }),
        Outcome::NoArticles { category } => serde_json::json!({
            "category": category,
            "found": false,
            "scored": 0,
            "complete": true,
            "pages": [],
        }),
    };
    if compact {
        serde_json::to_string(&value)
    } else {
        serde_json::to_string_pretty(&value)
    }
}
