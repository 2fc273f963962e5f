// ABOUTME: Text extractor that batches lead-section extract requests for many titles.
// ABOUTME: Merges continuation rounds by page id and isolates the first non-empty paragraph per page.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::Client;
use crate::error::ReadscoreError;
use crate::transport::{continuation, get_json, with_continuation};

/// The MediaWiki API accepts at most 50 titles per request for ordinary clients.
pub const MAX_TITLES_PER_REQUEST: usize = 50;

const OP: &str = "extract_first_paragraphs";

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Why a page ended up without a paragraph to score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionGap {
    /// The API returned no extract for the page, or reported it missing.
    Missing,
    /// The extract was an empty string.
    EmptyExtract,
    /// The extract had no paragraph element with text.
    NoParagraph,
}

/// Result of one extract batch.
#[derive(Debug, Clone, Default)]
pub struct ExtractBatch {
    /// First paragraph per page id, only for pages where one was found.
    pub paragraphs: HashMap<u64, String>,
    /// Pages that returned an extract without a usable paragraph.
    pub gaps: HashMap<u64, ExtractionGap>,
    /// False when any extract request failed or the continuation cap was hit.
    pub complete: bool,
}

impl ExtractBatch {
    /// The paragraph for `page_id`, or the reason there is none.
    pub fn lookup(&self, page_id: u64) -> Result<&str, ExtractionGap> {
        match self.paragraphs.get(&page_id) {
            Some(p) => Ok(p.as_str()),
            None => Err(self
                .gaps
                .get(&page_id)
                .copied()
                .unwrap_or(ExtractionGap::Missing)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    query: ExtractQuery,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    #[serde(default)]
    pages: HashMap<String, RawExtractPage>,
}

#[derive(Debug, Deserialize)]
struct RawExtractPage {
    #[serde(default)]
    pageid: Option<u64>,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    missing: Option<Value>,
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Return the text of the first `<p>` element that has any text.
///
/// Markup is parsed leniently; parse errors are tolerated and never fail the page.
pub fn first_paragraph(html: &str) -> Option<String> {
    let fragment = Html::parse_fragment(html);
    if !fragment.errors.is_empty() {
        debug!(errors = fragment.errors.len(), "tolerated markup errors");
    }
    fragment
        .select(&PARAGRAPH)
        .map(|p| collapse_whitespace(&p.text().collect::<String>()))
        .find(|text| !text.is_empty())
}

fn extract_params(titles: &[String]) -> Vec<(String, String)> {
    vec![
        ("action".to_string(), "query".to_string()),
        ("prop".to_string(), "extracts".to_string()),
        ("exintro".to_string(), "1".to_string()),
        ("exlimit".to_string(), "max".to_string()),
        ("titles".to_string(), titles.join("|")),
    ]
}

/// Merge one response's pages into `raw`, keeping the first non-empty extract per page.
fn merge_pages(value: &Value, raw: &mut HashMap<u64, String>) -> Result<usize, anyhow::Error> {
    let response = ExtractResponse::deserialize(value)?;
    let mut merged = 0;
    for page in response.query.pages.into_values() {
        let (Some(id), None) = (page.pageid, page.missing) else {
            continue;
        };
        let Some(extract) = page.extract else {
            continue;
        };
        let slot = raw.entry(id).or_default();
        if slot.is_empty() && !extract.is_empty() {
            *slot = extract;
            merged += 1;
        }
    }
    Ok(merged)
}

/// Fetch raw extracts for one chunk of titles, following continuation.
///
/// A failure on the first request is returned as an error. A failure on a
/// follow-up request keeps what was merged so far and marks the chunk incomplete.
async fn fetch_chunk(
    client: &Client,
    titles: &[String],
    raw: &mut HashMap<u64, String>,
) -> Result<bool, ReadscoreError> {
    let opts = client.options();
    let mut cont: Vec<(String, String)> = Vec::new();
    let mut rounds = 0usize;

    loop {
        let params = with_continuation(extract_params(titles), &cont);
        let response = get_json(client.http(), &opts.api_endpoint, &params)
            .await
            .map_err(|e| e.in_op(OP))
            .and_then(|value| {
                merge_pages(&value, raw)
                    .map(|merged| (value, merged))
                    .map_err(|e| ReadscoreError::decode(titles.join("|"), OP, Some(e)))
            });

        let value = match response {
            Ok((value, merged)) => {
                debug!(round = rounds, merged, "extract batch round");
                value
            }
            Err(err) if rounds == 0 => return Err(err),
            Err(err) => {
                warn!(error = %err, round = rounds, "extract continuation failed, keeping partial batch");
                return Ok(false);
            }
        };

        match continuation(&value) {
            Some(next) => {
                if rounds >= opts.max_continuations {
                    warn!(rounds, "extract continuation cap reached");
                    return Ok(false);
                }
                rounds += 1;
                cont = next;
            }
            None => return Ok(true),
        }
    }
}

/// Fetch the lead-section extract for every title and keep the first paragraph of each.
///
/// Titles are sent pipe-delimited, at most `MAX_TITLES_PER_REQUEST` per request.
/// Pages without a usable paragraph are left out of `paragraphs`; the reason is
/// recorded in `gaps` when the API returned an extract at all.
///
/// A chunk whose first request fails leaves its pages missing and marks the
/// batch incomplete. The error is returned only when no chunk could be fetched.
pub async fn extract_first_paragraphs(
    client: &Client,
    titles: &[String],
) -> Result<ExtractBatch, ReadscoreError> {
    let mut raw: HashMap<u64, String> = HashMap::new();
    let mut complete = true;
    let mut fetched_chunks = 0usize;
    let mut first_err: Option<ReadscoreError> = None;

    for (index, chunk) in titles.chunks(MAX_TITLES_PER_REQUEST).enumerate() {
        match fetch_chunk(client, chunk, &mut raw).await {
            Ok(chunk_complete) => {
                fetched_chunks += 1;
                complete &= chunk_complete;
            }
            Err(err) => {
                warn!(
                    error = %err,
                    chunk = index,
                    titles = chunk.len(),
                    "extract chunk failed, keeping other chunks"
                );
                complete = false;
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }
    }

    if fetched_chunks == 0 {
        if let Some(err) = first_err {
            return Err(err);
        }
    }

    let mut batch = ExtractBatch {
        complete,
        ..Default::default()
    };
    for (id, extract) in raw {
        if extract.trim().is_empty() {
            batch.gaps.insert(id, ExtractionGap::EmptyExtract);
            continue;
        }
        match first_paragraph(&extract) {
            Some(paragraph) => {
                batch.paragraphs.insert(id, paragraph);
            }
            None => {
                batch.gaps.insert(id, ExtractionGap::NoParagraph);
            }
        }
    }

    info!(
        titles = titles.len(),
        paragraphs = batch.paragraphs.len(),
        gaps = batch.gaps.len(),
        complete = batch.complete,
        "extracts fetched"
    );
    Ok(batch)
}
