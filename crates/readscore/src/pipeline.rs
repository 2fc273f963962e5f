// ABOUTME: Score-and-sort pipeline: fetch members, extract paragraphs, score, and rank.
// ABOUTME: Only the fetch stage can fail a run; per-page gaps become unscored entries.

use std::fmt;

use tracing::{debug, info, warn};

use crate::category::{fetch_members, CategoryRequest, PageReference};
use crate::client::Client;
use crate::error::ReadscoreError;
use crate::extract::{extract_first_paragraphs, ExtractBatch};
use crate::result::{Readscore, ResultSet, ScoredPage};
use crate::score::flesch_reading_ease;

/// Pipeline stages in the order a run passes through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Extracting,
    Scoring,
    Sorting,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Fetching => "fetching",
            Stage::Extracting => "extracting",
            Stage::Scoring => "scoring",
            Stage::Sorting => "sorting",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// A successful run: either a ranking or an explicit "no articles" answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// At least one article survived filtering. Never empty.
    Ranked(ResultSet),
    /// The category exists but lists no articles.
    NoArticles { category: String },
}

impl Outcome {
    pub fn result_set(&self) -> Option<&ResultSet> {
        match self {
            Outcome::Ranked(set) => Some(set),
            Outcome::NoArticles { .. } => None,
        }
    }

    pub fn is_no_articles(&self) -> bool {
        matches!(self, Outcome::NoArticles { .. })
    }
}

fn enter(stage: &mut Stage, next: Stage) {
    debug!(from = %stage, to = %next, "pipeline stage");
    *stage = next;
}

/// Score each page from its extracted paragraph, keeping the page order.
///
/// Pages with no paragraph, or a paragraph the scorer rejects, are unscored.
pub fn score_pages(pages: &[PageReference], batch: &ExtractBatch) -> Vec<ScoredPage> {
    pages
        .iter()
        .map(|page| {
            let readscore = match batch.lookup(page.page_id) {
                Ok(text) => match flesch_reading_ease(text) {
                    Ok(score) => Readscore::Scored(score),
                    Err(e) => {
                        debug!(page_id = page.page_id, error = %e, "page unscored");
                        Readscore::Unscored
                    }
                },
                Err(gap) => {
                    debug!(page_id = page.page_id, gap = ?gap, "page unscored");
                    Readscore::Unscored
                }
            };
            ScoredPage {
                page_id: page.page_id,
                title: page.title.clone(),
                readscore,
            }
        })
        .collect()
}

/// Run the whole pipeline for one category.
///
/// An empty category is a successful `Outcome::NoArticles`. A fetch failure is
/// returned as an error with `op` set to the failing stage and no partial result.
/// Losing the extract batch leaves every page unscored instead of failing the run.
pub async fn run(client: &Client, category_name: &str) -> Result<Outcome, ReadscoreError> {
    let mut stage = Stage::Fetching;
    let request = CategoryRequest::new(category_name, client.options().page_limit)
        .map_err(|e| e.in_op(stage.to_string()))?;
    info!(category = request.category_name(), "scoring category");

    let pages = match fetch_members(client, &request).await {
        Ok(pages) => pages,
        Err(e) if e.is_empty_category() => {
            enter(&mut stage, Stage::Done);
            info!(category = request.category_name(), "no articles found");
            return Ok(Outcome::NoArticles {
                category: request.category_name().to_string(),
            });
        }
        Err(e) => {
            let e = e.in_op(stage.to_string());
            enter(&mut stage, Stage::Failed);
            warn!(error = %e, "category fetch failed");
            return Err(e);
        }
    };

    enter(&mut stage, Stage::Extracting);
    let titles: Vec<String> = pages.iter().map(|p| p.title.clone()).collect();
    let batch = extract_first_paragraphs(client, &titles)
        .await
        .unwrap_or_else(|e| {
            warn!(error = %e, "extract batch failed, pages left unscored");
            ExtractBatch::default()
        });

    enter(&mut stage, Stage::Scoring);
    let scored = score_pages(&pages, &batch);

    enter(&mut stage, Stage::Sorting);
    let set =
        ResultSet::from_unsorted(request.category_name(), scored).with_complete(batch.complete);

    enter(&mut stage, Stage::Done);
    info!(
        category = request.category_name(),
        pages = set.len(),
        scored = set.scored_count(),
        complete = set.complete,
        "category ranked"
    );
    Ok(Outcome::Ranked(set))
}
