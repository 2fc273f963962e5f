// ABOUTME: Main library entry point for wiki-readscore.
// ABOUTME: Re-exports the public API: Client, ClientBuilder, Outcome, ResultSet, and error types.

//! wiki-readscore ranks the articles of a Wikipedia category by readability.
//!
//! A run lists the category's article members, fetches the first paragraph of
//! each lead section in one batch, scores it with the Flesch reading-ease
//! formula, and sorts from least to most readable. Pages without a scorable
//! paragraph stay in the ranking as unscored entries after all scored ones.
//!
//! # Example
//!
//! ```no_run
//! use wiki_readscore::{formats, Client, ReadscoreError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ReadscoreError> {
//!     let client = Client::builder().build()?;
//!     let outcome = client.score_category("Trees").await?;
//!     println!("{}", formats::render_outcome_text(&outcome));
//!     Ok(())
//! }
//! ```

pub mod category;
pub mod client;
pub mod error;
pub mod extract;
pub mod formats;
pub mod options;
pub mod pipeline;
pub mod result;
pub mod score;
pub mod transport;

pub use crate::category::{CategoryRequest, PageKind, PageReference};
pub use crate::client::Client;
pub use crate::error::{ErrorCode, ReadscoreError};
pub use crate::extract::{ExtractBatch, ExtractionGap};
pub use crate::options::{ClientBuilder, Options};
pub use crate::pipeline::{Outcome, Stage};
pub use crate::result::{Readscore, ResultSet, ScoredPage};
pub use crate::score::{flesch_reading_ease, ScoreError, TextStats};
