// ABOUTME: The main Client struct that owns the HTTP client and configuration.
// ABOUTME: Exposes the full score-a-category pipeline and its individual stages.

use crate::category::{self, CategoryRequest, PageReference};
use crate::error::ReadscoreError;
use crate::extract::{self, ExtractBatch};
use crate::options::{ClientBuilder, Options};
use crate::pipeline::{self, Outcome};

/// Client for scoring Wikipedia categories by readability.
///
/// Holds no per-run state; one client can serve any number of independent runs.
#[derive(Debug, Clone)]
pub struct Client {
    opts: Options,
    http_client: reqwest::Client,
}

impl Client {
    /// Create a new ClientBuilder for configuring the client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a new Client with the given options.
    pub fn new(opts: Options) -> Result<Self, ReadscoreError> {
        let http_client = match opts.http_client.clone() {
            Some(client) => client,
            None => reqwest::Client::builder()
                .user_agent(&opts.user_agent)
                .connect_timeout(opts.connect_timeout)
                .timeout(opts.timeout)
                .gzip(true)
                .brotli(true)
                .deflate(true)
                .build()
                .map_err(|e| {
                    ReadscoreError::fetch(
                        &opts.api_endpoint,
                        "build_client",
                        Some(anyhow::Error::new(e)),
                    )
                })?,
        };

        Ok(Self { opts, http_client })
    }

    pub fn options(&self) -> &Options {
        &self.opts
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http_client
    }

    /// Score every article in a category and rank them from least to most readable.
    pub async fn score_category(&self, category_name: &str) -> Result<Outcome, ReadscoreError> {
        pipeline::run(self, category_name).await
    }

    /// List the article members of a category, using the configured page limit.
    pub async fn fetch_members(
        &self,
        category_name: &str,
    ) -> Result<Vec<PageReference>, ReadscoreError> {
        let request = CategoryRequest::new(category_name, self.opts.page_limit)?;
        category::fetch_members(self, &request).await
    }

    /// Fetch the first paragraph of each title's lead section in one batch.
    pub async fn extract_first_paragraphs(
        &self,
        titles: &[String],
    ) -> Result<ExtractBatch, ReadscoreError> {
        extract::extract_first_paragraphs(self, titles).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn client_sends_user_agent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/w/api.php")
                .header("user-agent", "readscore-test/1.0");
            then.status(200).json_body(json!({
                "query": {"categorymembers": [
                    {"pageid": 1, "ns": 0, "title": "Oak", "type": "page"}
                ]}
            }));
        });

        let client = Client::builder()
            .api_endpoint(server.url("/w/api.php"))
            .user_agent("readscore-test/1.0")
            .build()
            .unwrap();
        let members = client.fetch_members("Trees").await.unwrap();
        mock.assert();
        assert_eq!(members.len(), 1);
    }

    #[tokio::test]
    async fn fetch_members_rejects_blank_name_without_request() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET);
            then.status(200);
        });

        let client = Client::builder()
            .api_endpoint(server.url("/w/api.php"))
            .build()
            .unwrap();
        let err = client.fetch_members("  ").await.expect_err("blank name");
        assert!(err.is_invalid_category());
        mock.assert_hits(0);
    }

    #[test]
    fn injected_http_client_is_used() {
        let http = reqwest::Client::builder()
            .user_agent("custom")
            .build()
            .unwrap();
        let client = Client::builder().http_client(http).build().unwrap();
        assert!(client.options().http_client.is_some());
    }
}
