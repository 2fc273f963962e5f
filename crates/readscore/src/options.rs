// ABOUTME: Configuration options for the readscore client including endpoint, limits, and timeouts.
// ABOUTME: ClientBuilder provides a fluent API for constructing Client instances with custom settings.

use std::time::Duration;

use crate::client::Client;

/// Default MediaWiki API endpoint.
pub const DEFAULT_API_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

/// Default number of category members requested per run.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Largest `cmlimit` the MediaWiki API accepts for ordinary clients.
pub const MAX_PAGE_LIMIT: u32 = 500;

/// Default cap on follow-up requests made for one paginated batch.
pub const DEFAULT_MAX_CONTINUATIONS: usize = 10;

/// Configuration options for the readscore client.
#[derive(Debug, Clone)]
pub struct Options {
    pub api_endpoint: String,
    pub page_limit: u32,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub user_agent: String,
    pub max_continuations: usize,
    pub http_client: Option<reqwest::Client>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(30),
            user_agent: concat!("wiki-readscore/", env!("CARGO_PKG_VERSION")).to_string(),
            max_continuations: DEFAULT_MAX_CONTINUATIONS,
            http_client: None,
        }
    }
}

/// Builder for constructing Client instances with custom configuration.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    opts: Options,
}

impl ClientBuilder {
    /// Create a new ClientBuilder with default options.
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }

    /// Set the MediaWiki API endpoint.
    pub fn api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.opts.api_endpoint = endpoint.into();
        self
    }

    /// Set how many category members to request. Clamped to `1..=MAX_PAGE_LIMIT`.
    pub fn page_limit(mut self, limit: u32) -> Self {
        self.opts.page_limit = limit.clamp(1, MAX_PAGE_LIMIT);
        self
    }

    /// Set the TCP connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.opts.connect_timeout = timeout;
        self
    }

    /// Set the overall per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.opts.timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.opts.user_agent = user_agent.into();
        self
    }

    /// Set the cap on continuation requests per batch.
    pub fn max_continuations(mut self, max: usize) -> Self {
        self.opts.max_continuations = max;
        self
    }

    /// Use a custom HTTP client. Timeouts and User-Agent then come from that client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.opts.http_client = Some(client);
        self
    }

    /// Build the Client with the configured options.
    pub fn build(self) -> Result<Client, crate::ReadscoreError> {
        Client::new(self.opts)
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
