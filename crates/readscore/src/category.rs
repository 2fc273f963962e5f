// ABOUTME: Category fetcher that lists the members of a Wikipedia category.
// ABOUTME: Classifies members by kind, follows cmcontinue, and keeps only article pages.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::client::Client;
use crate::error::ReadscoreError;
use crate::transport::{continuation, get_json, with_continuation};

/// Title prefix of the Portal namespace on English Wikipedia.
pub const PORTAL_PREFIX: &str = "Portal:";

/// Namespace id of `Portal:` pages.
pub const PORTAL_NAMESPACE: i64 = 100;

const CATEGORY_PREFIX: &str = "Category:";
const OP: &str = "fetch_members";

/// A validated request for the members of one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRequest {
    category_name: String,
    page_limit: u32,
}

impl CategoryRequest {
    /// Normalize and validate a user-supplied category name.
    ///
    /// Surrounding whitespace and a leading `Category:` prefix (any case) are
    /// removed. An empty remainder is an InvalidCategory error.
    pub fn new(category_name: &str, page_limit: u32) -> Result<Self, ReadscoreError> {
        let trimmed = category_name.trim();
        let name = match trimmed.get(..CATEGORY_PREFIX.len()) {
            Some(head) if head.eq_ignore_ascii_case(CATEGORY_PREFIX) => {
                trimmed[CATEGORY_PREFIX.len()..].trim()
            }
            _ => trimmed,
        };
        if name.is_empty() {
            return Err(ReadscoreError::invalid_category(category_name, OP));
        }
        Ok(Self {
            category_name: name.to_string(),
            page_limit: page_limit.max(1),
        })
    }

    pub fn category_name(&self) -> &str {
        &self.category_name
    }

    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }

    /// The `cmtitle` value, e.g. `Category:Trees`.
    pub fn cmtitle(&self) -> String {
        format!("{}{}", CATEGORY_PREFIX, self.category_name)
    }
}

/// What kind of page a category member is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    Article,
    Redirect,
    Subcategory,
    Portal,
    Other,
}

impl PageKind {
    /// Classify a member from its API `type`, namespace, title and redirect flag.
    pub fn classify(member_type: &str, ns: Option<i64>, title: &str, redirect: bool) -> Self {
        match member_type {
            "subcat" => PageKind::Subcategory,
            "page" if redirect => PageKind::Redirect,
            "page" if ns == Some(PORTAL_NAMESPACE) || title.starts_with(PORTAL_PREFIX) => {
                PageKind::Portal
            }
            "page" => PageKind::Article,
            _ => PageKind::Other,
        }
    }
}

/// One member of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageReference {
    pub page_id: u64,
    pub title: String,
    pub kind: PageKind,
}

impl PageReference {
    /// True if this member survives filtering: an article outside the Portal namespace.
    pub fn is_article(&self) -> bool {
        self.kind == PageKind::Article && !self.title.starts_with(PORTAL_PREFIX)
    }
}

#[derive(Debug, Deserialize)]
struct MembersResponse {
    query: MembersQuery,
}

#[derive(Debug, Deserialize)]
struct MembersQuery {
    categorymembers: Vec<RawMember>,
}

#[derive(Debug, Deserialize)]
struct RawMember {
    pageid: u64,
    #[serde(default)]
    ns: Option<i64>,
    title: String,
    #[serde(rename = "type", default)]
    member_type: String,
    #[serde(default)]
    redirect: Option<Value>,
}

impl From<RawMember> for PageReference {
    fn from(raw: RawMember) -> Self {
        let kind = PageKind::classify(&raw.member_type, raw.ns, &raw.title, raw.redirect.is_some());
        PageReference {
            page_id: raw.pageid,
            title: raw.title,
            kind,
        }
    }
}

/// Parse one `list=categorymembers` response into page references.
pub fn parse_members(value: &Value) -> Result<Vec<PageReference>, anyhow::Error> {
    let response = MembersResponse::deserialize(value)?;
    Ok(response
        .query
        .categorymembers
        .into_iter()
        .map(PageReference::from)
        .collect())
}

/// Keep only article members. Applying it twice changes nothing.
pub fn filter_members(members: Vec<PageReference>) -> Vec<PageReference> {
    members.into_iter().filter(PageReference::is_article).collect()
}

fn member_params(request: &CategoryRequest, limit: usize) -> Vec<(String, String)> {
    vec![
        ("action".to_string(), "query".to_string()),
        ("list".to_string(), "categorymembers".to_string()),
        ("cmtitle".to_string(), request.cmtitle()),
        ("cmprop".to_string(), "ids|title|type".to_string()),
        ("cmlimit".to_string(), limit.to_string()),
    ]
}

/// Fetch up to `page_limit` members of the category and keep the articles.
///
/// Continuation is followed while fewer than `page_limit` members have arrived,
/// at most `max_continuations` times. Members repeated across pages are kept once.
/// Zero surviving articles is reported as an EmptyCategory error.
pub async fn fetch_members(
    client: &Client,
    request: &CategoryRequest,
) -> Result<Vec<PageReference>, ReadscoreError> {
    let opts = client.options();
    let limit = request.page_limit() as usize;
    let mut members: Vec<PageReference> = Vec::new();
    let mut seen: HashSet<u64> = HashSet::new();
    let mut cont: Vec<(String, String)> = Vec::new();
    let mut rounds = 0usize;

    loop {
        let params = with_continuation(member_params(request, limit - members.len()), &cont);

        let value = get_json(client.http(), &opts.api_endpoint, &params)
            .await
            .map_err(|e| e.in_op(OP))?;
        let page = parse_members(&value)
            .map_err(|e| ReadscoreError::decode(request.category_name(), OP, Some(e)))?;
        debug!(round = rounds, received = page.len(), "category members page");

        for member in page {
            if members.len() >= limit {
                break;
            }
            if seen.insert(member.page_id) {
                members.push(member);
            }
        }

        match continuation(&value) {
            Some(next) if members.len() < limit => {
                if rounds >= opts.max_continuations {
                    warn!(
                        category = request.category_name(),
                        rounds, "category continuation cap reached"
                    );
                    break;
                }
                rounds += 1;
                cont = next;
            }
            _ => break,
        }
    }

    let total = members.len();
    let articles = filter_members(members);
    info!(
        category = request.category_name(),
        members = total,
        articles = articles.len(),
        "category fetched"
    );

    if articles.is_empty() {
        return Err(ReadscoreError::empty_category(request.category_name(), OP));
    }
    Ok(articles)
}
