// ABOUTME: JSON transport for MediaWiki API requests.
// ABOUTME: Builds percent-encoded query URLs, enforces status and size limits, and decodes JSON bodies.

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::ReadscoreError;

/// Maximum accepted response body (10 MB).
pub const MAX_RESPONSE_LENGTH: usize = 10 * 1024 * 1024;

const OP: &str = "get_json";

/// Build the request URL for `endpoint` with `params` percent-encoded into the query.
///
/// `format=json` is always appended; callers pass only the action-specific parameters.
pub fn build_url(endpoint: &str, params: &[(String, String)]) -> Result<Url, ReadscoreError> {
    let pairs = params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .chain(std::iter::once(("format", "json")));
    Url::parse_with_params(endpoint, pairs).map_err(|e| {
        ReadscoreError::fetch(
            endpoint,
            OP,
            Some(anyhow::anyhow!("invalid API endpoint: {}", e)),
        )
    })
}

/// Issue a GET request and decode the body as JSON.
///
/// A MediaWiki `error` envelope in an otherwise successful response is reported
/// as a Fetch error, the same as a non-200 status.
pub async fn get_json(
    client: &reqwest::Client,
    endpoint: &str,
    params: &[(String, String)],
) -> Result<Value, ReadscoreError> {
    let url = build_url(endpoint, params)?;
    let target = url.to_string();
    debug!(url = %target, "api request");

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            ReadscoreError::timeout(&target, OP, Some(anyhow::Error::new(e)))
        } else {
            ReadscoreError::fetch(
                &target,
                OP,
                Some(anyhow::anyhow!("request failed: {}", e)),
            )
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ReadscoreError::fetch(
            &target,
            OP,
            Some(anyhow::anyhow!("HTTP status {}", status.as_u16())),
        ));
    }

    if let Some(len) = response.content_length() {
        if len as usize > MAX_RESPONSE_LENGTH {
            return Err(ReadscoreError::fetch(
                &target,
                OP,
                Some(anyhow::anyhow!("response too large")),
            ));
        }
    }

    let body = response.bytes().await.map_err(|e| {
        if e.is_timeout() {
            ReadscoreError::timeout(&target, OP, Some(anyhow::Error::new(e)))
        } else {
            ReadscoreError::fetch(
                &target,
                OP,
                Some(anyhow::anyhow!("failed to read body: {}", e)),
            )
        }
    })?;

    if body.len() > MAX_RESPONSE_LENGTH {
        return Err(ReadscoreError::fetch(
            &target,
            OP,
            Some(anyhow::anyhow!("response too large")),
        ));
    }

    let value: Value = serde_json::from_slice(&body).map_err(|e| {
        ReadscoreError::decode(&target, OP, Some(anyhow::anyhow!("invalid JSON: {}", e)))
    })?;

    if let Some(api_error) = value.get("error") {
        let code = api_error
            .get("code")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        let info = api_error
            .get("info")
            .and_then(Value::as_str)
            .unwrap_or_default();
        return Err(ReadscoreError::fetch(
            &target,
            OP,
            Some(anyhow::anyhow!("API error {}: {}", code, info)),
        ));
    }

    Ok(value)
}

/// Read the `continue` object of a MediaWiki response as request parameters.
///
/// Returns `None` when the response carries no continuation, meaning the batch is
/// complete. Numeric continuation values (such as `excontinue`) are stringified.
pub fn continuation(value: &Value) -> Option<Vec<(String, String)>> {
    let obj = value.get("continue")?.as_object()?;
    let params: Vec<(String, String)> = obj
        .iter()
        .filter_map(|(k, v)| {
            let v = match v {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return None,
            };
            Some((k.clone(), v))
        })
        .collect();
    if params.is_empty() {
        None
    } else {
        Some(params)
    }
}

/// Append continuation parameters to a request.
///
/// An empty continuation sends `continue=` to opt into the current continuation
/// format on the first request of a batch.
pub fn with_continuation(
    mut params: Vec<(String, String)>,
    cont: &[(String, String)],
) -> Vec<(String, String)> {
    if cont.is_empty() {
        params.push(("continue".to_string(), String::new()));
    } else {
        params.extend(cont.iter().cloned());
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn continuation_reads_string_and_numeric_values() {
        let value = serde_json::json!({
            "continue": {"excontinue": 20, "continue": "||"},
            "query": {}
        });
        let mut params = continuation(&value).expect("continuation present");
        params.sort();
        assert_eq!(
            params,
            vec![
                ("continue".to_string(), "||".to_string()),
                ("excontinue".to_string(), "20".to_string()),
            ]
        );
    }

    #[test]
    fn continuation_absent_when_batch_complete() {
        let value = serde_json::json!({"batchcomplete": "", "query": {}});
        assert!(continuation(&value).is_none());
    }

    #[test]
    fn with_continuation_replaces_initial_marker() {
        let base = params(&[("action", "query")]);
        let first = with_continuation(base.clone(), &[]);
        assert_eq!(first, params(&[("action", "query"), ("continue", "")]));
        let next = with_continuation(base, &params(&[("continue", "||"), ("excontinue", "1")]));
        assert_eq!(
            next,
            params(&[("action", "query"), ("continue", "||"), ("excontinue", "1")])
        );
    }

    #[test]
    fn build_url_percent_encodes_pipes_and_spaces() {
        let url = build_url(
            "https://en.wikipedia.org/w/api.php",
            &params(&[("titles", "Oak|Red maple")]),
        )
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://en.wikipedia.org/w/api.php?titles=Oak%7CRed+maple&format=json"
        );
    }

    #[test]
    fn build_url_rejects_bad_endpoint() {
        let err = build_url("not a url", &[]).expect_err("should fail");
        assert!(err.is_fetch_failure());
    }

    #[tokio::test]
    async fn get_json_decodes_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/w/api.php")
                .query_param("action", "query")
                .query_param("format", "json");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"batchcomplete":""}"#);
        });

        let client = reqwest::Client::new();
        let value = get_json(
            &client,
            &server.url("/w/api.php"),
            &params(&[("action", "query")]),
        )
        .await
        .expect("request should succeed");
        mock.assert();
        assert_eq!(value["batchcomplete"], "");
    }

    #[tokio::test]
    async fn get_json_rejects_non_200() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/w/api.php");
            then.status(503).body("busy");
        });

        let client = reqwest::Client::new();
        let err = get_json(&client, &server.url("/w/api.php"), &[])
            .await
            .expect_err("should fail on 503");
        assert_eq!(err.code, crate::ErrorCode::Fetch);
    }

    #[tokio::test]
    async fn get_json_rejects_non_json() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/w/api.php");
            then.status(200).body("<html>maintenance</html>");
        });

        let client = reqwest::Client::new();
        let err = get_json(&client, &server.url("/w/api.php"), &[])
            .await
            .expect_err("should fail on HTML body");
        assert!(err.is_decode());
    }

    #[tokio::test]
    async fn get_json_surfaces_api_error_envelope() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/w/api.php");
            then.status(200)
                .body(r#"{"error":{"code":"badvalue","info":"Unrecognized value"}}"#);
        });

        let client = reqwest::Client::new();
        let err = get_json(&client, &server.url("/w/api.php"), &[])
            .await
            .expect_err("should fail on API error");
        assert_eq!(err.code, crate::ErrorCode::Fetch);
        assert!(err.to_string().contains("badvalue"));
    }

    #[tokio::test]
    async fn get_json_maps_timeout() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/slow");
            then.status(200)
                .delay(Duration::from_millis(500))
                .body("{}");
        });

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let err = get_json(&client, &server.url("/slow"), &[])
            .await
            .expect_err("should time out");
        assert!(err.is_timeout());
        assert!(err.is_fetch_failure());
    }
}
