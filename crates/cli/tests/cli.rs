// ABOUTME: Integration tests for the readscore CLI binary.
// ABOUTME: Runs the binary against a mocked MediaWiki API and checks output formats and exit codes.

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::CommandCargoExt;
use httpmock::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

const MEMBERS: &str = r#"{"batchcomplete":"","query":{"categorymembers":[
    {"pageid":10,"ns":0,"title":"Oak","type":"page"},
    {"pageid":20,"ns":0,"title":"Maple","type":"page"},
    {"pageid":30,"ns":0,"title":"Birch","type":"page"},
    {"pageid":40,"ns":14,"title":"Category:Trees by region","type":"subcat"}
]}}"#;

const EXTRACTS: &str = r#"{"batchcomplete":"","query":{"pages":{
    "10":{"pageid":10,"title":"Oak","extract":"<p>The oak is a tree. It has nuts.</p>"},
    "20":{"pageid":20,"title":"Maple","extract":"<p>Maples are predominantly deciduous angiosperms with characteristically palmate foliage.</p>"},
    "30":{"pageid":30,"title":"Birch","extract":""}
}}}"#;

fn readscore_cmd() -> Command {
    Command::cargo_bin("readscore").unwrap()
}

fn mock_api(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET)
            .path("/w/api.php")
            .query_param("list", "categorymembers");
        then.status(200)
            .header("content-type", "application/json")
            .body(MEMBERS);
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/w/api.php")
            .query_param("prop", "extracts");
        then.status(200)
            .header("content-type", "application/json")
            .body(EXTRACTS);
    });
}

#[test]
fn text_output_ranks_least_readable_first() {
    let server = MockServer::start();
    mock_api(&server);

    let output = readscore_cmd()
        .arg("--endpoint")
        .arg(server.url("/w/api.php"))
        .arg("Trees")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 3, "unexpected output: {}", stdout);
    assert!(lines[0].ends_with("Maple"));
    assert!(lines[1].ends_with("Oak"));
    assert!(lines[2].ends_with("Birch"));
    assert!(lines[2].contains("n/a"));
}

#[test]
fn json_output_has_null_for_unscored() {
    let server = MockServer::start();
    mock_api(&server);

    let output = readscore_cmd()
        .arg("--endpoint")
        .arg(server.url("/w/api.php"))
        .arg("--json")
        .arg("--compact")
        .arg("Category:Trees")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["category"], "Trees");
    assert_eq!(json["found"], true);
    assert_eq!(json["scored"], 2);
    let ids: Vec<u64> = json["pages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["page_id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![20, 10, 30]);
    assert!(json["pages"][2]["readscore"].is_null());
}

#[test]
fn html_output_to_file() {
    let server = MockServer::start();
    mock_api(&server);
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("results.html");

    readscore_cmd()
        .arg("--endpoint")
        .arg(server.url("/w/api.php"))
        .arg("--format")
        .arg("html")
        .arg("-o")
        .arg(&output_path)
        .arg("Trees")
        .assert()
        .success();

    let html = fs::read_to_string(&output_path).unwrap();
    assert!(html.starts_with("<div class=\"wrapper\"><table>"));
    assert!(html.contains("href=\"https://en.wikipedia.org/?curid=20\""));
    assert!(html.contains("<td class=\"int\">n/a</td>"));
}

#[test]
fn empty_category_prints_no_results() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).query_param("list", "categorymembers");
        then.status(200)
            .body(r#"{"batchcomplete":"","query":{"categorymembers":[]}}"#);
    });

    readscore_cmd()
        .arg("--endpoint")
        .arg(server.url("/w/api.php"))
        .arg("Nothing here")
        .assert()
        .success()
        .stdout(predicate::str::contains("No results found."));
}

#[test]
fn fetch_failure_exits_nonzero() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET);
        then.status(500);
    });

    readscore_cmd()
        .arg("--endpoint")
        .arg(server.url("/w/api.php"))
        .arg("Trees")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("could not score category"))
        .stderr(predicate::str::contains("fetch error"));
}

#[test]
fn timing_flag_prints_elapsed() {
    let server = MockServer::start();
    mock_api(&server);

    readscore_cmd()
        .arg("--endpoint")
        .arg(server.url("/w/api.php"))
        .arg("--timing")
        .arg("Trees")
        .assert()
        .success()
        .stderr(predicate::str::contains("elapsed:"))
        .stderr(predicate::str::contains("ms"));
}

#[test]
fn rust_log_sets_the_log_level() {
    let server = MockServer::start();
    mock_api(&server);

    readscore_cmd()
        .env("RUST_LOG", "info")
        .arg("--endpoint")
        .arg(server.url("/w/api.php"))
        .arg("Trees")
        .assert()
        .success()
        .stderr(predicate::str::contains("scoring category"));
}

#[test]
fn default_log_level_is_quiet() {
    let server = MockServer::start();
    mock_api(&server);

    readscore_cmd()
        .env_remove("RUST_LOG")
        .arg("--endpoint")
        .arg(server.url("/w/api.php"))
        .arg("Trees")
        .assert()
        .success()
        .stderr(predicate::str::contains("scoring category").not());
}

#[test]
fn missing_category_fails() {
    readscore_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("<CATEGORY>"));
}
