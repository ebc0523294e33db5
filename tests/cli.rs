//! Exit status and file effects of the `feedscan` binary.

use std::path::{Path, PathBuf};
use std::process::Output;

use pretty_assertions::assert_eq;
use tokio::process::Command;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>Feed</title>
    <item><title>Rust 2.0 released</title><link>https://example.com/rust</link></item>
    <item><title>Gardening</title><link>https://example.com/garden</link></item>
</channel></rss>"#;

const PREVIOUS_REPORT: &str = "Old title | unknown date | https://old.example.com | old\n";

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("feedscan_cli_{}", name));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Runs the binary with every file inside `dir`. `feedscan.toml` does not
/// exist there, so built-in defaults apply.
async fn feedscan(dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_feedscan"))
        .arg("--config")
        .arg(dir.join("feedscan.toml"))
        .arg("--sources")
        .arg(dir.join("rss_list.txt"))
        .arg("--keywords")
        .arg(dir.join("keywords.txt"))
        .arg("--output")
        .arg(dir.join("report.txt"))
        .env("RUST_LOG", "info")
        .env("NO_COLOR", "1")
        .output()
        .await
        .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_successful_run_exits_zero_and_writes_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(RSS))
        .mount(&server)
        .await;

    let dir = scratch_dir("success");
    std::fs::write(dir.join("rss_list.txt"), format!("{}/feed.xml\n", server.uri())).unwrap();
    std::fs::write(dir.join("keywords.txt"), "rust\n").unwrap();
    std::fs::write(dir.join("report.txt"), PREVIOUS_REPORT).unwrap();

    let output = feedscan(&dir).await;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0), "{stdout}");
    assert!(stdout.contains("[rust] Rust 2.0 released (unknown date)\nhttps://example.com/rust\n"));
    assert!(stdout.contains("Total run time: "));
    assert_eq!(
        std::fs::read_to_string(dir.join("report.txt")).unwrap(),
        "Rust 2.0 released | unknown date | https://example.com/rust | rust\n"
    );

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_empty_keyword_list_exits_one_and_keeps_report() {
    let dir = scratch_dir("empty_keywords");
    std::fs::write(dir.join("rss_list.txt"), "http://127.0.0.1:1/feed.xml\n").unwrap();
    std::fs::write(dir.join("keywords.txt"), "\n\n").unwrap();
    std::fs::write(dir.join("report.txt"), PREVIOUS_REPORT).unwrap();

    let output = feedscan(&dir).await;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1), "{stdout}");
    assert!(stdout.contains("ERROR"), "{stdout}");
    assert!(stdout.contains("Keyword list is empty"), "{stdout}");
    assert_eq!(
        std::fs::read(dir.join("report.txt")).unwrap(),
        PREVIOUS_REPORT.as_bytes()
    );

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_source_list_exits_one() {
    let dir = scratch_dir("missing_sources");
    std::fs::write(dir.join("keywords.txt"), "rust\n").unwrap();

    let output = feedscan(&dir).await;
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1), "{stdout}");
    assert!(stdout.contains("Cannot load source list"), "{stdout}");
    assert!(!dir.join("report.txt").exists());

    std::fs::remove_dir_all(&dir).ok();
}
