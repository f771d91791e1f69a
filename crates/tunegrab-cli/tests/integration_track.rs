//! Batch tracking through the library and the installed binary.

use std::io::Write;
use std::process::Command;

use serde_json::Value;
use tempfile::NamedTempFile;
use tunegrab_cli::{CollectionArgs, NdjsonEmitter, handlers};
use tunegrab_core::Settings;

fn capture(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file
}

fn parse_output(text: &str) -> Vec<Value> {
    text.lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn unthrottled() -> Settings {
    Settings {
        throttle_ms: Some(0),
        ..Settings::with_defaults()
    }
}

#[tokio::test]
async fn test_each_input_is_a_fresh_session() {
    let album = capture(&[
        r#"{"event": "collection", "total": 2, "name": "Album"}"#,
        r#"{"status": "finished", "filename": "one.webm"}"#,
    ]);
    let single = capture(&[
        r#"{"status": "downloading", "downloaded_bytes": 30, "total_bytes": 100, "filename": "x.webm"}"#,
        r#"{"status": "finished", "filename": "x.webm"}"#,
    ]);

    let transport = NdjsonEmitter::new(Vec::new());
    let inputs = vec![album.path().to_path_buf(), single.path().to_path_buf()];
    let summary = handlers::track::execute(
        &inputs,
        &CollectionArgs::default(),
        &unthrottled(),
        &transport,
    )
    .await
    .unwrap();

    let text = transport
        .with_writer(|buf| String::from_utf8(buf.clone()).unwrap())
        .unwrap();
    let lines = parse_output(&text);

    // album: one progress line, then a synthesized failure
    assert_eq!(lines[0]["data"]["collection_percent"], 50.0);
    assert_eq!(lines[1]["type"], "result");
    assert_eq!(lines[1]["data"]["success"], false);

    // single file: no collection fields leak across sessions
    assert_eq!(lines[2]["data"]["is_collection"], false);
    assert_eq!(lines[2]["data"]["percentage"], 30.0);
    assert_eq!(lines[3]["data"]["status"], "finished");
    assert_eq!(lines[4]["data"]["success"], true);

    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed, 1);
}

#[test]
fn test_binary_writes_ndjson_to_stdout() {
    let input = capture(&[
        "[youtube] abc: Downloading webpage",
        r#"{"status": "downloading", "downloaded_bytes": 50, "total_bytes": 100}"#,
        r#"{"status": "finished"}"#,
        r#"{"event": "result", "success": true, "message": "Saved"}"#,
    ]);

    let output = Command::new(env!("CARGO_BIN_EXE_tunegrab"))
        .args(["--throttle-ms", "0", "track"])
        .arg(input.path())
        .env_remove("RUST_LOG")
        .output()
        .unwrap();

    assert!(output.status.success());
    let lines = parse_output(&String::from_utf8(output.stdout).unwrap());
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["type"], "progress");
    assert_eq!(lines[0]["data"]["percent_str"], "50.0%");
    assert_eq!(lines[2]["data"]["message"], "Saved");
}

#[test]
fn test_binary_exit_codes() {
    let failed = capture(&[r#"{"event": "result", "success": false, "error": "HTTP 403"}"#]);
    let status = Command::new(env!("CARGO_BIN_EXE_tunegrab"))
        .arg("track")
        .arg(failed.path())
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(1));

    let status = Command::new(env!("CARGO_BIN_EXE_tunegrab"))
        .args(["track", "/nonexistent/capture.ndjson"])
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(74));

    let status = Command::new(env!("CARGO_BIN_EXE_tunegrab"))
        .args(["--throttle-ms", "99999", "track"])
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(78));
}
