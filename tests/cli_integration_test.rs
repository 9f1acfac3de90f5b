//! End-to-end checks of the docdex binary.

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/mbench_index.js");

fn docdex(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_docdex"))
        .current_dir(dir)
        .args(args)
        .output()
        .expect("failed to run docdex")
}

#[test]
fn test_validate_fixture_succeeds() {
    let temp = TempDir::new().unwrap();
    let output = docdex(temp.path(), &["validate", FIXTURE]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Checked 5 packages, 42 entries: 0 errors, 0 warnings"));
}

#[test]
fn test_validate_broken_index_exits_5() {
    let temp = TempDir::new().unwrap();
    let broken = temp.path().join("broken.js");
    std::fs::write(
        &broken,
        r#"Index.PACKAGES = {"mbench" : [{"object" : "elsewhere/Host$.html", "name" : "mbench.Host"}]};"#,
    )
    .unwrap();

    let output = docdex(temp.path(), &["validate", broken.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(5));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("PATH_PREFIX"));
}

#[test]
fn test_validate_missing_file_exits_1() {
    let temp = TempDir::new().unwrap();
    let output = docdex(temp.path(), &["validate", "no-such-index.js"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_validate_garbage_exits_4() {
    let temp = TempDir::new().unwrap();
    let garbage = temp.path().join("garbage.js");
    std::fs::write(&garbage, "window.title = 'docs';").unwrap();

    let output = docdex(temp.path(), &["validate", garbage.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_lookup_symbol_json_envelope() {
    let temp = TempDir::new().unwrap();
    let output = docdex(
        temp.path(),
        &["lookup", "symbol", "mbench.gnuplot.DatFile", FIXTURE, "--json"],
    );

    assert!(output.status.success());
    let envelope: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is an envelope");
    assert_eq!(envelope["type"], "result");
    assert_eq!(envelope["status"], "success");
    assert_eq!(envelope["exit_code"], 0);
    assert_eq!(envelope["data"]["package"], "mbench.gnuplot");
    assert_eq!(envelope["data"]["entry"]["name"], "mbench.gnuplot.DatFile");
    assert_eq!(
        envelope["data"]["entry"]["object"],
        "mbench/gnuplot/DatFile$.html"
    );
}

#[test]
fn test_lookup_missing_symbol_exits_3() {
    let temp = TempDir::new().unwrap();
    let output = docdex(temp.path(), &["lookup", "symbol", "Nonexistent", FIXTURE, "--json"]);

    assert_eq!(output.status.code(), Some(3));
    let envelope: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(envelope["status"], "not_found");
    assert_eq!(envelope["code"], "NOT_FOUND");
}

#[test]
fn test_search_and_packages_text_output() {
    let temp = TempDir::new().unwrap();

    let output = docdex(temp.path(), &["search", "datfile", FIXTURE]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("mbench.gnuplot.DatFile (in mbench.gnuplot)"));
    assert!(stdout.contains("mbench.gnuplot.DatFileReporter"));

    let output = docdex(temp.path(), &["packages", FIXTURE]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("mbench.gnuplot"));
    assert!(stdout.contains("5 packages, 42 entries"));
}

#[test]
fn test_convert_round_trips_through_json() {
    let temp = TempDir::new().unwrap();
    let as_json = temp.path().join("index.json");
    let back_to_js = temp.path().join("index.js");

    let output = docdex(
        temp.path(),
        &["convert", FIXTURE, "-o", as_json.to_str().unwrap()],
    );
    assert!(output.status.success());

    let output = docdex(
        temp.path(),
        &[
            "convert",
            as_json.to_str().unwrap(),
            "--to",
            "js",
            "-o",
            back_to_js.to_str().unwrap(),
        ],
    );
    assert!(output.status.success());

    let original = std::fs::read_to_string(FIXTURE).unwrap();
    let round_tripped = std::fs::read_to_string(&back_to_js).unwrap();
    assert_eq!(round_tripped, original.trim_end());
}

#[test]
fn test_init_creates_settings() {
    let temp = TempDir::new().unwrap();

    let output = docdex(temp.path(), &["init"]);
    assert!(output.status.success());
    let config = temp.path().join(".docdex/settings.toml");
    assert!(config.exists());
    let content = std::fs::read_to_string(&config).unwrap();
    assert!(content.contains("version = 1"));
    assert!(content.contains("index_file"));

    // A second init without --force refuses to clobber
    let output = docdex(temp.path(), &["init"]);
    assert_eq!(output.status.code(), Some(1));

    let output = docdex(temp.path(), &["init", "--force"]);
    assert!(output.status.success());
}
