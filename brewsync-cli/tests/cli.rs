use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;
use std::process::Command;
use std::thread;

use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use predicates::BoxPredicate;

const SCRIPT: &[u8] = b"#!/usr/bin/env python3\nprint('ollama blobs')\n";

const FORMULA: &str = "\
class OllamaCli < Formula
  desc \"Inspect Ollama blobs and model mappings\"
  url \"https://raw.githubusercontent.com/octo/ollama-cli/main/ollama-cli.py\"
  sha256 \"abc123\"
end
";

const HELLO_WORLD_SHA: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

/// `brewsync` running in `dir` with the config environment scrubbed.
fn brewsync(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("brewsync"));
    cmd.current_dir(dir)
        .env_remove("GITHUB_USER")
        .env_remove("TOOL_REPO")
        .env_remove("TOOL_SCRIPT")
        .env_remove("FORMULA_FILE")
        .env_remove("RUST_LOG");
    cmd
}

/// Serve one canned response on an ephemeral port; returns the base URL.
fn serve_once(status_line: &'static str, body: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut reader = BufReader::new(stream.try_clone().expect("clone"));
        let mut line = String::new();
        loop {
            line.clear();
            match reader.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) if line == "\r\n" => break,
                Ok(_) => {}
            }
        }
        let head = format!(
            "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        let _ = stream.write_all(head.as_bytes());
        let _ = stream.write_all(body);
    });
    format!("http://{addr}")
}

fn project(base_url: &str) -> assert_fs::TempDir {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child("brewsync.yaml")
        .write_str(&format!(
            "github_user: octo\nraw_base_url: {base_url}\n"
        ))
        .expect("config");
    dir.child("Formula").create_dir_all().expect("mkdir");
    dir.child("Formula/ollama-cli.rb")
        .write_str(FORMULA)
        .expect("formula");
    dir
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

#[test]
fn config_prints_four_values_and_url() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    brewsync(dir.path())
        .args(["config"])
        .env("GITHUB_USER", "octo")
        .assert()
        .success()
        .stdout(contains_all(&[
            "GITHUB_USER  = octo",
            "TOOL_REPO    = ollama-cli",
            "TOOL_SCRIPT  = ollama-cli.py",
            "FORMULA_FILE = Formula/ollama-cli.rb",
            "https://raw.githubusercontent.com/octo/ollama-cli/main/ollama-cli.py",
        ]));
}

fn contains_all(needles: &[&str]) -> BoxPredicate<str> {
    let mut iter = needles.iter();
    let first = predicate::str::contains(*iter.next().expect("needle")).boxed();
    iter.fold(first, |acc, n| acc.and(predicate::str::contains(*n)).boxed())
}

#[test]
fn config_json_applies_file_then_flag_precedence() {
    let dir = project("https://raw.githubusercontent.com");
    let output = brewsync(dir.path())
        .args(["config", "--json", "--tool-repo", "tools"])
        .env("TOOL_REPO", "from-env")
        .output()
        .expect("run");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(json["github_user"], "octo");
    assert_eq!(json["tool_repo"], "tools");
    assert_eq!(
        json["tool_url"],
        "https://raw.githubusercontent.com/octo/tools/main/ollama-cli.py"
    );
}

#[test]
fn malformed_config_fails_with_path() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child("brewsync.yaml")
        .write_str("- not a mapping\n")
        .expect("write");
    brewsync(dir.path())
        .arg("config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("brewsync.yaml"));
}

// ---------------------------------------------------------------------------
// sha-local / sha-remote
// ---------------------------------------------------------------------------

#[test]
fn sha_local_prints_digest() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child("ollama-cli.py").write_str("hello world").expect("write");
    brewsync(dir.path())
        .arg("sha-local")
        .assert()
        .success()
        .stdout(format!("{HELLO_WORLD_SHA}\n"));
}

#[test]
fn sha_local_missing_script_fails_and_touches_nothing() {
    let dir = project("http://127.0.0.1:9");
    brewsync(dir.path())
        .arg("sha-local")
        .assert()
        .failure()
        .stderr(predicate::str::contains("file not found"));

    dir.child("Formula/ollama-cli.rb").assert(FORMULA);
    dir.child("ollama-cli.py").assert(predicate::path::missing());
}

#[test]
fn sha_remote_matches_sha_local_for_same_bytes() {
    let base = serve_once("HTTP/1.1 200 OK", SCRIPT);
    let dir = project(&base);
    dir.child("ollama-cli.py").write_binary(SCRIPT).expect("write");

    let remote = brewsync(dir.path()).arg("sha-remote").output().expect("remote");
    let local = brewsync(dir.path()).arg("sha-local").output().expect("local");
    assert!(remote.status.success(), "{}", String::from_utf8_lossy(&remote.stderr));
    assert!(local.status.success());
    assert_eq!(remote.stdout, local.stdout);
}

#[test]
fn sha_remote_without_github_user_fails() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    brewsync(dir.path())
        .arg("sha-remote")
        .assert()
        .failure()
        .stderr(predicate::str::contains("github_user"));
}

// ---------------------------------------------------------------------------
// update-formula
// ---------------------------------------------------------------------------

#[test]
fn update_formula_patches_hash_line_in_place() {
    let base = serve_once("HTTP/1.1 200 OK", b"hello world");
    let dir = project(&base);

    brewsync(dir.path())
        .arg("update-formula")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "  sha256 \"{HELLO_WORLD_SHA}\""
        )));

    let disk = fs::read_to_string(dir.path().join("Formula/ollama-cli.rb")).expect("read");
    assert_eq!(disk, FORMULA.replace("abc123", HELLO_WORLD_SHA));
}

#[test]
fn update_formula_dry_run_prints_diff_only() {
    let base = serve_once("HTTP/1.1 200 OK", b"hello world");
    let dir = project(&base);

    brewsync(dir.path())
        .args(["update-formula", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[dry-run]"))
        .stdout(predicate::str::contains("-  sha256 \"abc123\""));

    dir.child("Formula/ollama-cli.rb").assert(FORMULA);
}

#[test]
fn update_formula_http_error_fails_without_writing() {
    let base = serve_once("HTTP/1.1 404 Not Found", b"404: Not Found");
    let dir = project(&base);

    brewsync(dir.path())
        .arg("update-formula")
        .assert()
        .failure()
        .stderr(predicate::str::contains("404"));

    dir.child("Formula/ollama-cli.rb").assert(FORMULA);
}

#[test]
fn update_formula_without_hash_line_fails() {
    let base = serve_once("HTTP/1.1 200 OK", b"hello world");
    let dir = project(&base);
    dir.child("Formula/ollama-cli.rb")
        .write_str("class OllamaCli < Formula\nend\n")
        .expect("write");

    brewsync(dir.path())
        .arg("update-formula")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no `sha256"));
}

#[test]
fn update_formula_with_pinned_hash_skips_download() {
    // Nothing listens on port 9; a fetch attempt would fail the command.
    let dir = project("http://127.0.0.1:9");

    brewsync(dir.path())
        .args(["update-formula", "--hash", &HELLO_WORLD_SHA.to_ascii_uppercase()])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("sha256: {HELLO_WORLD_SHA}")));

    let disk = fs::read_to_string(dir.path().join("Formula/ollama-cli.rb")).expect("read");
    assert_eq!(disk, FORMULA.replace("abc123", HELLO_WORLD_SHA));
}

#[test]
fn update_formula_rejects_malformed_pinned_hash() {
    let dir = project("http://127.0.0.1:9");

    brewsync(dir.path())
        .args(["update-formula", "--hash", "abc123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a 64-character hex SHA-256 digest"));

    dir.child("Formula/ollama-cli.rb").assert(FORMULA);
}

// ---------------------------------------------------------------------------
// deploy
// ---------------------------------------------------------------------------

#[test]
fn deploy_outside_a_git_repository_fails() {
    let dir = project("http://127.0.0.1:9");
    brewsync(dir.path())
        .env("GIT_CEILING_DIRECTORIES", dir.path())
        .arg("deploy")
        .assert()
        .failure()
        .stderr(predicate::str::contains("deploy failed"));
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .output()
        .expect("spawn git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn deploy_commits_and_pushes_with_custom_message() {
    if !git_available() {
        eprintln!("git not available; skipping");
        return;
    }
    let dir = project("http://127.0.0.1:9");
    let remote = assert_fs::TempDir::new().expect("remote");
    let remote_path = remote.path().to_str().expect("utf8 path");

    git(remote.path(), &["init", "-q", "--bare"]);
    git(dir.path(), &["init", "-q"]);
    git(dir.path(), &["config", "user.name", "Formula Bot"]);
    git(dir.path(), &["config", "user.email", "bot@example.com"]);
    git(dir.path(), &["config", "commit.gpgsign", "false"]);
    git(dir.path(), &["add", "-A"]);
    git(dir.path(), &["commit", "-q", "-m", "Add formula"]);
    git(dir.path(), &["remote", "add", "origin", remote_path]);
    git(dir.path(), &["push", "-q", "-u", "origin", "HEAD"]);

    dir.child("Formula/ollama-cli.rb")
        .write_str(&FORMULA.replace("abc123", HELLO_WORLD_SHA))
        .expect("edit formula");

    brewsync(dir.path())
        .args(["deploy", "custom msg"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "committed and pushed Formula/ollama-cli.rb: custom msg",
        ));

    assert_eq!(git(remote.path(), &["log", "-1", "--format=%s"]), "custom msg");
    assert!(git(dir.path(), &["status", "--porcelain"]).is_empty());
}

// ---------------------------------------------------------------------------
// lint-justfile
// ---------------------------------------------------------------------------

#[test]
fn lint_justfile_reports_space_indented_lines() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child("justfile")
        .write_str("config:\n    echo hi\n\techo ok\n")
        .expect("write");

    brewsync(dir.path())
        .arg("lint-justfile")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn lint_justfile_fix_rewrites_with_tabs() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let justfile = dir.child("justfile");
    justfile
        .write_str("config:\n    echo hi\n\techo ok\n")
        .expect("write");

    brewsync(dir.path())
        .args(["lint-justfile", "--fix"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fixed leading spaces"));
    justfile.assert("config:\n\techo hi\n\techo ok\n");
}

#[test]
fn lint_justfile_ignores_missing_file_and_bad_config() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    dir.child("brewsync.yaml")
        .write_str("- not a mapping\n")
        .expect("write");
    brewsync(dir.path()).arg("lint-justfile").assert().success();
}
