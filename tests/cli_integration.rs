//! Integration tests for the `smartdo` CLI.
//!
//! Each test points `smartdo` at a temp data directory with `-D`, runs it
//! as a subprocess, and checks stdout, stderr and exit status.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Get the path to the built `smartdo` binary.
fn smartdo_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("smartdo");
    path
}

/// Run `smartdo -D <dir> <args>`, return (stdout, stderr, success).
fn run_smartdo(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(smartdo_bin())
        .arg("-D")
        .arg(dir)
        .args(args)
        .env_remove("SMARTDO_LOG")
        .env_remove("SMARTDO_HOME")
        .output()
        .expect("failed to run smartdo");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `smartdo` expecting success, return stdout.
fn run_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_smartdo(dir, args);
    if !success {
        panic!(
            "smartdo {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run `smartdo` expecting failure, return stderr.
fn run_err(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_smartdo(dir, args);
    if success {
        panic!("smartdo {:?} unexpectedly succeeded:\nstdout: {}", args, stdout);
    }
    stderr
}

fn signed_in(name: &str) -> tempfile::TempDir {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["signin", name]);
    tmp
}

fn list_json(dir: &Path) -> serde_json::Value {
    serde_json::from_str(&run_ok(dir, &["list", "--json"])).unwrap()
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

#[test]
fn signin_whoami_signout() {
    let tmp = tempfile::TempDir::new().unwrap();
    assert_eq!(run_ok(tmp.path(), &["whoami"]), "Not signed in\n");

    assert_eq!(run_ok(tmp.path(), &["signin", "ana"]), "Signed in as ana\n");
    assert_eq!(run_ok(tmp.path(), &["whoami"]), "ana\n");

    let json: serde_json::Value =
        serde_json::from_str(&run_ok(tmp.path(), &["whoami", "--json"])).unwrap();
    assert_eq!(json["user"], "ana");

    assert_eq!(run_ok(tmp.path(), &["signout"]), "Signed out ana\n");
    assert_eq!(run_ok(tmp.path(), &["whoami"]), "Not signed in\n");
}

#[test]
fn signin_rejects_bad_names() {
    let tmp = tempfile::TempDir::new().unwrap();
    let stderr = run_err(tmp.path(), &["signin", "../etc"]);
    assert!(stderr.starts_with("error:"), "stderr: {}", stderr);
    assert_eq!(run_ok(tmp.path(), &["whoami"]), "Not signed in\n");
}

#[test]
fn task_commands_need_a_session() {
    let tmp = tempfile::TempDir::new().unwrap();
    for args in [
        vec!["list"],
        vec!["add", "Walk dog"],
        vec!["edit", "x", "y"],
        vec!["rm", "x"],
    ] {
        let stderr = run_err(tmp.path(), &args);
        assert!(stderr.contains("not signed in"), "stderr: {}", stderr);
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[test]
fn empty_list() {
    let tmp = signed_in("ana");
    assert_eq!(run_ok(tmp.path(), &["list"]), "No tasks yet\n");
    assert_eq!(list_json(tmp.path())["tasks"].as_array().unwrap().len(), 0);
}

#[test]
fn add_and_list_newest_first() {
    let tmp = signed_in("ana");
    run_ok(tmp.path(), &["add", "Walk", "dog"]);
    run_ok(tmp.path(), &["add", "  Buy milk  "]);

    let out = run_ok(tmp.path(), &["list"]);
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].ends_with("  Buy milk"), "out: {}", out);
    assert!(lines[1].ends_with("  Walk dog"), "out: {}", out);
    assert_eq!(lines.last(), Some(&"2 tasks total"));

    let json = list_json(tmp.path());
    assert_eq!(json["user"], "ana");
    assert_eq!(json["tasks"][0]["text"], "Buy milk");
    assert_eq!(json["tasks"][1]["text"], "Walk dog");
}

#[test]
fn blank_add_is_a_notice() {
    let tmp = signed_in("ana");
    let (stdout, stderr, success) = run_smartdo(tmp.path(), &["add", "   "]);
    assert!(success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Nothing to add"));
    assert_eq!(run_ok(tmp.path(), &["list"]), "No tasks yet\n");
}

#[test]
fn edit_by_prefix() {
    let tmp = signed_in("ana");
    let id = run_ok(tmp.path(), &["add", "Walk dog"]).trim().to_string();

    let out = run_ok(tmp.path(), &["edit", &id[..6], "Walk", "the", "dog"]);
    assert!(out.starts_with("Updated"));
    assert_eq!(list_json(tmp.path())["tasks"][0]["text"], "Walk the dog");
}

#[test]
fn edit_to_blank_fails_and_keeps_text() {
    let tmp = signed_in("ana");
    let id = run_ok(tmp.path(), &["add", "Walk dog"]).trim().to_string();
    let stderr = run_err(tmp.path(), &["edit", &id, "  "]);
    assert!(stderr.contains("must not be empty"), "stderr: {}", stderr);
    assert_eq!(list_json(tmp.path())["tasks"][0]["text"], "Walk dog");
}

#[test]
fn rm_and_unknown_ids() {
    let tmp = signed_in("ana");
    let id = run_ok(tmp.path(), &["add", "Walk dog"]).trim().to_string();
    run_ok(tmp.path(), &["add", "Buy milk"]);

    run_ok(tmp.path(), &["rm", &id]);
    let json = list_json(tmp.path());
    assert_eq!(json["tasks"].as_array().unwrap().len(), 1);
    assert_eq!(json["tasks"][0]["text"], "Buy milk");

    let stderr = run_err(tmp.path(), &["rm", &id]);
    assert!(stderr.contains("task not found"), "stderr: {}", stderr);
}

#[test]
fn users_only_see_their_own_tasks() {
    let tmp = signed_in("ana");
    run_ok(tmp.path(), &["add", "Ana's task"]);
    run_ok(tmp.path(), &["signin", "ben"]);
    assert_eq!(run_ok(tmp.path(), &["list"]), "No tasks yet\n");
    run_ok(tmp.path(), &["signin", "ana"]);
    assert_eq!(list_json(tmp.path())["tasks"][0]["text"], "Ana's task");
}

// ---------------------------------------------------------------------------
// Feed
// ---------------------------------------------------------------------------

#[test]
fn feed_text_and_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_ok(tmp.path(), &["feed"]);
    assert!(out.contains("Sarah Chen @sarahfitslife"));
    assert!(out.contains("♡ 127"));

    let json: serde_json::Value =
        serde_json::from_str(&run_ok(tmp.path(), &["feed", "--json"])).unwrap();
    let posts = json.as_array().unwrap();
    assert_eq!(posts.len(), 3);
    assert_eq!(posts[2]["handle"], "@emmayoga");
    assert_eq!(posts[2]["likes"], 156);
    assert_eq!(posts[2]["liked"], false);
}

// ---------------------------------------------------------------------------
// Init and config
// ---------------------------------------------------------------------------

#[test]
fn init_writes_template_once() {
    let tmp = tempfile::TempDir::new().unwrap();
    let data = tmp.path().join("data");
    let out = run_ok(&data, &["init"]);
    assert!(out.starts_with("Initialized smartdo"));
    assert!(data.join("config.toml").is_file());
    assert!(data.join("store").is_dir());

    let stderr = run_err(&data, &["init"]);
    assert!(stderr.contains("--force"));
    run_ok(&data, &["init", "--force"]);
}

#[test]
fn init_force_replaces_broken_config() {
    let tmp = tempfile::TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), "[log\nlevel = ").unwrap();
    run_err(tmp.path(), &["whoami"]);
    run_ok(tmp.path(), &["init", "--force"]);
    run_ok(tmp.path(), &["whoami"]);
}

#[test]
fn config_set_and_get_preserves_comments() {
    let tmp = tempfile::TempDir::new().unwrap();
    run_ok(tmp.path(), &["init"]);

    assert_eq!(
        run_ok(tmp.path(), &["config", "store.lock_timeout_ms", "250"]),
        "store.lock_timeout_ms = 250\n"
    );
    assert_eq!(
        run_ok(tmp.path(), &["config", "store.lock_timeout_ms"]),
        "250\n"
    );
    let text = fs::read_to_string(tmp.path().join("config.toml")).unwrap();
    assert!(text.starts_with("# smartdo settings"));

    let stderr = run_err(tmp.path(), &["config", "store.nope", "1"]);
    assert!(stderr.contains("unknown config key"));
    let stderr = run_err(tmp.path(), &["config", "log.file"]);
    assert!(stderr.contains("not set"));
}

#[test]
fn log_level_flag_rejects_bad_filter() {
    let tmp = tempfile::TempDir::new().unwrap();
    let stderr = run_err(tmp.path(), &["--log-level", "smartdo=notalevel", "whoami"]);
    assert!(stderr.contains("invalid log filter"));
}
