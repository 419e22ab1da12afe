use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// Helper to get a Command for the `statusline` binary, isolated from the
// caller's environment and pointed at an empty project directory.
fn statusline(project: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("statusline").expect("binary exists");
    cmd.env("CLAUDE_PROJECT_DIR", project.path())
        .env("STATUSLINE_CONFIG", project.path().join("absent.toml"))
        .env_remove("NO_COLOR")
        .env_remove("COLUMNS")
        .env_remove("STATUSLINE_WIDTH")
        .env_remove("STATUSLINE_LOG")
        .env_remove("VIRTUAL_ENV");
    cmd
}

fn stdout_lines(output: &std::process::Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

// -----------------------------------------------------------------------
// Basic CLI
// -----------------------------------------------------------------------

#[test]
fn help_shows_description() {
    let dir = TempDir::new().unwrap();
    statusline(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Context-aware statusline"));
}

#[test]
fn version_shows_semver() {
    let dir = TempDir::new().unwrap();
    statusline(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn unknown_flag_fails() {
    let dir = TempDir::new().unwrap();
    statusline(&dir)
        .arg("--frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

// -----------------------------------------------------------------------
// Rendering
// -----------------------------------------------------------------------

#[test]
fn empty_object_exits_zero() {
    let dir = TempDir::new().unwrap();
    statusline(&dir).write_stdin("{}").assert().success();
}

#[test]
fn no_stdin_exits_zero() {
    let dir = TempDir::new().unwrap();
    statusline(&dir).assert().success();
}

#[test]
fn malformed_stdin_still_renders() {
    let dir = TempDir::new().unwrap();
    let output = statusline(&dir)
        .args(["--width", "100", "--no-color"])
        .write_stdin("{not json")
        .output()
        .expect("failed to run");
    assert!(output.status.success());
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 1, "got: {:?}", lines);
    assert!(!lines[0].is_empty());
}

#[test]
fn width_70_nothing_configured_is_one_line() {
    let dir = TempDir::new().unwrap();
    let output = statusline(&dir)
        .args(["--width", "70", "--no-color"])
        .write_stdin("{}")
        .output()
        .expect("failed to run");
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 1, "got: {:?}", lines);
    assert!(lines[0].contains("unknown"), "got: {:?}", lines[0]);
    assert!(lines[0].chars().count() <= 70);
}

#[test]
fn width_150_prints_two_lines_within_width() {
    let dir = TempDir::new().unwrap();
    let output = statusline(&dir)
        .args(["--width", "150", "--no-color"])
        .write_stdin(r#"{"model":{"display_name":"Opus"},"cost":{"total_cost_usd":0.5}}"#)
        .output()
        .expect("failed to run");
    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 2, "got: {:?}", lines);
    for line in &lines {
        assert!(line.chars().count() <= 150, "too wide: {:?}", line);
    }
    assert!(lines[0].contains("Opus"));
    assert!(lines[0].contains("$0.50"));
}

#[test]
fn statusline_width_env_is_honored() {
    let dir = TempDir::new().unwrap();
    let output = statusline(&dir)
        .env("STATUSLINE_WIDTH", "150")
        .arg("--no-color")
        .write_stdin("{}")
        .output()
        .expect("failed to run");
    assert_eq!(stdout_lines(&output).len(), 2);
}

#[test]
fn no_color_flag_strips_ansi() {
    let dir = TempDir::new().unwrap();
    let output = statusline(&dir)
        .arg("--no-color")
        .write_stdin("{}")
        .output()
        .expect("failed to run");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains('\x1b'), "{:?}", stdout);
}

#[test]
fn no_color_env_strips_ansi() {
    let dir = TempDir::new().unwrap();
    let output = statusline(&dir)
        .env("NO_COLOR", "1")
        .write_stdin("{}")
        .output()
        .expect("failed to run");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains('\x1b'), "{:?}", stdout);
}

#[test]
fn color_is_forced_on_when_piped() {
    let dir = TempDir::new().unwrap();
    let output = statusline(&dir)
        .write_stdin("{}")
        .output()
        .expect("failed to run");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains('\x1b'), "{:?}", stdout);
}

#[test]
fn no_unicode_is_ascii_only() {
    let dir = TempDir::new().unwrap();
    for width in ["70", "100", "150", "200"] {
        let output = statusline(&dir)
            .args(["--no-unicode", "--no-color", "--width", width])
            .write_stdin(r#"{"model":"Sonnet","context_tokens":150000,"context_window":200000}"#)
            .output()
            .expect("failed to run");
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.is_ascii(), "width {}: {:?}", width, stdout);
    }
}

#[test]
fn bench_reports_timing_on_stderr() {
    let dir = TempDir::new().unwrap();
    statusline(&dir)
        .args(["--bench", "--no-color"])
        .write_stdin("{}")
        .assert()
        .success()
        .stderr(predicate::str::is_match(r"statusline rendered in \d+\.\d{2}ms").unwrap());
}

#[test]
fn malformed_config_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "git_timeout_ms = [").unwrap();
    statusline(&dir)
        .args(["--config", config.to_str().unwrap(), "--no-color", "--width", "70"])
        .write_stdin("{}")
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown"));
}

// -----------------------------------------------------------------------
// Cache subcommand
// -----------------------------------------------------------------------

#[test]
fn cache_path_prints_project_location() {
    let dir = TempDir::new().unwrap();
    let expected = dir.path().join(".claude").join("statusline-cache.json");
    statusline(&dir)
        .args(["cache", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.to_str().unwrap()));
}

#[test]
fn cache_path_follows_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("statusline.toml");
    std::fs::write(&config, "cache_file = \"tmp/facts.json\"\n").unwrap();
    let expected = dir.path().join("tmp").join("facts.json");
    statusline(&dir)
        .args(["cache", "path", "--config", config.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.to_str().unwrap()));
}

#[test]
fn cache_path_project_flag_wins_over_env() {
    let dir = TempDir::new().unwrap();
    let other = TempDir::new().unwrap();
    let expected = other.path().join(".claude").join("statusline-cache.json");
    statusline(&dir)
        .args(["cache", "path", "--project", other.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.to_str().unwrap()));
}

#[test]
fn cache_show_empty() {
    let dir = TempDir::new().unwrap();
    statusline(&dir)
        .args(["cache", "show"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No cached facts"));
}

#[test]
fn cache_show_json_after_render() {
    let dir = TempDir::new().unwrap();
    statusline(&dir).write_stdin("{}").assert().success();

    let output = statusline(&dir)
        .args(["cache", "show", "--json"])
        .output()
        .expect("failed to run");
    assert!(output.status.success());
    let parsed: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("cache show --json prints JSON");
    assert!(parsed.is_object());
}

#[test]
fn cache_clear_removes_file() {
    let dir = TempDir::new().unwrap();
    let cache = dir.path().join(".claude").join("statusline-cache.json");
    std::fs::create_dir_all(cache.parent().unwrap()).unwrap();
    std::fs::write(&cache, "{}").unwrap();

    statusline(&dir)
        .args(["cache", "clear"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Removed"));
    assert!(!cache.exists());

    statusline(&dir)
        .args(["cache", "clear"])
        .assert()
        .success()
        .stderr(predicate::str::contains("already empty"));
}
