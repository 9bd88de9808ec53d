//! CLI behaviour tests
//!
//! Runs the actual binary with an explicit --config so the user's
//! configuration never leaks into results.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use crate::helpers::write_theme_index;

fn iconcache() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_iconcache"));
    cmd.env("NO_COLOR", "1").env_remove("ICONCACHE_LOG");
    cmd
}

fn missing_config(dir: &TempDir) -> String {
    dir.path().join("absent.toml").display().to_string()
}

#[test]
fn classify_prints_one_key_per_path() {
    let dir = TempDir::new().unwrap();
    let exe = dir.path().join("setup.exe");
    fs::write(&exe, b"").unwrap();
    fs::write(dir.path().join("notes.TXT"), b"").unwrap();

    iconcache()
        .args(["--config", &missing_config(&dir), "classify"])
        .arg(&exe)
        .arg(dir.path().join("notes.TXT"))
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "{}\t{}",
            exe.display(),
            exe.display()
        )))
        .stdout(predicate::str::contains("notes.TXT\t*.txt"))
        .stdout(predicate::str::contains("\t<directory>"));
}

#[test]
fn classify_requires_a_path() {
    iconcache().arg("classify").assert().failure();
}

#[test]
fn config_show_prints_defaults() {
    let dir = TempDir::new().unwrap();
    iconcache()
        .args(["--config", &missing_config(&dir), "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("max_entries = 800"))
        .stdout(predicate::str::contains("theme = \"hicolor\""));
}

#[test]
fn config_path_echoes_override() {
    let dir = TempDir::new().unwrap();
    let path = missing_config(&dir);
    iconcache()
        .args(["--config", &path, "config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(path.as_str()));
}

#[test]
fn invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[cache]\nmax_entries = 0\n").unwrap();

    iconcache()
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid config"));
}

fn write_config(dir: &Path, theme_root: &Path) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    let contents = format!(
        "[resolver]\nsearch_dirs = [{:?}]\n",
        theme_root.display().to_string()
    );
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn scan_json_reports_counts() {
    let theme = TempDir::new().unwrap();
    write_theme_index(theme.path(), "hicolor", &["16x16/places"]);
    let icon = theme.path().join("hicolor/16x16/places/folder.png");
    fs::create_dir_all(icon.parent().unwrap()).unwrap();
    fs::write(&icon, b"folder").unwrap();

    let tree = TempDir::new().unwrap();
    fs::create_dir(tree.path().join("one")).unwrap();
    fs::create_dir(tree.path().join("two")).unwrap();
    fs::write(tree.path().join("x.zzqqxx"), b"").unwrap();

    let config = write_config(tree.path(), theme.path());

    let output = iconcache()
        .arg("--config")
        .arg(&config)
        .arg("scan")
        .arg(tree.path())
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // one, two, config.toml, x.zzqqxx
    assert_eq!(report["entries"], 4);
    // <directory>, *.toml, *.zzqqxx
    assert_eq!(report["distinct_keys"], 3);
    assert_eq!(report["with_icon"], 1);
    assert_eq!(report["status"], "complete");
    assert_eq!(report["stats"]["max_entries"], 800);
}

#[test]
fn scan_text_summary() {
    let tree = TempDir::new().unwrap();
    fs::write(tree.path().join("a.md"), b"").unwrap();
    let config = write_config(tree.path(), &tree.path().join("no-icons"));

    iconcache()
        .arg("--config")
        .arg(&config)
        .arg("scan")
        .arg(tree.path())
        .args(["--max-entries", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 entries, 2 distinct keys"))
        .stdout(predicate::str::contains("/ 5"));
}

#[test]
fn scan_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    iconcache()
        .args(["--config", &missing_config(&dir), "scan"])
        .arg(dir.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to list directory"));
}

#[test]
fn scan_rejects_zero_max_entries() {
    let dir = TempDir::new().unwrap();
    iconcache()
        .args(["--config", &missing_config(&dir), "scan"])
        .arg(dir.path())
        .args(["--max-entries", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--max-entries must be > 0"));
}
