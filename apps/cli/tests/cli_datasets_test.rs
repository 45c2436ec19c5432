//! Integration tests for the `dojo datasets` commands.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

/// `dojo` isolated from the developer's config files and environment.
fn dojo(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dojo").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("NIHONGO_DOJO_CACHE_DIR")
        .env_remove("NIHONGO_DOJO_REPO_URL");
    cmd
}

#[test]
fn test_list_json_shows_six_absent_datasets() {
    let temp_dir = TempDir::new().unwrap();
    let cache = temp_dir.path().join("cache");

    let assert = dojo(temp_dir.path())
        .arg("--cache-dir")
        .arg(&cache)
        .args(["datasets", "list", "--json"])
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("list output should be valid JSON");
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 6);
    let names: Vec<&str> = entries.iter().map(|e| e["name"].as_str().unwrap()).collect();
    assert!(names.contains(&"nihongo-dojo-10k"));
    assert!(names.contains(&"nihongo-dojo-business"));
    assert!(entries.iter().all(|e| e["state"] == "absent"));
}

#[test]
fn test_list_human_output() {
    let temp_dir = TempDir::new().unwrap();
    dojo(temp_dir.path())
        .arg("--cache-dir")
        .arg(temp_dir.path().join("cache"))
        .args(["datasets", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Datasets (6)"))
        .stdout(predicate::str::contains("nihongo-dojo-beginner"));
}

#[test]
fn test_info_unknown_dataset_lists_valid_names() {
    let temp_dir = TempDir::new().unwrap();
    dojo(temp_dir.path())
        .args(["datasets", "info", "nihongo-dojo-1m"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown dataset: nihongo-dojo-1m"))
        .stderr(predicate::str::contains("nihongo-dojo-500k"));
}

#[test]
fn test_info_reads_cache_dir_from_local_config() {
    let temp_dir = TempDir::new().unwrap();
    let cache = temp_dir.path().join("from-dojorc");
    let dataset = cache.join("nihongo-dojo-10k");
    std::fs::create_dir_all(&dataset).unwrap();
    std::fs::write(dataset.join("metadata.json"), r#"{"total_tasks": 10000, "version": "1.0"}"#).unwrap();
    std::fs::write(
        temp_dir.path().join(".dojorc"),
        format!("cache_dir = {:?}\n", cache.display().to_string()),
    )
    .unwrap();

    let assert = dojo(temp_dir.path()).args(["datasets", "info", "nihongo-dojo-10k", "--json"]).assert().success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["name"], "nihongo-dojo-10k");
    assert_eq!(json["is_downloaded"], true);
    assert_eq!(json["metadata"]["total_tasks"], 10000);
}

#[test]
fn test_info_not_downloaded() {
    let temp_dir = TempDir::new().unwrap();
    dojo(temp_dir.path())
        .arg("--cache-dir")
        .arg(temp_dir.path().join("cache"))
        .args(["datasets", "info", "nihongo-dojo-50k"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not downloaded"));
}

#[test]
fn test_pack_prints_archive_checksum() {
    let temp_dir = TempDir::new().unwrap();
    let dataset = temp_dir.path().join("nihongo-dojo-custom");
    std::fs::create_dir_all(&dataset).unwrap();
    std::fs::write(
        dataset.join("tasks.jsonl"),
        "{\"instruction\": \"空欄に入る助詞を答えてください\", \"input\": \"公園（　）遊ぶ\", \"output\": \"で\", \"task_type\": \"particle_fill\"}\n",
    )
    .unwrap();
    let output = temp_dir.path().join("out").join("custom.tar.gz");

    let assert = dojo(temp_dir.path())
        .args(["datasets", "pack"])
        .arg(&dataset)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let expected = dojo_datasets::sha256_file(&output).unwrap();
    assert!(stdout.contains(&format!("sha256 {expected}")), "stdout: {stdout}");
}

#[test]
fn test_pack_missing_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    dojo(temp_dir.path())
        .args(["datasets", "pack", "does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to pack"));
}

#[test]
fn test_fetch_unknown_dataset_fails_without_network() {
    let temp_dir = TempDir::new().unwrap();
    let cache = temp_dir.path().join("cache");
    dojo(temp_dir.path())
        .arg("--cache-dir")
        .arg(&cache)
        .args(["datasets", "fetch", "nihongo-dojo-typo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown dataset"));
    assert!(!cache.exists());
}
