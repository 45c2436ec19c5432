//! Integration tests for `dojo score`.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::TempDir;

fn dojo(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("dojo").unwrap();
    cmd.current_dir(home).env("HOME", home).env("NO_COLOR", "1");
    cmd
}

fn write_batch(dir: &Path, batch: &serde_json::Value) -> std::path::PathBuf {
    let path = dir.join("batch.json");
    std::fs::write(&path, batch.to_string()).unwrap();
    path
}

#[test]
fn test_score_json_report() {
    let temp_dir = TempDir::new().unwrap();
    let batch = write_batch(
        temp_dir.path(),
        &serde_json::json!({
            "completions": [
                "<reasoning>格助詞「に」は場所を表す</reasoning><answer>に</answer>",
                [{"role": "assistant", "content": "答えはでです"}]
            ],
            "answer": "で"
        }),
    );

    let assert = dojo(temp_dir.path()).arg("score").arg(&batch).arg("--json").assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("score output should be valid JSON");

    assert_eq!(json["batch_size"], 2);
    let functions = json["functions"].as_array().unwrap();
    let names: Vec<&str> = functions.iter().map(|f| f["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["strict_structure", "particle_answer", "reasoning_quality"]);

    let particle: Vec<f64> = functions[1]["scores"].as_array().unwrap().iter().map(|v| v.as_f64().unwrap()).collect();
    assert!((particle[0] - 0.3).abs() < 1e-9);
    assert!((particle[1] + 3.0).abs() < 1e-9);

    let totals: Vec<f64> = json["totals"].as_array().unwrap().iter().map(|v| v.as_f64().unwrap()).collect();
    assert!((totals[0] - (0.5 + 0.3 + 1.0)).abs() < 1e-9);
    assert!((totals[1] - (-2.0 - 3.0 - 1.0)).abs() < 1e-9);

    assert_eq!(json["distribution"]["total"], 2);
}

#[test]
fn test_score_with_format_adds_functions() {
    let temp_dir = TempDir::new().unwrap();
    let batch = write_batch(
        temp_dir.path(),
        &serde_json::json!({"completions": ["<reasoning>x</reasoning><answer>が</answer>"], "answer": ["が"]}),
    );

    let assert = dojo(temp_dir.path()).arg("score").arg(&batch).args(["--with-format", "--json"]).assert().success();
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&assert.get_output().stdout)).unwrap();
    let functions = json["functions"].as_array().unwrap();
    assert_eq!(functions.len(), 5);
    assert_eq!(functions[3]["name"], "exact_format");
    assert_eq!(functions[3]["scores"][0], 1.0);
}

#[test]
fn test_score_uses_delimiters_from_local_config() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join(".dojorc"),
        "[delimiters]\nreasoning_start = \"<think>\"\nreasoning_end = \"</think>\"\n",
    )
    .unwrap();
    let batch = write_batch(
        temp_dir.path(),
        &serde_json::json!({"completions": ["<think>主語を示す</think><answer>が</answer>"], "answer": "が"}),
    );

    let assert = dojo(temp_dir.path()).arg("score").arg(&batch).arg("--json").assert().success();
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&assert.get_output().stdout)).unwrap();
    assert_eq!(json["functions"][0]["scores"][0], 0.5);
    assert_eq!(json["functions"][2]["scores"][0], 0.5);
}

#[test]
fn test_score_human_output() {
    let temp_dir = TempDir::new().unwrap();
    let batch = write_batch(
        temp_dir.path(),
        &serde_json::json!({"completions": ["<reasoning>x</reasoning><answer>を</answer>"], "answer": "を"}),
    );
    dojo(temp_dir.path())
        .arg("score")
        .arg(&batch)
        .assert()
        .success()
        .stdout(predicate::str::contains("Scored 1 completion(s)"))
        .stdout(predicate::str::contains("particle_answer"))
        .stdout(predicate::str::contains("Reference answers"))
        .stdout(predicate::str::contains("100.0%"));
}

#[test]
fn test_score_applies_configured_penalties() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join(".dojorc"), "[penalties]\n\"を\" = 1.5\n").unwrap();
    let batch = write_batch(
        temp_dir.path(),
        &serde_json::json!({"completions": ["<reasoning>x</reasoning><answer>を</answer>"], "answer": "を"}),
    );

    let assert = dojo(temp_dir.path()).arg("score").arg(&batch).arg("--json").assert().success();
    let json: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&assert.get_output().stdout)).unwrap();
    assert_eq!(json["functions"][1]["scores"][0], 3.0);
}

#[test]
fn test_score_rejects_out_of_range_penalty() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join(".dojorc"), "[penalties]\n\"を\" = 0.0\n").unwrap();
    let batch = write_batch(
        temp_dir.path(),
        &serde_json::json!({"completions": ["<reasoning>x</reasoning><answer>を</answer>"], "answer": "を"}),
    );
    dojo(temp_dir.path())
        .arg("score")
        .arg(&batch)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid [penalties] configuration"));
}

#[test]
fn test_score_rejects_malformed_batch() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("batch.json");
    std::fs::write(&path, "not json").unwrap();
    dojo(temp_dir.path())
        .arg("score")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse batch file"));
}
