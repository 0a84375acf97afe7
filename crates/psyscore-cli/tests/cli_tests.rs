//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn psyscore() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("psyscore").unwrap();
    cmd.env_remove("PSYSCORE_FORMAT");
    cmd
}

fn write_answers(dir: &TempDir, json: &str) -> std::path::PathBuf {
    let path = dir.path().join("answers.json");
    std::fs::write(&path, json).unwrap();
    path
}

#[test]
fn validate_toml_test_reports_shared_band_boundaries() {
    psyscore()
        .arg("validate")
        .arg("--test")
        .arg("../../assessments/teamwork.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("Teamwork and Collaboration (4 questions)"))
        .stdout(predicate::str::contains(
            "bands 'Low' and 'Medium' share the boundary 40; it classifies as 'Low'",
        ))
        .stdout(predicate::str::contains(
            "bands 'Medium' and 'High' share the boundary 70; it classifies as 'Medium'",
        ))
        .stdout(predicate::str::contains("2 warning(s) found"));
}

#[test]
fn validate_clean_test() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("clean.json");
    std::fs::write(
        &path,
        r#"{
            "title": "Clean",
            "dimensions": { "focus": { "name": "Focus" } },
            "pages": [{ "questions": [{
                "id": "q1", "text": "I finish what I start", "type": "likert",
                "dimension": "focus",
                "options": [{ "value": 1, "score": 1 }, { "value": 5, "score": 5 }]
            }] }],
            "scoring": { "bands": [{ "name": "Any", "min": 0, "max": 100 }] }
        }"#,
    )
    .unwrap();

    psyscore()
        .arg("validate")
        .arg("--test")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Clean (1 questions)"))
        .stdout(predicate::str::contains("All tests valid"));
}

#[test]
fn validate_reports_band_gaps() {
    psyscore()
        .arg("validate")
        .arg("--test")
        .arg("../../assessments/stress.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stress Tolerance (3 questions)"))
        .stdout(predicate::str::contains("between 40 and 41 match no band"))
        .stdout(predicate::str::contains("2 warning(s) found"));
}

#[test]
fn validate_directory() {
    psyscore()
        .arg("validate")
        .arg("--test")
        .arg("../../assessments")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stress Tolerance"))
        .stdout(predicate::str::contains("Teamwork and Collaboration"));
}

#[test]
fn validate_strict_fails_on_warnings() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("psyscore.toml");
    std::fs::write(&config, "strict = true\n").unwrap();

    psyscore()
        .arg("validate")
        .arg("--test")
        .arg("../../assessments/stress.json")
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("strict mode"));
}

#[test]
fn validate_invalid_test_reports_field_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(
        &path,
        r#"{ "pages": [{ "questions": [{ "id": "q1", "text": "?", "type": "likert" }] }] }"#,
    )
    .unwrap();

    psyscore()
        .arg("validate")
        .arg("--test")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("pages[0].questions[0].options"));
}

#[test]
fn validate_directory_fails_on_invalid_file() {
    let dir = TempDir::new().unwrap();
    std::fs::copy(
        "../../assessments/stress.json",
        dir.path().join("stress.json"),
    )
    .unwrap();
    std::fs::write(
        dir.path().join("broken.toml"),
        "[[pages]]\n[[pages.questions]]\nid = \"q1\"\ntype = \"likert\"\n",
    )
    .unwrap();

    psyscore()
        .arg("validate")
        .arg("--test")
        .arg(dir.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("Stress Tolerance (3 questions)"))
        .stderr(predicate::str::contains("pages[0].questions[0].text"))
        .stderr(predicate::str::contains("1 of 2 test config(s) failed validation"));
}

#[test]
fn validate_nonexistent_file() {
    psyscore()
        .arg("validate")
        .arg("--test")
        .arg("nonexistent.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn score_json_output() {
    let dir = TempDir::new().unwrap();
    let answers = write_answers(&dir, r#"{ "q1": 4, "q2": 5, "q3": 2, "q4": "The migration" }"#);

    let output = psyscore()
        .arg("score")
        .arg("--test")
        .arg("../../assessments/teamwork.toml")
        .arg("--answers")
        .arg(&answers)
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // teamwork: q1 4 + q3 reversed (5 - 2) = 7 over 2 answered items
    assert_eq!(result["dimensions"]["teamwork"]["score"], 7.0);
    assert_eq!(result["dimensions"]["teamwork"]["normalized"], 70.0);
    assert_eq!(result["dimensions"]["teamwork"]["band"], "Medium");
    assert_eq!(result["dimensions"]["collaboration"]["normalized"], 100.0);
    assert_eq!(result["overall"]["normalized"], 85.0);
    assert_eq!(result["overall"]["band"], "High");
    assert_eq!(result["details"].as_array().unwrap().len(), 3);
    assert_eq!(result["details"][2]["questionId"], "q3");
    assert_eq!(result["details"][2]["finalScore"], 3.0);
}

#[test]
fn score_table_output() {
    let dir = TempDir::new().unwrap();
    let answers = write_answers(&dir, r#"{ "q1": 5 }"#);

    psyscore()
        .current_dir(dir.path())
        .arg("score")
        .arg("--test")
        .arg(std::fs::canonicalize("../../assessments/teamwork.toml").unwrap())
        .arg("--answers")
        .arg(&answers)
        .assert()
        .success()
        .stdout(predicate::str::contains("Teamwork"))
        .stdout(predicate::str::contains("100.0%"))
        .stdout(predicate::str::contains("Overall"))
        .stdout(predicate::str::contains("1 of 4 question(s) scored"));
}

#[test]
fn score_declared_normalization_flag() {
    let dir = TempDir::new().unwrap();
    let answers = write_answers(&dir, r#"{ "q1": 5 }"#);

    let output = psyscore()
        .arg("score")
        .arg("--test")
        .arg("../../assessments/teamwork.toml")
        .arg("--answers")
        .arg(&answers)
        .arg("--format")
        .arg("json")
        .arg("--normalization")
        .arg("declared")
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["dimensions"]["teamwork"]["normalized"], 50.0);
}

#[test]
fn score_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let answers = write_answers(&dir, r#"{ "q1": 2, "q2": null }"#);
    let out = dir.path().join("results").join("attempt.json");

    psyscore()
        .arg("score")
        .arg("--test")
        .arg("../../assessments/stress.json")
        .arg("--answers")
        .arg(&answers)
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Result saved to"));

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(saved["dimensions"]["stress_management"]["normalized"], 40.0);
    assert!(saved["dimensions"].get("stress_susceptibility").is_none());
}

#[test]
fn score_tolerates_non_scalar_answer_values() {
    let dir = TempDir::new().unwrap();
    let answers = write_answers(&dir, r#"{ "q1": true, "q2": 4, "q4": { "note": "n/a" } }"#);

    let output = psyscore()
        .arg("score")
        .arg("--test")
        .arg("../../assessments/teamwork.toml")
        .arg("--answers")
        .arg(&answers)
        .arg("--format")
        .arg("json")
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["details"][0]["questionId"], "q1");
    assert_eq!(result["details"][0]["originalScore"], 0.0);
    assert_eq!(result["dimensions"]["teamwork"]["normalized"], 0.0);
    assert_eq!(result["dimensions"]["collaboration"]["normalized"], 80.0);
    assert_eq!(result["details"].as_array().unwrap().len(), 2);
}

#[test]
fn score_rejects_malformed_answers() {
    let dir = TempDir::new().unwrap();
    let answers = write_answers(&dir, "[1, 2, 3]");

    psyscore()
        .arg("score")
        .arg("--test")
        .arg("../../assessments/teamwork.toml")
        .arg("--answers")
        .arg(&answers)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse answers JSON"));
}

#[test]
fn score_rejects_unknown_format() {
    let dir = TempDir::new().unwrap();
    let answers = write_answers(&dir, "{}");

    psyscore()
        .arg("score")
        .arg("--test")
        .arg("../../assessments/teamwork.toml")
        .arg("--answers")
        .arg(&answers)
        .arg("--format")
        .arg("html")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown output format"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    psyscore()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created psyscore.toml"))
        .stdout(predicate::str::contains("Created assessments/example.toml"));

    assert!(dir.path().join("psyscore.toml").exists());
    assert!(dir.path().join("assessments/example.toml").exists());

    psyscore()
        .current_dir(dir.path())
        .arg("validate")
        .arg("--test")
        .arg("assessments/example.toml")
        .assert()
        .success()
        .stdout(predicate::str::contains("Example Assessment (2 questions)"))
        .stdout(predicate::str::contains("share the boundary 40"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    psyscore()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    psyscore()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn help_output() {
    psyscore()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Psychometric assessment scoring engine"));
}

#[test]
fn version_output() {
    psyscore()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("psyscore"));
}
