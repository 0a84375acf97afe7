//! The `psyscore init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("psyscore.toml").exists() {
        println!("psyscore.toml already exists, skipping.");
    } else {
        std::fs::write("psyscore.toml", SAMPLE_CONFIG)?;
        println!("Created psyscore.toml");
    }

    std::fs::create_dir_all("assessments")?;
    let example_path = std::path::Path::new("assessments/example.toml");
    if example_path.exists() {
        println!("assessments/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_TEST)?;
        println!("Created assessments/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit assessments/example.toml with your questions and bands");
    println!("  2. Run: psyscore validate --test assessments/example.toml");
    println!("  3. Run: psyscore score --test assessments/example.toml --answers answers.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# psyscore configuration

# Output format for `psyscore score`: "table" or "json"
default_format = "table"

# Decimal places in table output
precision = 1

# Fail `psyscore validate` on warnings
strict = false

# Override every test's normalization policy: "answered" or "declared"
# normalization = "answered"
"#;

const EXAMPLE_TEST: &str = r##"title = "Example Assessment"

[dimensions.teamwork]
name = "Teamwork"
description = "Ability to work effectively in a team"

[[pages]]
title = "About you"

[[pages.questions]]
id = "q1"
text = "I prefer working in teams"
type = "likert"
dimension = "teamwork"
options = [
    { value = 1, label = "Strongly Disagree", score = 1 },
    { value = 2, label = "Disagree", score = 2 },
    { value = 3, label = "Neutral", score = 3 },
    { value = 4, label = "Agree", score = 4 },
    { value = 5, label = "Strongly Agree", score = 5 },
]

[[pages.questions]]
id = "q2"
text = "I work better alone"
type = "likert"
dimension = "teamwork"
reverse = true
options = [
    { value = 1, label = "Strongly Disagree", score = 1 },
    { value = 2, label = "Disagree", score = 2 },
    { value = 3, label = "Neutral", score = 3 },
    { value = 4, label = "Agree", score = 4 },
    { value = 5, label = "Strongly Agree", score = 5 },
]

[scoring]
normalization = "answered"
bands = [
    { name = "Low", min = 0, max = 40, color = "#ef4444" },
    { name = "Medium", min = 40, max = 70, color = "#f59e0b" },
    { name = "High", min = 70, max = 100, color = "#10b981" },
]
"##;
