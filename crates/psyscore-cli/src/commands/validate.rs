//! The `psyscore validate` command.

use std::path::{Path, PathBuf};

use anyhow::Result;

use psyscore_core::parser::{
    lint_test_config, load_test_config, load_test_directory, LoadedDirectory,
};

use crate::config::load_config_from;

pub fn execute(test_path: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let loaded = if test_path.is_dir() {
        load_test_directory(&test_path)?
    } else {
        let mut loaded = LoadedDirectory::default();
        match load_test_config(&test_path) {
            Ok(test) => loaded.tests.push((test_path, test)),
            Err(e) => loaded.failures.push((test_path, e)),
        }
        loaded
    };

    let mut total_warnings = 0;

    for (path, test) in &loaded.tests {
        println!(
            "Test: {} ({} questions)",
            test.title.as_deref().unwrap_or_else(|| file_label(path)),
            test.question_count()
        );

        let warnings = lint_test_config(test);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    for (path, e) in &loaded.failures {
        eprintln!("{}: ERROR: {e:#}", path.display());
    }
    if !loaded.failures.is_empty() {
        anyhow::bail!(
            "{} of {} test config(s) failed validation",
            loaded.failures.len(),
            loaded.failures.len() + loaded.tests.len()
        );
    }

    if total_warnings == 0 {
        println!("All tests valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
        if config.strict {
            anyhow::bail!("strict mode: {total_warnings} warning(s) treated as errors");
        }
    }

    Ok(())
}

fn file_label(path: &Path) -> &str {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("(untitled)")
}
