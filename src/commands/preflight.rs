//! Preflight command - verify a host is ready to run jobs

use anyhow::{bail, Result};
use colored::Colorize;
use std::path::Path;

use crate::config::{validate, MonitorConfig};
use crate::fs::HomeDir;

/// External programs a run shells out to
const REQUIRED_COMMANDS: &[&str] = &["ssh"];

/// Outcome of one preflight check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    fn pass(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            detail: detail.into(),
        }
    }

    fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            detail: detail.into(),
        }
    }
}

/// Run every check; later checks still run after a failure.
pub fn run_checks(home: &HomeDir, config_path: &Path) -> Vec<CheckResult> {
    let mut results = Vec::new();

    for command in REQUIRED_COMMANDS {
        results.push(match which::which(command) {
            Ok(path) => CheckResult::pass(format!("command {command}"), path.display().to_string()),
            Err(_) => CheckResult::fail(format!("command {command}"), "not found on PATH"),
        });
    }

    for dir in [home.logs_dir(), home.locks_dir()] {
        let name = format!("directory {}", dir.display());
        results.push(if dir.is_dir() {
            CheckResult::pass(name, "exists")
        } else {
            CheckResult::fail(name, "missing")
        });
    }

    let config_name = format!("config {}", config_path.display());
    match MonitorConfig::load(config_path) {
        Ok(config) => match validate(&config) {
            Ok(()) => results.push(CheckResult::pass(
                config_name,
                format!("{} job(s) valid", config.job_names().len()),
            )),
            Err(errors) => {
                for error in errors {
                    results.push(CheckResult::fail(config_name.clone(), error.to_string()));
                }
            }
        },
        Err(e) => results.push(CheckResult::fail(config_name, e.to_string())),
    }

    results
}

/// Execute the preflight command, printing one line per check
pub fn execute(home: &HomeDir, config_path: &Path) -> Result<()> {
    println!("{} Running prerequisite checks...", "→".cyan().bold());

    let results = run_checks(home, config_path);
    for result in &results {
        if result.passed {
            println!("  {} {} ({})", "✓".green().bold(), result.name, result.detail.dimmed());
        } else {
            println!("  {} {}: {}", "✗".red().bold(), result.name, result.detail);
        }
    }

    let failed = results.iter().filter(|r| !r.passed).count();
    if failed > 0 {
        bail!("{failed} prerequisite check(s) failed");
    }

    println!("{} All prerequisite checks passed", "✓".green().bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const VALID: &str = r#"
ENV_URI: https://tenant.example/api/v2/metrics/ingest
Api_Token: t
functions:
  app01:
    kind: service
    server: 10.0.0.1
    username: monitor
    bankname: ACME
"#;

    fn failed(results: &[CheckResult]) -> Vec<&str> {
        results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| r.detail.as_str())
            .collect()
    }

    #[test]
    fn test_missing_dirs_and_config_reported() {
        let temp = TempDir::new().unwrap();
        let home = HomeDir::new(temp.path());

        let results = run_checks(&home, &home.default_config_path());

        let details = failed(&results);
        assert!(details.contains(&"missing"));
        assert!(details.iter().any(|d| d.contains("Failed to load configuration")));
    }

    #[test]
    fn test_valid_layout_passes_dir_and_config_checks() {
        let temp = TempDir::new().unwrap();
        let home = HomeDir::new(temp.path());
        home.ensure().unwrap();
        fs::write(home.default_config_path(), VALID).unwrap();

        let results = run_checks(&home, &home.default_config_path());

        // The ssh check depends on the machine running the tests
        let non_command: Vec<&CheckResult> = results
            .iter()
            .filter(|r| !r.name.starts_with("command "))
            .collect();
        assert_eq!(non_command.len(), 3);
        assert!(non_command.iter().all(|r| r.passed));
    }

    #[test]
    fn test_each_invalid_job_is_its_own_failure() {
        let temp = TempDir::new().unwrap();
        let home = HomeDir::new(temp.path());
        home.ensure().unwrap();
        fs::write(
            home.default_config_path(),
            "ENV_URI: https://x\nApi_Token: t\nfunctions:\n  a: {kind: service}\n  b: {kind: queue}\n",
        )
        .unwrap();

        let results = run_checks(&home, &home.default_config_path());

        let config_failures: Vec<&CheckResult> = results
            .iter()
            .filter(|r| r.name.starts_with("config ") && !r.passed)
            .collect();
        assert_eq!(config_failures.len(), 2);
    }
}
