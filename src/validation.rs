//! Input validation for values that end up in file paths or on an ssh argv.
//!
//! Job names become lock file names, so they are restricted to a safe
//! character set. Hosts and users are passed to `ssh` as a single
//! `user@host` argument and must not be mistaken for options.

use crate::error::{MonitorError, Result};

/// Maximum allowed length for job names.
pub const MAX_JOB_NAME_LENGTH: usize = 128;

/// Reserved names that cannot be used as job names (case-insensitive).
const RESERVED_NAMES: &[&str] = &[
    ".", "..", "con", "prn", "aux", "nul", "com1", "com2", "com3", "com4", "com5", "com6", "com7",
    "com8", "com9", "lpt1", "lpt2", "lpt3", "lpt4", "lpt5", "lpt6", "lpt7", "lpt8", "lpt9",
];

/// Validates that a job name is safe for use as a lock file name.
///
/// A job name is valid if:
/// - It is not empty
/// - It is no longer than MAX_JOB_NAME_LENGTH characters
/// - It contains only alphanumeric characters, dashes, and underscores
/// - It does not use reserved system names
///
/// # Examples
///
/// ```
/// use hostwatch::validation::validate_job_name;
///
/// assert!(validate_job_name("app01").is_ok());
/// assert!(validate_job_name("mq_orders-2").is_ok());
/// assert!(validate_job_name("").is_err());
/// assert!(validate_job_name("../etc/passwd").is_err());
/// ```
pub fn validate_job_name(name: &str) -> Result<()> {
    let invalid = |reason: String| MonitorError::InvalidJobName {
        name: name.to_string(),
        reason,
    };

    if name.is_empty() {
        return Err(invalid("job name cannot be empty".to_string()));
    }

    if name.len() > MAX_JOB_NAME_LENGTH {
        return Err(invalid(format!(
            "too long: {} characters (max {MAX_JOB_NAME_LENGTH})",
            name.len()
        )));
    }

    let valid_chars = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid_chars {
        return Err(invalid(
            "use only alphanumeric characters, dashes (-), and underscores (_)".to_string(),
        ));
    }

    if RESERVED_NAMES.contains(&name.to_lowercase().as_str()) {
        return Err(invalid("reserved name".to_string()));
    }

    Ok(())
}

/// Validates a host or user name before it is joined into `user@host`.
///
/// Rejects empty values, a leading dash (ssh would parse it as an option),
/// whitespace, control characters, and an embedded `@`.
pub fn validate_remote_identity(job: &str, field: &str, value: &str) -> Result<()> {
    let invalid = |reason: &str| MonitorError::InvalidField {
        job: job.to_string(),
        field: field.to_string(),
        reason: reason.to_string(),
    };

    if value.is_empty() {
        return Err(invalid("cannot be empty"));
    }
    if value.starts_with('-') {
        return Err(invalid("cannot start with '-'"));
    }
    if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(invalid("cannot contain whitespace or control characters"));
    }
    if value.contains('@') {
        return Err(invalid("cannot contain '@'"));
    }

    Ok(())
}

/// Clap value parser for the positional job name.
pub fn clap_job_name_validator(s: &str) -> std::result::Result<String, String> {
    validate_job_name(s).map_err(|e| e.to_string())?;
    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_job_name_valid() {
        assert!(validate_job_name("app01").is_ok());
        assert!(validate_job_name("WHATSUP_mq").is_ok());
        assert!(validate_job_name("bank-a-core").is_ok());
        assert!(validate_job_name("a").is_ok());
    }

    #[test]
    fn test_validate_job_name_empty() {
        let result = validate_job_name("");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_validate_job_name_too_long() {
        let long_name = "a".repeat(MAX_JOB_NAME_LENGTH + 1);
        let result = validate_job_name(&long_name);
        assert!(result.unwrap_err().to_string().contains("too long"));
    }

    #[test]
    fn test_validate_job_name_path_characters() {
        assert!(validate_job_name("jobs/app01").is_err());
        assert!(validate_job_name("../app01").is_err());
        assert!(validate_job_name("app 01").is_err());
        assert!(validate_job_name("app01.lock").is_err());
    }

    #[test]
    fn test_validate_job_name_reserved() {
        assert!(validate_job_name("CON").is_err());
        assert!(validate_job_name("nul").is_err());
    }

    #[test]
    fn test_validate_remote_identity() {
        assert!(validate_remote_identity("app01", "server", "10.0.0.1").is_ok());
        assert!(validate_remote_identity("app01", "server", "db-01.internal").is_ok());
        assert!(validate_remote_identity("app01", "username", "monitor").is_ok());

        assert!(validate_remote_identity("app01", "server", "").is_err());
        assert!(validate_remote_identity("app01", "server", "-oProxyCommand=x").is_err());
        assert!(validate_remote_identity("app01", "username", "root host").is_err());
        assert!(validate_remote_identity("app01", "username", "a@b").is_err());
    }

    #[test]
    fn test_clap_validator() {
        assert!(clap_job_name_validator("app01").is_ok());
        assert!(clap_job_name_validator("../invalid").is_err());
    }
}
