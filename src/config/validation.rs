//! Whole-document checks used by `--preflight`

use super::types::MonitorConfig;

/// Validation problem with context
#[derive(Debug)]
pub struct ValidationError {
    pub message: String,
    pub job: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(job) = &self.job {
            write!(f, "Job '{}': {}", job, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate the shared settings and every configured job
pub fn validate(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.env_uri.trim().is_empty() {
        errors.push(ValidationError {
            message: "ENV_URI cannot be empty".to_string(),
            job: None,
        });
    }

    if config.api_token.trim().is_empty() {
        errors.push(ValidationError {
            message: "Api_Token cannot be empty".to_string(),
            job: None,
        });
    }

    if config.functions.is_empty() {
        errors.push(ValidationError {
            message: "No functions defined".to_string(),
            job: None,
        });
    }

    if config.functions.len() != config.job_names().len() {
        errors.push(ValidationError {
            message: "Function names must be strings".to_string(),
            job: None,
        });
    }

    for name in config.job_names() {
        if let Err(e) = crate::validation::validate_job_name(&name) {
            errors.push(ValidationError {
                message: e.to_string(),
                job: Some(name.clone()),
            });
            continue;
        }
        if let Err(e) = config.resolve(&name) {
            errors.push(ValidationError {
                message: e.to_string(),
                job: Some(name),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config_passes() {
        let config = MonitorConfig::from_yaml(
            r#"
ENV_URI: https://x
Api_Token: t
functions:
  app01:
    kind: service
    server: h
    username: u
    bankname: b
"#,
        )
        .unwrap();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_settings_and_no_functions() {
        let config = MonitorConfig::from_yaml("ENV_URI: ''\nApi_Token: ' '\n").unwrap();
        let errors = validate(&config).unwrap_err();
        let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "ENV_URI cannot be empty",
                "Api_Token cannot be empty",
                "No functions defined",
            ]
        );
    }

    #[test]
    fn test_broken_job_reported_with_name() {
        let config = MonitorConfig::from_yaml(
            r#"
ENV_URI: https://x
Api_Token: t
functions:
  mq01:
    kind: queue
    server: h
    username: u
    bankname: b
"#,
        )
        .unwrap();
        let errors = validate(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].job.as_deref(), Some("mq01"));
        assert!(errors[0].to_string().contains("remote_input_file"));
    }
}
