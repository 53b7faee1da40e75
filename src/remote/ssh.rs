use shell_escape::escape;
use std::borrow::Cow;
use std::ffi::OsString;
use std::process::Command;
use std::time::Duration;

use super::exec::run_with_timeout;
use super::{RemoteFetcher, SshTarget};
use crate::error::{MonitorError, Result};

/// Upper bound for the ssh handshake, independent of the overall deadline
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Runs remote commands through the system `ssh` client.
///
/// Arguments go straight to `execve`; nothing passes through a local
/// shell. The remote side does run a shell, so the only free-form value
/// (a file path) is quoted for it.
#[derive(Debug, Clone)]
pub struct SshFetcher {
    program: OsString,
    timeout: Duration,
}

impl SshFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            program: OsString::from("ssh"),
            timeout,
        }
    }

    /// Use a different client binary (e.g. a wrapper script)
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.program = program.into();
        self
    }

    /// argv after the program name
    pub(crate) fn build_args(target: &SshTarget, remote_command: &[String]) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={CONNECT_TIMEOUT_SECS}"),
            "--".to_string(),
            target.destination(),
        ];
        args.extend(remote_command.iter().cloned());
        args
    }

    fn run(&self, target: &SshTarget, remote_command: &[String]) -> Result<String> {
        let args = Self::build_args(target, remote_command);
        tracing::info!(remote = %target, command = ?remote_command, "Running remote command");

        let mut command = Command::new(&self.program);
        command.args(&args);

        let fetch_error = |reason: String| MonitorError::RemoteFetch {
            target: target.to_string(),
            reason,
        };

        let output = run_with_timeout(command, self.timeout)
            .map_err(|e| fetch_error(format!("failed to start ssh: {e}")))?;

        if output.timed_out {
            return Err(fetch_error(format!(
                "timed out after {}s",
                self.timeout.as_secs()
            )));
        }
        if !output.success {
            let code = output
                .exit_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            return Err(fetch_error(format!(
                "exit status {code}: {}",
                output.stderr.trim()
            )));
        }

        tracing::debug!(remote = %target, bytes = output.stdout.len(), "Remote command finished");
        Ok(output.stdout)
    }
}

impl RemoteFetcher for SshFetcher {
    fn process_listing(&self, target: &SshTarget) -> Result<String> {
        self.run(target, &["ps".to_string(), "-ef".to_string()])
    }

    fn read_file(&self, target: &SshTarget, path: &str) -> Result<String> {
        let quoted = escape(Cow::Borrowed(path)).into_owned();
        self.run(target, &["cat".to_string(), quoted])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> SshTarget {
        SshTarget {
            user: "monitor".to_string(),
            host: "10.0.0.1".to_string(),
        }
    }

    #[test]
    fn test_build_args_process_listing() {
        let args = SshFetcher::build_args(&target(), &["ps".to_string(), "-ef".to_string()]);
        assert_eq!(
            args,
            vec![
                "-o",
                "BatchMode=yes",
                "-o",
                "ConnectTimeout=10",
                "--",
                "monitor@10.0.0.1",
                "ps",
                "-ef"
            ]
        );
    }

    #[test]
    fn test_read_file_path_is_quoted_for_remote_shell() {
        let quoted = escape(Cow::Borrowed("/var/app/q list; rm -rf x")).into_owned();
        assert_eq!(quoted, "'/var/app/q list; rm -rf x'");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_remote_fetch_error() {
        // `false` ignores its arguments and exits 1
        let fetcher = SshFetcher::new(Duration::from_secs(5)).with_program("false");
        let result = fetcher.process_listing(&target());
        assert!(matches!(
            result,
            Err(MonitorError::RemoteFetch { ref target, .. }) if target == "monitor@10.0.0.1"
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_stdout_returned_on_success() {
        // `echo` prints its argv, standing in for the remote output
        let fetcher = SshFetcher::new(Duration::from_secs(5)).with_program("echo");
        let output = fetcher.read_file(&target(), "/var/app/queues.txt").unwrap();
        assert_eq!(
            output.trim(),
            "-o BatchMode=yes -o ConnectTimeout=10 -- monitor@10.0.0.1 cat /var/app/queues.txt"
        );
    }

    #[test]
    fn test_missing_client_is_remote_fetch_error() {
        let fetcher = SshFetcher::new(Duration::from_secs(1))
            .with_program("/nonexistent/hostwatch-ssh");
        assert!(matches!(
            fetcher.process_listing(&target()),
            Err(MonitorError::RemoteFetch { .. })
        ));
    }
}
