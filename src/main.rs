use clap::Parser;
use hostwatch::commands::{preflight, run};
use hostwatch::config::MonitorConfig;
use hostwatch::error::EXIT_STRUCTURAL;
use hostwatch::fs::HomeDir;
use hostwatch::logging::{init_logging, init_stderr_logging};
use hostwatch::remote::SshFetcher;
use hostwatch::sink::HttpMetricSink;
use hostwatch::validation::clap_job_name_validator;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "hostwatch")]
#[command(about = "Check remote services and queues, push status metrics", long_about = None)]
#[command(version)]
struct Cli {
    /// Job name under `functions` in the configuration
    #[arg(value_parser = clap_job_name_validator)]
    job: Option<String>,

    /// Base directory holding config.yaml, logs/, locks/ and outfile/
    /// (default: directory of the executable)
    #[arg(long)]
    home: Option<PathBuf>,

    /// Configuration file (default: <home>/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Check prerequisites and configuration, then exit
    #[arg(long)]
    preflight: bool,
}

fn main() -> ExitCode {
    // Usage errors are structural failures, not clap's default exit code 2
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { EXIT_STRUCTURAL } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    let home = match cli.home {
        Some(dir) => HomeDir::new(dir),
        None => match HomeDir::from_current_exe() {
            Ok(home) => home,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::from(EXIT_STRUCTURAL);
            }
        },
    };
    let config_path = cli.config.unwrap_or_else(|| home.default_config_path());

    if cli.preflight {
        init_stderr_logging("warn");
        return match preflight::execute(&home, &config_path) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{e:#}");
                ExitCode::from(EXIT_STRUCTURAL)
            }
        };
    }

    let config = MonitorConfig::load(&config_path);
    let level = config
        .as_ref()
        .map(|c| c.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());

    // Held until exit so buffered file logs are flushed
    let _guard = match home.ensure().and_then(|()| init_logging(&home.logs_dir(), &level)) {
        Ok(guard) => guard,
        Err(e) => {
            init_stderr_logging(&level);
            tracing::error!(error = %e, "File logging unavailable");
            return ExitCode::from(EXIT_STRUCTURAL);
        }
    };

    let Some(job_name) = cli.job else {
        tracing::error!("Please specify the job name as an argument");
        return ExitCode::from(EXIT_STRUCTURAL);
    };

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Error loading configuration");
            return ExitCode::from(e.exit_code());
        }
    };

    let sink = match HttpMetricSink::new(&config.sink_settings()) {
        Ok(sink) => sink,
        Err(e) => {
            tracing::error!(error = %e, "Metric sink unavailable");
            return ExitCode::from(e.exit_code());
        }
    };
    let fetcher = SshFetcher::new(config.ssh_timeout());

    match run::execute(&home, &config, &job_name, &fetcher, &sink) {
        Ok(outcome) => {
            tracing::info!(job = %job_name, ?outcome, "Run finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(job = %job_name, error = %e, "Run failed");
            ExitCode::from(e.exit_code())
        }
    }
}
