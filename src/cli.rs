use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use crate::backend::{FixtureJobLookup, HttpJobLookup};
use crate::core::error::JobCardError;
use crate::core::sync::JobLookup;

#[derive(Debug, Parser)]
#[command(name = "jobcard", version, about = "Terminal dashboard for cluster jobs")]
pub struct Cli {
    /// Base URL of the dashboard REST API
    #[arg(
        long,
        env = "JOBCARD_BACKEND",
        value_name = "URL",
        default_value = "http://localhost:8080"
    )]
    pub backend: String,
    /// Serve jobs from a JSON array on disk instead of the backend
    #[arg(long = "jobs-file", value_name = "FILE")]
    pub jobs_file: Option<PathBuf>,
    /// Per-request timeout for backend calls; unbounded when omitted
    #[arg(long = "request-timeout", value_name = "SECS")]
    pub request_timeout: Option<u64>,
    #[arg(long = "log-file", value_name = "FILE", default_value = "jobcard.log")]
    pub log_file: PathBuf,
    /// Minimum time a notification stays on screen
    #[arg(long = "toast-secs", value_name = "SECS", default_value_t = 3)]
    pub toast_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupSource {
    Http {
        base_url: String,
        timeout: Option<Duration>,
    },
    Fixture(PathBuf),
}

impl LookupSource {
    pub fn describe(&self) -> String {
        match self {
            LookupSource::Http { base_url, .. } => base_url.clone(),
            LookupSource::Fixture(path) => format!("file://{}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: LookupSource,
    pub log_file: PathBuf,
    pub toast_duration: Duration,
}

impl From<Cli> for AppConfig {
    fn from(cli: Cli) -> Self {
        let source = match cli.jobs_file {
            Some(path) => LookupSource::Fixture(path),
            None => LookupSource::Http {
                base_url: cli.backend,
                timeout: cli.request_timeout.map(Duration::from_secs),
            },
        };
        Self {
            source,
            log_file: cli.log_file,
            toast_duration: Duration::from_secs(cli.toast_secs),
        }
    }
}

impl AppConfig {
    pub fn build_lookup(&self) -> Result<Arc<dyn JobLookup>, JobCardError> {
        match &self.source {
            LookupSource::Http { base_url, timeout } => {
                tracing::info!(%base_url, ?timeout, "using http backend");
                Ok(Arc::new(HttpJobLookup::new(base_url, *timeout)?))
            }
            LookupSource::Fixture(path) => {
                let lookup = FixtureJobLookup::new(path);
                tracing::info!(path = %lookup.path().display(), "using fixture file");
                Ok(Arc::new(lookup))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_url() {
        let cli = Cli::try_parse_from(["jobcard", "--backend", "http://dash:8080"]).unwrap();
        let config = AppConfig::from(cli);
        assert_eq!(
            config.source,
            LookupSource::Http {
                base_url: "http://dash:8080".to_string(),
                timeout: None,
            }
        );
        assert_eq!(config.log_file, PathBuf::from("jobcard.log"));
        assert_eq!(config.toast_duration, Duration::from_secs(3));
    }

    #[test]
    fn jobs_file_overrides_backend() {
        let cli = Cli::try_parse_from([
            "jobcard",
            "--jobs-file",
            "jobs.json",
            "--request-timeout",
            "10",
            "--toast-secs",
            "5",
        ])
        .unwrap();
        let config = AppConfig::from(cli);
        assert_eq!(config.source, LookupSource::Fixture(PathBuf::from("jobs.json")));
        assert_eq!(config.source.describe(), "file://jobs.json");
        assert_eq!(config.toast_duration, Duration::from_secs(5));
    }

    #[test]
    fn request_timeout_is_seconds() {
        let cli = Cli::try_parse_from([
            "jobcard",
            "--backend",
            "http://dash:8080",
            "--request-timeout",
            "10",
        ])
        .unwrap();
        let LookupSource::Http { timeout, .. } = AppConfig::from(cli).source else {
            panic!("expected http source");
        };
        assert_eq!(timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn rejects_non_numeric_timeout() {
        assert!(Cli::try_parse_from(["jobcard", "--request-timeout", "soon"]).is_err());
    }
}
