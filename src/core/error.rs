use thiserror::Error;

#[derive(Debug, Error)]
pub enum JobCardError {
    #[error("terminal error: {message}")]
    Terminal { message: String },
    #[error("job lookup failed for {target}: {message}")]
    Lookup { target: String, message: String },
    #[error("backend returned {status} for {target}")]
    Status { target: String, status: u16 },
    #[error("failed to decode job data from {source_name}: {message}")]
    Decode {
        source_name: String,
        message: String,
    },
    #[error("failed to read fixture file {path}: {message}")]
    Fixture { path: String, message: String },
    #[error("failed to set up logging: {message}")]
    Logging { message: String },
}

impl JobCardError {
    pub fn terminal(err: impl std::fmt::Display) -> Self {
        JobCardError::Terminal {
            message: err.to_string(),
        }
    }
}
