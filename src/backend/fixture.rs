use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::JobCardError;
use crate::core::job::{Job, JobId};
use crate::core::sync::JobLookup;

/// Serves jobs from a JSON array on disk. The file is re-read on every
/// call, so edits show up on the next sync.
pub struct FixtureJobLookup {
    path: PathBuf,
}

impl FixtureJobLookup {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_jobs(&self) -> Result<Vec<Job>, JobCardError> {
        let display = self.path.display().to_string();
        let contents = fs::read_to_string(&self.path).map_err(|e| JobCardError::Fixture {
            path: display.clone(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&contents).map_err(|e| JobCardError::Decode {
            source_name: display,
            message: e.to_string(),
        })
    }
}

impl JobLookup for FixtureJobLookup {
    fn fetch_job(&self, job_id: &JobId) -> Result<Job, JobCardError> {
        self.read_jobs()?
            .into_iter()
            .find(|job| &job.job_id == job_id)
            .ok_or_else(|| JobCardError::Lookup {
                target: format!("jobs/{job_id}"),
                message: format!("not present in {}", self.path.display()),
            })
    }

    fn list_jobs(&self) -> Result<Vec<Job>, JobCardError> {
        self.read_jobs()
    }
}
