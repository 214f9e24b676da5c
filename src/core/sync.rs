use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::core::error::JobCardError;
use crate::core::intent::Intent;
use crate::core::job::{Job, JobId};

/// Identifies one mounted card instance for routing fetch results.
pub type CardKey = u64;

/// Backend that answers job lookups. Calls block; callers run them off
/// the UI thread.
pub trait JobLookup: Send + Sync {
    fn fetch_job(&self, job_id: &JobId) -> Result<Job, JobCardError>;
    fn list_jobs(&self) -> Result<Vec<Job>, JobCardError>;
}

/// Fire-and-forget user notification.
pub trait Notifier {
    fn notify(&mut self, message: &str, intent: Intent);
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyncRequest {
    pub key: CardKey,
    pub job_id: JobId,
}

#[derive(Debug)]
pub struct SyncCompletion {
    pub request: SyncRequest,
    pub result: Result<Job, JobCardError>,
}

/// Issues exactly one fetch for `request` on a worker thread and posts
/// the outcome to `tx`. If the receiver is gone the outcome is dropped.
pub fn spawn_fetch(
    lookup: Arc<dyn JobLookup>,
    request: SyncRequest,
    tx: Sender<SyncCompletion>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        tracing::debug!(job_id = %request.job_id, key = request.key, "fetching job");
        let result = lookup.fetch_job(&request.job_id);
        if let Err(err) = &result {
            tracing::warn!(job_id = %request.job_id, error = %err, "job fetch failed");
        }
        let _ = tx.send(SyncCompletion { request, result });
    })
}

/// Loads the full job list on a worker thread.
pub fn spawn_list(
    lookup: Arc<dyn JobLookup>,
    tx: Sender<Result<Vec<Job>, JobCardError>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let result = lookup.list_jobs();
        match &result {
            Ok(jobs) => tracing::debug!(count = jobs.len(), "job list loaded"),
            Err(err) => tracing::warn!(error = %err, "job list failed"),
        }
        let _ = tx.send(result);
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::sync::mpsc;
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;
    use crate::core::job::tests::sample_job;

    /// In-memory lookup: answers from a map and counts fetches.
    #[derive(Default)]
    pub(crate) struct MapLookup {
        pub(crate) jobs: Mutex<HashMap<JobId, Job>>,
        pub(crate) fetches: Mutex<Vec<JobId>>,
    }

    impl MapLookup {
        pub(crate) fn with(jobs: Vec<Job>) -> Self {
            let lookup = MapLookup::default();
            {
                let mut map = lookup.jobs.lock().unwrap();
                for job in jobs {
                    map.insert(job.job_id.clone(), job);
                }
            }
            lookup
        }
    }

    impl JobLookup for MapLookup {
        fn fetch_job(&self, job_id: &JobId) -> Result<Job, JobCardError> {
            self.fetches.lock().unwrap().push(job_id.clone());
            self.jobs
                .lock()
                .unwrap()
                .get(job_id)
                .cloned()
                .ok_or_else(|| JobCardError::Status {
                    target: format!("jobs/{job_id}"),
                    status: 404,
                })
        }

        fn list_jobs(&self) -> Result<Vec<Job>, JobCardError> {
            let mut jobs: Vec<Job> = self.jobs.lock().unwrap().values().cloned().collect();
            jobs.sort_by_key(|job| job.job_id.to_string());
            Ok(jobs)
        }
    }

    /// Lookup that blocks every fetch until the test releases it.
    pub(crate) struct GatedLookup {
        pub(crate) gate: Mutex<mpsc::Receiver<Result<Job, JobCardError>>>,
    }

    impl JobLookup for GatedLookup {
        fn fetch_job(&self, job_id: &JobId) -> Result<Job, JobCardError> {
            self.gate
                .lock()
                .unwrap()
                .recv()
                .unwrap_or_else(|_| {
                    Err(JobCardError::Lookup {
                        target: job_id.to_string(),
                        message: "gate closed".to_string(),
                    })
                })
        }

        fn list_jobs(&self) -> Result<Vec<Job>, JobCardError> {
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    pub(crate) struct RecordingNotifier {
        pub(crate) messages: Vec<(String, Intent)>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&mut self, message: &str, intent: Intent) {
            self.messages.push((message.to_string(), intent));
        }
    }

    #[test]
    fn spawn_fetch_posts_one_completion() {
        let lookup = Arc::new(MapLookup::with(vec![sample_job(7, "COMPLETED")]));
        let (tx, rx) = mpsc::channel();
        let request = SyncRequest {
            key: 3,
            job_id: JobId::Number(7),
        };

        spawn_fetch(lookup.clone(), request.clone(), tx)
            .join()
            .unwrap();

        let completion = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert_eq!(completion.request, request);
        assert_eq!(completion.result.unwrap().state.as_deref(), Some("COMPLETED"));
        assert!(rx.try_recv().is_err());
        assert_eq!(lookup.fetches.lock().unwrap().len(), 1);
    }

    #[test]
    fn spawn_fetch_reports_failure() {
        let lookup = Arc::new(MapLookup::default());
        let (tx, rx) = mpsc::channel();
        let request = SyncRequest {
            key: 1,
            job_id: JobId::Number(5),
        };

        spawn_fetch(lookup, request, tx).join().unwrap();

        let completion = rx.recv_timeout(Duration::from_secs(1)).unwrap();
        assert!(matches!(
            completion.result,
            Err(JobCardError::Status { status: 404, .. })
        ));
    }

    #[test]
    fn spawn_list_returns_jobs() {
        let lookup = Arc::new(MapLookup::with(vec![
            sample_job(1, "STARTED"),
            sample_job(2, "FAILED"),
        ]));
        let (tx, rx) = mpsc::channel();
        spawn_list(lookup, tx).join().unwrap();
        let jobs = rx.recv_timeout(Duration::from_secs(1)).unwrap().unwrap();
        assert_eq!(jobs.len(), 2);
    }
}
