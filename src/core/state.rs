use crate::core::intent::Intent;
use crate::core::job::Job;

/// Snapshot of everything a job card displays. Replaced wholesale on
/// every transition; `state_intent` is only ever written together with
/// `job`.
#[derive(Debug, Clone, PartialEq)]
pub struct CardState {
    job: Job,
    state_intent: Intent,
    pub syncing: bool,
    pub info_open: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardEvent {
    PropsUpdated(Job),
    SyncBegin,
    SyncSucceeded(Job),
    SyncFailed,
    ToggleInfo,
}

impl CardState {
    pub fn new(job: Job) -> Self {
        Self {
            state_intent: job.state_intent(),
            job,
            syncing: false,
            info_open: false,
        }
    }

    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn state_intent(&self) -> Intent {
        self.state_intent
    }

    fn with_job(&self, job: Job) -> Self {
        Self {
            state_intent: job.state_intent(),
            job,
            ..self.clone()
        }
    }
}

pub fn reduce(state: &CardState, event: CardEvent) -> CardState {
    match event {
        CardEvent::PropsUpdated(job) => state.with_job(job),
        CardEvent::SyncBegin => CardState {
            syncing: true,
            ..state.clone()
        },
        CardEvent::SyncSucceeded(job) => CardState {
            syncing: false,
            ..state.with_job(job)
        },
        CardEvent::SyncFailed => CardState {
            syncing: false,
            ..state.clone()
        },
        CardEvent::ToggleInfo => CardState {
            info_open: !state.info_open,
            ..state.clone()
        },
    }
}
