use crate::core::card_view::CardView;
use crate::core::intent::Intent;
use crate::core::job::Job;
use crate::core::state::{reduce, CardEvent, CardState};
use crate::core::sync::{CardKey, Notifier, SyncCompletion, SyncRequest};

/// Interactive surfaces of a job row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The row itself, including the job name link.
    Row,
    SyncButton,
    ToggleCaret,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CardEffect {
    Sync(SyncRequest),
    Navigate(String),
}

struct ClickEvent {
    target: ClickTarget,
    propagation_stopped: bool,
}

impl ClickEvent {
    fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

/// One mounted job row: the last props received from the list, the
/// current state snapshot and the view derived from it.
#[derive(Debug)]
pub struct JobCard {
    key: CardKey,
    props: Job,
    state: CardState,
    view: CardView,
}

impl JobCard {
    pub fn mount(key: CardKey, job: Job) -> Self {
        let state = CardState::new(job.clone());
        let view = CardView::from_state(&state);
        Self {
            key,
            props: job,
            state,
            view,
        }
    }

    pub fn key(&self) -> CardKey {
        self.key
    }

    pub fn state(&self) -> &CardState {
        &self.state
    }

    pub fn view(&self) -> &CardView {
        &self.view
    }

    fn apply(&mut self, event: CardEvent) {
        self.state = reduce(&self.state, event);
        self.view = CardView::from_state(&self.state);
    }

    /// Takes a job pushed by the list. Only a job that differs from the
    /// previous push reaches the reducer. Returns whether it did.
    pub fn receive_props(&mut self, job: Job) -> bool {
        if job == self.props {
            return false;
        }
        self.props = job.clone();
        self.apply(CardEvent::PropsUpdated(job));
        true
    }

    /// Marks the card as syncing and returns the fetch to issue. A card
    /// that is already syncing still issues another request.
    pub fn begin_sync(&mut self) -> SyncRequest {
        let request = SyncRequest {
            key: self.key,
            job_id: self.state.job().job_id.clone(),
        };
        if self.state.syncing {
            tracing::debug!(job_id = %request.job_id, "sync requested while another is in flight");
        }
        self.apply(CardEvent::SyncBegin);
        request
    }

    /// Applies a finished fetch. The result is applied whichever job is
    /// on screen now; the notification names the job that was requested.
    pub fn resolve_sync(&mut self, completion: SyncCompletion, notifier: &mut dyn Notifier) {
        let job_id = completion.request.job_id;
        match completion.result {
            Ok(job) => {
                tracing::info!(%job_id, state = ?job.state, "job synced");
                self.apply(CardEvent::SyncSucceeded(job));
                notifier.notify(&format!("Successfully synced Job: {job_id}"), Intent::Success);
            }
            Err(err) => {
                tracing::warn!(%job_id, error = %err, "job sync failed");
                self.apply(CardEvent::SyncFailed);
                notifier.notify(&format!("Failed to sync Job: {job_id}"), Intent::Danger);
            }
        }
    }

    pub fn toggle_info(&mut self) {
        self.apply(CardEvent::ToggleInfo);
    }

    /// Dispatches a click on `target`, then lets it bubble to the row
    /// unless a handler stopped it. The row navigates.
    pub fn click(&mut self, target: ClickTarget) -> Vec<CardEffect> {
        let mut event = ClickEvent {
            target,
            propagation_stopped: false,
        };
        let mut effects = Vec::new();

        match event.target {
            ClickTarget::SyncButton => {
                event.stop_propagation();
                effects.push(CardEffect::Sync(self.begin_sync()));
            }
            ClickTarget::ToggleCaret => {
                event.stop_propagation();
                self.toggle_info();
            }
            ClickTarget::Row => {}
        }

        if !event.propagation_stopped {
            effects.push(CardEffect::Navigate(self.view.route.clone()));
        }
        effects
    }
}
