use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::core::intent::Intent;
use crate::core::sync::Notifier;

const MAX_VISIBLE: usize = 3;
/// Rows one toast occupies, borders included.
pub const TOAST_HEIGHT: u16 = 3;

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub intent: Intent,
    first_shown: Option<Instant>,
}

/// Notification queue drawn in the corner of the dashboard. A toast is
/// only expired after it has been on screen for `min_display`.
#[derive(Debug)]
pub struct Toaster {
    queue: VecDeque<Toast>,
    min_display: Duration,
}

impl Toaster {
    pub fn new(min_display: Duration) -> Self {
        Self {
            queue: VecDeque::new(),
            min_display,
        }
    }

    /// Toasts that fit in `height` rows, capped at the visible maximum.
    pub fn slots_for(height: u16) -> usize {
        usize::from(height / TOAST_HEIGHT).min(MAX_VISIBLE)
    }

    /// Drops toasts that have been shown long enough and stamps the
    /// `slots` oldest ones, which the next frame draws. Call once per
    /// frame, before rendering, with the slot count of that frame.
    pub fn prepare_frame(&mut self, now: Instant, slots: usize) {
        let min_display = self.min_display;
        self.queue.retain(|toast| match toast.first_shown {
            Some(shown) => now.saturating_duration_since(shown) < min_display,
            None => true,
        });
        for toast in self.queue.iter_mut().take(slots.min(MAX_VISIBLE)) {
            toast.first_shown.get_or_insert(now);
        }
    }

    /// Toasts stamped by `prepare_frame`, oldest first.
    pub fn visible(&self) -> impl Iterator<Item = &Toast> {
        self.queue
            .iter()
            .take(MAX_VISIBLE)
            .take_while(|toast| toast.first_shown.is_some())
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl Notifier for Toaster {
    fn notify(&mut self, message: &str, intent: Intent) {
        match intent {
            Intent::Danger => tracing::warn!(toast = message, "notification"),
            _ => tracing::info!(toast = message, "notification"),
        }
        self.queue.push_back(Toast {
            message: message.to_string(),
            intent,
            first_shown: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_survives_until_shown_for_min_display() {
        let mut toaster = Toaster::new(Duration::from_secs(3));
        let start = Instant::now();
        toaster.notify("Successfully synced Job: 7", Intent::Success);

        toaster.prepare_frame(start + Duration::from_secs(60), MAX_VISIBLE);
        assert_eq!(toaster.len(), 1);

        toaster.prepare_frame(start + Duration::from_secs(62), MAX_VISIBLE);
        assert_eq!(toaster.len(), 1);

        toaster.prepare_frame(start + Duration::from_secs(63), MAX_VISIBLE);
        assert_eq!(toaster.len(), 0);
    }

    #[test]
    fn queued_toasts_wait_for_a_visible_slot() {
        let mut toaster = Toaster::new(Duration::from_secs(1));
        let start = Instant::now();
        for id in 0..5 {
            toaster.notify(&format!("Failed to sync Job: {id}"), Intent::Danger);
        }

        toaster.prepare_frame(start, MAX_VISIBLE);
        assert_eq!(toaster.visible().count(), MAX_VISIBLE);

        toaster.prepare_frame(start + Duration::from_secs(1), MAX_VISIBLE);
        let remaining: Vec<&str> = toaster.visible().map(|t| t.message.as_str()).collect();
        assert_eq!(remaining, ["Failed to sync Job: 3", "Failed to sync Job: 4"]);

        toaster.prepare_frame(start + Duration::from_secs(2), MAX_VISIBLE);
        assert_eq!(toaster.len(), 0);
    }

    #[test]
    fn toasts_without_a_slot_are_not_stamped() {
        let mut toaster = Toaster::new(Duration::from_secs(3));
        let start = Instant::now();
        for id in 0..3 {
            toaster.notify(&format!("Failed to sync Job: {id}"), Intent::Danger);
        }

        toaster.prepare_frame(start, 1);
        assert_eq!(toaster.visible().count(), 1);

        toaster.prepare_frame(start + Duration::from_secs(3), 1);
        let shown: Vec<&str> = toaster.visible().map(|t| t.message.as_str()).collect();
        assert_eq!(shown, ["Failed to sync Job: 1"]);
        assert_eq!(toaster.len(), 2);

        toaster.prepare_frame(start + Duration::from_secs(6), 0);
        assert_eq!(toaster.visible().count(), 0);
        assert_eq!(toaster.len(), 1);
    }

    #[test]
    fn slots_follow_available_height() {
        assert_eq!(Toaster::slots_for(0), 0);
        assert_eq!(Toaster::slots_for(5), 1);
        assert_eq!(Toaster::slots_for(6), 2);
        assert_eq!(Toaster::slots_for(40), MAX_VISIBLE);
    }
}
