//! Debounced overlay visibility
//!
//! Short loads never flash the overlay: it shows only after loading has been
//! continuously active for the show delay, and hides once loading has been
//! idle for the hide delay.

use super::LoadingCoordinator;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

#[derive(Debug, Clone)]
pub struct LoadingIndicator {
    show_delay: Duration,
    hide_delay: Duration,
    visible: bool,
    busy_since: Option<Instant>,
    idle_since: Option<Instant>,
}

impl LoadingIndicator {
    pub fn new(show_delay: Duration, hide_delay: Duration) -> Self {
        Self {
            show_delay,
            hide_delay,
            visible: false,
            busy_since: None,
            idle_since: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Feed the aggregate loading state at `now`; returns the visibility
    pub fn observe(&mut self, busy: bool, now: Instant) -> bool {
        match (busy, self.visible) {
            (true, false) => {
                let since = *self.busy_since.get_or_insert(now);
                if now.duration_since(since) >= self.show_delay {
                    self.visible = true;
                    self.busy_since = None;
                }
            }
            (true, true) => self.idle_since = None,
            (false, true) => {
                let since = *self.idle_since.get_or_insert(now);
                if now.duration_since(since) >= self.hide_delay {
                    self.visible = false;
                    self.idle_since = None;
                }
            }
            (false, false) => self.busy_since = None,
        }
        self.visible
    }

    /// When visibility could next flip without a state change
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.visible {
            self.idle_since.map(|since| since + self.hide_delay)
        } else {
            self.busy_since.map(|since| since + self.show_delay)
        }
    }

    /// Drive an indicator from a coordinator on a background task
    ///
    /// The task ends once every receiver of the returned channel is dropped.
    pub fn spawn(self, loading: &LoadingCoordinator) -> (watch::Receiver<bool>, JoinHandle<()>) {
        let (tx, rx) = watch::channel(false);
        let busy = loading.subscribe();
        let handle = tokio::spawn(self.drive(busy, tx));
        (rx, handle)
    }

    async fn drive(mut self, mut busy: watch::Receiver<bool>, visible: watch::Sender<bool>) {
        loop {
            let now_busy = *busy.borrow_and_update();
            let shown = self.observe(now_busy, Instant::now());
            visible.send_if_modified(|current| {
                let changed = *current != shown;
                *current = shown;
                changed
            });

            let changed = match self.next_deadline() {
                Some(deadline) => tokio::select! {
                    result = busy.changed() => result,
                    _ = tokio::time::sleep_until(deadline) => Ok(()),
                    _ = visible.closed() => break,
                },
                None => tokio::select! {
                    result = busy.changed() => result,
                    _ = visible.closed() => break,
                },
            };

            if changed.is_err() {
                break;
            }
        }
        log::debug!("Loading indicator stopped");
    }
}
