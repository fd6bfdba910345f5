//! Shutdown signalling and the health lifecycle.
//!
//! Health state lives in an `ArcSwap` so probes read it without a lock; a
//! watch channel carries the shutdown signal to however many listeners
//! subscribe before or after the trigger.

use std::sync::Arc;

use arc_swap::ArcSwap;
use tokio::sync::watch;

/// Where the server is in its lifecycle. Walks
/// Starting -> Ready -> Draining -> Stopped, never backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    /// Still wiring up; readiness probes fail.
    Starting,
    /// Accepting requests.
    Ready,
    /// Shutdown triggered; finishing in-flight requests, accepting none.
    Draining,
    /// Drained and done.
    Stopped,
}

impl HealthState {
    /// Lowercase state name as reported by the health endpoint.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Starting => "starting",
            Self::Ready => "ready",
            Self::Draining => "draining",
            Self::Stopped => "stopped",
        }
    }
}

/// Owns the health state and the shutdown signal.
///
/// Probes read `health_state()`; the serve loop selects on a receiver from
/// `shutdown_receiver()` and calls `set_stopped()` once draining finishes.
#[derive(Debug)]
pub struct ShutdownController {
    signal: watch::Sender<bool>,
    health: Arc<ArcSwap<HealthState>>,
}

impl ShutdownController {
    /// A fresh controller in `Starting`.
    #[must_use]
    pub fn new() -> Self {
        let (signal, _) = watch::channel(false);
        Self {
            signal,
            health: Arc::new(ArcSwap::from_pointee(HealthState::Starting)),
        }
    }

    /// Marks the server ready to take traffic.
    pub fn set_ready(&self) {
        self.health.store(Arc::new(HealthState::Ready));
    }

    /// Marks the server fully stopped after draining.
    pub fn set_stopped(&self) {
        self.health.store(Arc::new(HealthState::Stopped));
    }

    /// A receiver that flips to `true` once shutdown is triggered. Receivers
    /// subscribed after the trigger still observe the flag.
    #[must_use]
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.signal.subscribe()
    }

    /// Moves to `Draining` and wakes every shutdown receiver.
    pub fn trigger_shutdown(&self) {
        self.health.store(Arc::new(HealthState::Draining));
        // A send error just means nobody is listening yet.
        let _ = self.signal.send(true);
    }

    /// The state as of this instant.
    #[must_use]
    pub fn health_state(&self) -> HealthState {
        **self.health.load()
    }
}

impl Default for ShutdownController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_starts_in_starting() {
        let controller = ShutdownController::new();
        assert_eq!(controller.health_state(), HealthState::Starting);
    }

    #[test]
    fn health_state_walks_the_full_machine() {
        let controller = ShutdownController::new();
        assert_eq!(controller.health_state(), HealthState::Starting);

        controller.set_ready();
        assert_eq!(controller.health_state(), HealthState::Ready);

        controller.trigger_shutdown();
        assert_eq!(controller.health_state(), HealthState::Draining);

        controller.set_stopped();
        assert_eq!(controller.health_state(), HealthState::Stopped);
    }

    #[test]
    fn as_str_names_every_state() {
        assert_eq!(HealthState::Starting.as_str(), "starting");
        assert_eq!(HealthState::Ready.as_str(), "ready");
        assert_eq!(HealthState::Draining.as_str(), "draining");
        assert_eq!(HealthState::Stopped.as_str(), "stopped");
    }

    #[tokio::test]
    async fn trigger_wakes_existing_receivers() {
        let controller = ShutdownController::new();
        let mut rx = controller.shutdown_receiver();
        assert!(!*rx.borrow());

        controller.trigger_shutdown();

        rx.changed().await.unwrap();
        assert!(*rx.borrow());
    }

    #[tokio::test]
    async fn receiver_subscribed_after_trigger_sees_the_flag() {
        let controller = ShutdownController::new();
        controller.trigger_shutdown();

        let mut rx = controller.shutdown_receiver();
        let seen = rx.wait_for(|triggered| *triggered).await.unwrap();
        assert!(*seen);
    }
}
