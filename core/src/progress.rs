//! Worker-to-presentation progress signal.
//!
//! Each workflow owns one `ProgressPublisher`; the presentation side holds
//! the matching `watch::Receiver` and only ever reads. The published
//! fraction is monotone non-decreasing for the lifetime of the workflow,
//! so a progress bar can track it directly.

use tokio::sync::watch;

/// Snapshot of workflow state for the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusUpdate {
    pub message: String,
    pub fraction: f64,
}

impl Default for StatusUpdate {
    fn default() -> Self {
        Self {
            message: "idle".to_string(),
            fraction: 0.0,
        }
    }
}

/// Sending half of the progress signal, held by the worker.
pub struct ProgressPublisher {
    tx: watch::Sender<StatusUpdate>,
    high_water: f64,
}

impl ProgressPublisher {
    /// Creates a publisher/receiver pair starting at the idle state.
    pub fn channel() -> (Self, watch::Receiver<StatusUpdate>) {
        let (tx, rx) = watch::channel(StatusUpdate::default());
        (
            Self {
                tx,
                high_water: 0.0,
            },
            rx,
        )
    }

    /// Publishes a status message with a progress fraction in [0, 1].
    /// Fractions below the previously published value are clamped up so
    /// observers never see progress run backwards.
    pub fn publish(&mut self, message: impl Into<String>, fraction: f64) {
        let clamped = fraction.clamp(0.0, 1.0).max(self.high_water);
        self.high_water = clamped;
        // Receivers may all be gone (headless run); dropping the update
        // is fine then.
        let _ = self.tx.send(StatusUpdate {
            message: message.into(),
            fraction: clamped,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receiver_starts_idle() {
        let (_publisher, rx) = ProgressPublisher::channel();
        let status = rx.borrow();
        assert_eq!(status.fraction, 0.0);
        assert_eq!(status.message, "idle");
    }

    #[test]
    fn fraction_never_decreases() {
        let (mut publisher, rx) = ProgressPublisher::channel();
        publisher.publish("halfway", 0.5);
        publisher.publish("stale update", 0.2);
        let status = rx.borrow();
        assert_eq!(status.fraction, 0.5);
        assert_eq!(status.message, "stale update");
    }

    #[test]
    fn fraction_is_clamped_into_unit_interval() {
        let (mut publisher, rx) = ProgressPublisher::channel();
        publisher.publish("overshoot", 1.7);
        assert_eq!(rx.borrow().fraction, 1.0);
    }
}
