//! One-writer/one-reader stop flag between the supervisor and a task.

use tokio::sync::watch;
use tokio::time::{sleep_until, Instant};

/// Create a connected stop handle (writer) and signal (reader).
pub fn stop_pair() -> (StopHandle, StopSignal) {
    let (tx, rx) = watch::channel(false);
    (StopHandle { tx }, StopSignal { rx })
}

/// Writer side, held by the supervisor.
#[derive(Debug)]
pub struct StopHandle {
    tx: watch::Sender<bool>,
}

impl StopHandle {
    /// Set the flag. Returns `true` only for the call that actually set it.
    pub fn stop(&self) -> bool {
        !self.tx.send_replace(true)
    }

    pub fn is_stopped(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Reader side, owned by the running task.
///
/// A dropped [`StopHandle`] counts as a stop request.
#[derive(Debug)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow() || self.rx.has_changed().is_err()
    }

    /// Resolve once stop has been requested. Cancel-safe.
    pub async fn stopped(&mut self) {
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }

    /// Sleep until `deadline` unless stopped first.
    ///
    /// Returns `true` when the deadline was reached and no stop is recorded.
    pub async fn sleep_until(&mut self, deadline: Instant) -> bool {
        tokio::select! {
            biased;
            _ = self.stopped() => false,
            _ = sleep_until(deadline) => !self.is_stopped(),
        }
    }
}
