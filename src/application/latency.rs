// Simulated "thinking" latency for the scripted assistant
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayOutcome {
    Elapsed,
    Cancelled,
}

/// Handle that can cut a pending delay short
#[derive(Debug, Clone)]
pub struct CancelHandle {
    notify: Arc<Notify>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        // notify_one stores a permit, so cancelling before the wait starts still counts
        self.notify.notify_one();
    }
}

/// A single in-flight delay
#[derive(Debug)]
pub struct PendingDelay {
    duration: Duration,
    notify: Arc<Notify>,
}

impl PendingDelay {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            notify: Arc::new(Notify::new()),
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            notify: self.notify.clone(),
        }
    }

    pub async fn wait(self) -> DelayOutcome {
        tokio::select! {
            _ = tokio::time::sleep(self.duration) => DelayOutcome::Elapsed,
            _ = self.notify.notified() => DelayOutcome::Cancelled,
        }
    }
}

/// Fixed per-intent latencies used by the demo session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedLatency {
    pub analyze: Duration,
    pub forecast: Duration,
}

impl SimulatedLatency {
    pub fn new(analyze: Duration, forecast: Duration) -> Self {
        Self { analyze, forecast }
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }
}

impl Default for SimulatedLatency {
    fn default() -> Self {
        Self::new(Duration::from_millis(1200), Duration::from_millis(1500))
    }
}
