// Cooperative shutdown flag shared by the input thread and the control loop

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;

#[derive(Debug)]
struct Inner {
    running: AtomicBool,
    stopped: Notify,
}

/// Cleared once, by whoever sees the quit key or interrupt first.
/// Async waiters are woken instead of polling the flag.
#[derive(Debug, Clone)]
pub struct RunFlag {
    inner: Arc<Inner>,
}

impl Default for RunFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl RunFlag {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                running: AtomicBool::new(true),
                stopped: Notify::new(),
            }),
        }
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::Acquire)
    }

    /// Returns true if this call was the one that stopped the flag
    pub fn request_stop(&self) -> bool {
        let was_running = self.inner.running.swap(false, Ordering::AcqRel);
        if was_running {
            // notify_one keeps a permit if nobody is waiting yet
            self.inner.stopped.notify_one();
        }
        was_running
    }

    /// Resolves once a stop has been requested
    pub async fn stopped(&self) {
        let notified = self.inner.stopped.notified();
        if !self.is_running() {
            return;
        }
        notified.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_stop_is_reported_once() {
        let flag = RunFlag::new();
        assert!(flag.is_running());
        assert!(flag.request_stop());
        assert!(!flag.request_stop());
        assert!(!flag.clone().is_running());
    }

    #[tokio::test]
    async fn test_stopped_wakes_waiter() {
        let flag = RunFlag::new();
        let waiter = {
            let flag = flag.clone();
            tokio::spawn(async move { flag.stopped().await })
        };

        tokio::time::sleep(Duration::from_millis(10)).await;
        std::thread::spawn(move || flag.request_stop())
            .join()
            .unwrap();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter not woken")
            .unwrap();
    }

    #[tokio::test]
    async fn test_stopped_returns_after_stop() {
        let flag = RunFlag::new();
        flag.request_stop();
        flag.stopped().await;
    }
}
