//! [`Delay`] implementations.
//!
//! [`ThreadDelay`] blocks the calling thread and is what the binary uses.
//! [`RecordingDelay`] returns immediately and remembers every requested
//! duration so tests can assert on timing without waiting for it.

use std::sync::Mutex;
use std::time::Duration;

use crate::application::translate_actions::Delay;

/// Sleeps the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadDelay;

impl Delay for ThreadDelay {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Records requested delays without sleeping.
#[derive(Debug, Default)]
pub struct RecordingDelay {
    /// Every duration passed to `sleep`, in order.
    pub delays: Mutex<Vec<Duration>>,
}

impl RecordingDelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the recorded delays.
    pub fn recorded(&self) -> Vec<Duration> {
        self.delays
            .lock()
            .map(|delays| delays.clone())
            .unwrap_or_default()
    }
}

impl Delay for RecordingDelay {
    fn sleep(&self, duration: Duration) {
        if let Ok(mut delays) = self.delays.lock() {
            delays.push(duration);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_delay_keeps_order() {
        let delay = RecordingDelay::new();
        delay.sleep(Duration::from_millis(5));
        delay.sleep(Duration::from_millis(1));
        assert_eq!(
            delay.recorded(),
            vec![Duration::from_millis(5), Duration::from_millis(1)]
        );
    }

    #[test]
    fn test_thread_delay_waits_at_least_the_duration() {
        let start = std::time::Instant::now();
        ThreadDelay.sleep(Duration::from_millis(10));
        assert!(start.elapsed() >= Duration::from_millis(10));
    }
}
