use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Periodic callback on the current tokio runtime.
///
/// At most one timer task exists per `PollTimer`: `start` while running is a
/// no-op. The first tick fires one full interval after `start`. Dropping the
/// timer cancels it.
#[derive(Debug)]
pub struct PollTimer {
    interval: Duration,
    handle: Option<JoinHandle<()>>,
}

impl PollTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(MIN_INTERVAL),
            handle: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// False once stopped, and also once `on_tick` ended the task itself.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Starts ticking. `on_tick` returns `false` to end the timer from inside.
    ///
    /// Returns `false` without doing anything if a timer is already running.
    /// Must be called from within a tokio runtime.
    pub fn start<F>(&mut self, mut on_tick: F) -> bool
    where
        F: FnMut() -> bool + Send + 'static,
    {
        if self.is_running() {
            return false;
        }
        let period = self.interval;
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !on_tick() {
                    break;
                }
            }
        }));
        true
    }

    /// Cancels the timer and clears the handle. Returns whether one was running.
    pub fn stop(&mut self) -> bool {
        match self.handle.take() {
            Some(handle) => {
                let running = !handle.is_finished();
                handle.abort();
                running
            }
            None => false,
        }
    }
}

impl Drop for PollTimer {
    fn drop(&mut self) {
        self.stop();
    }
}
