//! Cancellable one-shot timers.
//!
//! Cancelling a [`TimerHandle`] prevents its task from starting. A task that
//! has already started is never interrupted by the handle.

use std::fmt;
use std::time::Duration;

use futures_util::future::BoxFuture;

pub trait Scheduler: Send + Sync {
    /// Run `task` once after `delay` unless the returned handle is cancelled first.
    fn schedule(&self, delay: Duration, task: BoxFuture<'static, ()>) -> TimerHandle;
}

pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TimerHandle {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

/// Timers backed by the ambient Tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: BoxFuture<'static, ()>) -> TimerHandle {
        // The deadline is fixed at scheduling time, not when the sleeper is first polled.
        // Only the sleep is abortable; the task runs detached once the deadline passes.
        let deadline = tokio::time::Instant::now() + delay;
        let sleeper = tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            tokio::spawn(task);
        });
        let abort = sleeper.abort_handle();
        TimerHandle::new(move || abort.abort())
    }
}
