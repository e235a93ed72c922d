use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior, interval};

/// Cancellable one-per-second tick source for an attempt countdown.
///
/// The ticker never touches session state: it only delivers ticks over a
/// channel, and the session owner applies [`AttemptSession::tick`] and
/// reacts to the outcome. That keeps all attempt state single-owner; nothing
/// mutable crosses the task boundary.
///
/// `stop()` is idempotent and must be called from both the zero-time
/// transition and external teardown; dropping the ticker stops it as well,
/// so an abandoned attempt cannot leak the timer task.
///
/// [`AttemptSession::tick`]: crate::attempts::AttemptSession::tick
pub struct AttemptTicker {
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl AttemptTicker {
    /// Spawns the tick task with the standard one-second period.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn start() -> (Self, mpsc::Receiver<()>) {
        Self::with_period(Duration::from_secs(1))
    }

    /// Spawns the tick task with a custom period (shorter in tests).
    #[must_use]
    pub fn with_period(period: Duration) -> (Self, mpsc::Receiver<()>) {
        let (tick_tx, tick_rx) = mpsc::channel(1);
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move {
            let mut timer = interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first interval tick completes immediately; swallow it so
            // the first delivered tick lands one full period after start.
            timer.tick().await;

            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        if tick_tx.send(()).await.is_err() {
                            break;
                        }
                    }
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() || *shutdown_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        (
            Self {
                shutdown: shutdown_tx,
                handle: Some(handle),
            },
            tick_rx,
        )
    }

    /// Stops the tick task. Safe to call any number of times.
    pub fn stop(&mut self) {
        let _ = self.shutdown.send(true);
        self.handle.take();
    }

    /// True once `stop()` has been requested.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.shutdown.borrow()
    }
}

impl Drop for AttemptTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
