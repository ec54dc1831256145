use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle to one spawned polling loop. At most one exists per poller; the
/// owner swaps it out and cancels it on teardown or room switch.
#[derive(Debug)]
pub(crate) struct PollTimer {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl PollTimer {
    pub(crate) fn new(token: CancellationToken, handle: JoinHandle<()>) -> Self {
        Self { token, handle }
    }

    /// Stops the loop deterministically. The cooperative cancel lets a tick
    /// that is between awaits finish cleanly; the abort covers a loop parked
    /// on its sleep.
    pub(crate) fn cancel(self) {
        self.token.cancel();
        self.handle.abort();
    }
}
