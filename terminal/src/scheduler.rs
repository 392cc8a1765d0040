use common::{ContinuationId, Scheduler};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Runs each delay as a tokio task and delivers the elapsed continuation ids
/// over a channel. The UI loop drains the channel and resumes the engine.
pub struct TokioScheduler {
    runtime: Handle,
    sender: UnboundedSender<ContinuationId>,
}

impl TokioScheduler {
    pub fn new(runtime: Handle) -> (Self, UnboundedReceiver<ContinuationId>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { runtime, sender }, receiver)
    }
}

impl Scheduler for TokioScheduler {
    type Handle = CancellationToken;

    fn schedule(&mut self, id: ContinuationId, delay: Duration) -> CancellationToken {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let sender = self.sender.clone();

        self.runtime.spawn(async move {
            tokio::select! {
                biased;

                _ = cancelled.cancelled() => {
                    debug!(%id, "continuation cancelled");
                }

                _ = tokio::time::sleep(delay) => {
                    if sender.send(id).is_err() {
                        warn!(%id, "continuation fired after the UI loop went away");
                    }
                }
            }
        });

        token
    }

    fn cancel(&mut self, handle: CancellationToken) {
        handle.cancel();
    }
}
