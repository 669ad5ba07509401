// engine module: background pull request loading

mod interface;
mod loader;
pub mod stub;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc::UnboundedReceiver;

pub use interface::{EngineHandle, Event, Request};
pub use loader::{FetchError, LoadOutcome, PullRequestSource, load_all};
pub use stub::StubSource;

/// Runs reloads on a dedicated OS thread with its own Tokio runtime.
///
/// At most one reload is in flight; a `Reload` arriving while another is
/// running is answered with [`Event::ReloadSkipped`].
pub struct Engine<S> {
    source: Arc<S>,
    current_user_id: Option<String>,
}

impl<S: PullRequestSource> Engine<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Arc::new(source),
            current_user_id: None,
        }
    }

    /// Resolve each loaded PR's `my_vote` for this user.
    pub fn with_current_user(mut self, user_id: Option<String>) -> Self {
        self.current_user_id = user_id;
        self
    }

    pub fn start(self) -> EngineHandle {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<Request>();
        let handle = EngineHandle::new(tx);
        let _ = std::thread::Builder::new()
            .name("pr-engine".to_owned())
            .spawn(move || match tokio::runtime::Runtime::new() {
                Ok(rt) => rt.block_on(self.run_loop(rx)),
                Err(e) => tracing::error!("engine: tokio runtime init failed: {e}"),
            });
        handle
    }

    async fn run_loop(self, mut rx: UnboundedReceiver<Request>) {
        let in_flight = Arc::new(AtomicBool::new(false));
        while let Some(req) = rx.recv().await {
            match req {
                Request::Shutdown => {
                    tracing::debug!("engine: shutting down");
                    break;
                }
                Request::Reload {
                    repositories,
                    reply_tx,
                } => {
                    if in_flight.swap(true, Ordering::AcqRel) {
                        tracing::debug!("engine: reload already in flight");
                        let _ = reply_tx.send(Event::ReloadSkipped);
                        continue;
                    }
                    let source = Arc::clone(&self.source);
                    let in_flight = Arc::clone(&in_flight);
                    let user = self.current_user_id.clone();
                    tokio::spawn(async move {
                        let mut outcome = load_all(source, &repositories).await;
                        if let Some(user) = user {
                            outcome.pull_requests = outcome
                                .pull_requests
                                .into_iter()
                                .map(|pr| pr.resolve_current_user(&user))
                                .collect();
                        }
                        in_flight.store(false, Ordering::Release);
                        let _ = reply_tx.send(Event::Loaded(outcome));
                    });
                }
            }
        }
    }
}
