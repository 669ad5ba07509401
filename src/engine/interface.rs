use std::sync::mpsc::Sender;

use crate::types::RepositoryRef;

use super::loader::LoadOutcome;

/// Handle to the background engine held by the UI layer.
///
/// Cheaply cloneable. When the last handle is dropped the sender channel
/// closes, signalling the engine to shut down.
#[derive(Clone)]
pub struct EngineHandle {
    tx: tokio::sync::mpsc::UnboundedSender<Request>,
}

impl EngineHandle {
    pub(super) fn new(tx: tokio::sync::mpsc::UnboundedSender<Request>) -> Self {
        Self { tx }
    }

    /// Send a request to the engine. Non-blocking; returns immediately.
    pub fn send(&self, req: Request) {
        // Ignore errors: if the receiver is gone the engine has already shut down.
        let _ = self.tx.send(req);
    }
}

/// Operations the UI layer can send to the engine.
pub enum Request {
    /// Load every listed repository and reply once all have finished.
    Reload {
        repositories: Vec<RepositoryRef>,
        reply_tx: Sender<Event>,
    },
    Shutdown,
}

/// Replies sent back from the engine.
#[derive(Debug)]
pub enum Event {
    Loaded(LoadOutcome),
    /// Another reload was still running; nothing was fetched.
    ReloadSkipped,
}
