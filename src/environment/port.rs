use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use super::events::EnvironmentEvent;

/// Host-side source of environment signals, injected into the session.
///
/// The session subscribes once per `start`; a fresh receiver replaces any
/// earlier one.
pub trait EnvironmentPort: Send + Sync {
    fn subscribe(&self) -> mpsc::UnboundedReceiver<EnvironmentEvent>;
}

/// Channel-backed port: the host (or a test) pushes events through an
/// [`EnvironmentHandle`].
#[derive(Clone, Default)]
pub struct ChannelEnvironment {
    sender: Arc<Mutex<Option<mpsc::UnboundedSender<EnvironmentEvent>>>>,
}

impl ChannelEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self) -> EnvironmentHandle {
        EnvironmentHandle {
            sender: Arc::clone(&self.sender),
        }
    }
}

impl EnvironmentPort for ChannelEnvironment {
    fn subscribe(&self) -> mpsc::UnboundedReceiver<EnvironmentEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut guard) = self.sender.lock() {
            *guard = Some(tx);
        }
        rx
    }
}

#[derive(Clone)]
pub struct EnvironmentHandle {
    sender: Arc<Mutex<Option<mpsc::UnboundedSender<EnvironmentEvent>>>>,
}

impl EnvironmentHandle {
    /// Forward an event to the current subscriber. Returns false when nobody
    /// is listening.
    pub fn emit(&self, event: EnvironmentEvent) -> bool {
        let Ok(guard) = self.sender.lock() else {
            return false;
        };
        guard
            .as_ref()
            .map(|tx| tx.send(event).is_ok())
            .unwrap_or(false)
    }
}

/// Port for hosts without environment signals; the stream ends immediately.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedEnvironment;

impl EnvironmentPort for DetachedEnvironment {
    fn subscribe(&self) -> mpsc::UnboundedReceiver<EnvironmentEvent> {
        let (_tx, rx) = mpsc::unbounded_channel();
        rx
    }
}
