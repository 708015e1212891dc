// Dispatcher Lifecycle Signaling

use tokio::sync::watch;

/// Dispatcher lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    /// Constructed, consuming loop not yet running
    Created,
    /// Consuming loop active, submits accepted
    Running,
    /// No new submits accepted, remaining backlog still being drained
    ShuttingDown,
    /// Consuming loop exited
    Stopped,
}

impl std::fmt::Display for DispatcherState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DispatcherState::Created => write!(f, "CREATED"),
            DispatcherState::Running => write!(f, "RUNNING"),
            DispatcherState::ShuttingDown => write!(f, "SHUTTING_DOWN"),
            DispatcherState::Stopped => write!(f, "STOPPED"),
        }
    }
}

/// Observer side of the lifecycle channel
#[derive(Clone)]
pub struct StateToken {
    rx: watch::Receiver<DispatcherState>,
}

impl StateToken {
    /// Most recently published state
    pub fn current(&self) -> DispatcherState {
        *self.rx.borrow()
    }

    /// Wait until the dispatcher reaches the given state
    pub async fn wait_for(&mut self, state: DispatcherState) {
        while *self.rx.borrow() != state {
            if self.rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// Publisher side of the lifecycle channel
pub(crate) struct StatePublisher {
    tx: watch::Sender<DispatcherState>,
}

impl StatePublisher {
    pub(crate) fn publish(&self, state: DispatcherState) {
        let _ = self.tx.send(state);
    }
}

/// Create a lifecycle channel starting in `Created`
pub(crate) fn state_channel() -> (StatePublisher, StateToken) {
    let (tx, rx) = watch::channel(DispatcherState::Created);
    (StatePublisher { tx }, StateToken { rx })
}
