//! Deferred control messages.
//!
//! Connection callbacks and setters don't touch the sensor directly. They
//! enqueue a [`ControlMessage`] which the controller drains on its own
//! thread, at the start of the next poll or via `run_pending`.
//!
//! ```text
//! on_connect / set_hmd ──► ControlHandle ──► mpsc ──► ControlQueue::drain (poll thread)
//! ```

use tokio::sync::mpsc;

use crate::source::ConnectionListener;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    /// Re-apply the policy flags implied by the current settings.
    Configure,
}

/// Cloneable, thread-safe sender for control messages.
#[derive(Debug, Clone)]
pub struct ControlHandle {
    tx: mpsc::UnboundedSender<ControlMessage>,
}

impl ControlHandle {
    /// Request a policy re-application.
    pub fn configure(&self) {
        if self.tx.send(ControlMessage::Configure).is_err() {
            tracing::debug!("Control queue closed, configure request dropped");
        }
    }
}

impl ConnectionListener for ControlHandle {
    fn on_connect(&self) {
        tracing::debug!("Sensor connected, scheduling configure");
        self.configure();
    }
}

/// Receiving end, owned by the controller.
#[derive(Debug)]
pub struct ControlQueue {
    tx: mpsc::UnboundedSender<ControlMessage>,
    rx: mpsc::UnboundedReceiver<ControlMessage>,
}

impl ControlQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    pub fn handle(&self) -> ControlHandle {
        ControlHandle {
            tx: self.tx.clone(),
        }
    }

    /// Take every pending message without blocking.
    ///
    /// Repeated `Configure` requests collapse into one.
    pub fn drain(&mut self) -> Vec<ControlMessage> {
        let mut pending = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            if !pending.contains(&msg) {
                pending.push(msg);
            }
        }
        pending
    }
}

impl Default for ControlQueue {
    fn default() -> Self {
        Self::new()
    }
}
