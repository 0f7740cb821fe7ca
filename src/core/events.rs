//! Deck event definitions

use tokio::sync::mpsc;

/// Events emitted by the deck reader worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeckEvent {
    /// A key changed physical state
    KeyChanged { key: u8, pressed: bool },
    /// The device stopped answering; the session cannot continue
    Disconnected { reason: String },
}

/// Sender for deck events - wraps a tokio unbounded channel
#[derive(Clone)]
pub struct DeckEventSender {
    tx: mpsc::UnboundedSender<DeckEvent>,
}

impl DeckEventSender {
    pub fn new(tx: mpsc::UnboundedSender<DeckEvent>) -> Self {
        Self { tx }
    }

    pub fn send(&self, event: DeckEvent) -> Result<(), mpsc::error::SendError<DeckEvent>> {
        self.tx.send(event)
    }

    /// Whether the dispatcher has gone away
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Create a connected sender/receiver pair
pub fn channel() -> (DeckEventSender, mpsc::UnboundedReceiver<DeckEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (DeckEventSender::new(tx), rx)
}

/// Turn two consecutive button-state snapshots into per-key events.
///
/// Keys beyond either snapshot's length are ignored; events come out in
/// ascending key order.
pub fn diff_key_states(previous: &[bool], current: &[bool]) -> Vec<DeckEvent> {
    previous
        .iter()
        .zip(current.iter())
        .enumerate()
        .filter(|(_, (before, after))| before != after)
        .map(|(key, (_, &pressed))| DeckEvent::KeyChanged {
            key: key as u8,
            pressed,
        })
        .collect()
}
