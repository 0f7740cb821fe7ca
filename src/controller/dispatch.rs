//! Session runner: reader worker plus a dispatcher thread that owns the view controller

use anyhow::{anyhow, Context, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::view::{Flow, SessionOutcome, ViewController};
use crate::core::events::{self, DeckEvent};
use crate::hid::spawn_reader;

/// Session settings taken from the `[deck]` config section
#[derive(Debug, Clone, Copy)]
pub struct SessionOptions {
    pub brightness: u8,
    pub poll_interval: Duration,
}

/// Paint the deck, then serve key events until the session ends.
///
/// Blocks the calling thread. Key events are handled one at a time on the
/// dispatcher thread, in the order the reader saw them.
pub fn run_session(mut controller: ViewController, options: SessionOptions) -> Result<SessionOutcome> {
    controller.start(options.brightness)?;

    let stop = Arc::new(AtomicBool::new(false));
    let (tx, rx) = events::channel();
    let reader = spawn_reader(controller.deck(), tx, options.poll_interval, Arc::clone(&stop))
        .context("Failed to spawn deck reader")?;

    let dispatcher_stop = Arc::clone(&stop);
    let dispatcher = thread::Builder::new()
        .name("deck-dispatch".into())
        .spawn(move || dispatch(controller, rx, dispatcher_stop))
        .context("Failed to spawn deck dispatcher")?;

    let outcome = dispatcher.join().map_err(|_| {
        stop.store(true, Ordering::Relaxed);
        anyhow!("Deck dispatcher panicked")
    })?;

    if reader.join().is_err() {
        warn!("Deck reader panicked");
    }
    outcome
}

fn dispatch(
    mut controller: ViewController,
    mut rx: mpsc::UnboundedReceiver<DeckEvent>,
    stop: Arc<AtomicBool>,
) -> Result<SessionOutcome> {
    let result = loop {
        let Some(event) = rx.blocking_recv() else {
            break Err(anyhow!("Deck event stream ended"));
        };
        match event {
            DeckEvent::KeyChanged { key, pressed } => match controller.handle_key(key, pressed) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Shutdown(outcome)) => break Ok(outcome),
                Err(e) => break Err(e),
            },
            DeckEvent::Disconnected { reason } => {
                break Err(anyhow!("Deck disconnected: {}", reason));
            }
        }
    };

    stop.store(true, Ordering::Relaxed);
    match &result {
        Ok(outcome) => info!("Session ended: {:?}", outcome),
        Err(e) => {
            error!("Session failed: {:#}", e);
            controller.abandon();
        }
    }
    result
}
