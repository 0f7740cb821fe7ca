//! Deck event worker: turns button-state snapshots into key events

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info};

use super::session::{DeckError, SharedDeck};
use crate::core::events::{diff_key_states, DeckEvent, DeckEventSender};

/// Back-off when the dispatcher holds the deck lock
const LOCK_RETRY: Duration = Duration::from_millis(5);

/// Longest a single poll may hold the deck lock
const POLL_SLICE: Duration = Duration::from_millis(1);

/// Start the reader thread.
///
/// Each poll holds the deck lock for at most [`POLL_SLICE`]. When nothing
/// arrived the thread waits `poll_interval` with the lock released, so uploads
/// never queue behind a poll. It exits when `stop` is set, the dispatcher drops
/// its receiver, or the device fails. A device failure is reported as
/// [`DeckEvent::Disconnected`] first.
pub fn spawn_reader(
    deck: SharedDeck,
    events: DeckEventSender,
    poll_interval: Duration,
    stop: Arc<AtomicBool>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("deck-reader".into())
        .spawn(move || {
            let (serial, key_count) = {
                let guard = deck.lock();
                (guard.serial().to_string(), guard.key_count())
            };
            info!("Deck {} reader started", serial);
            let mut previous = vec![false; usize::from(key_count)];

            while !stop.load(Ordering::Relaxed) && !events.is_closed() {
                let polled = match deck.try_lock() {
                    Some(mut guard) => guard.poll_buttons(POLL_SLICE),
                    None => {
                        thread::sleep(LOCK_RETRY);
                        continue;
                    }
                };

                match polled {
                    Ok(Some(states)) => {
                        for event in diff_key_states(&previous, &states) {
                            if let DeckEvent::KeyChanged { key, pressed } = &event {
                                debug!("Deck {} Key {} = {}", serial, key, pressed);
                            }
                            if events.send(event).is_err() {
                                debug!("Dispatcher gone, stopping reader");
                                return;
                            }
                        }
                        // states may be longer than key_count on decks with extra inputs
                        for (slot, state) in previous.iter_mut().zip(states) {
                            *slot = state;
                        }
                    }
                    Ok(None) => {
                        thread::sleep(poll_interval);
                        continue;
                    }
                    Err(DeckError::Closed) => break,
                    Err(e) => {
                        if !stop.load(Ordering::Relaxed) {
                            error!("Deck {} read failed: {}", serial, e);
                            let _ = events.send(DeckEvent::Disconnected {
                                reason: e.to_string(),
                            });
                        }
                        break;
                    }
                }
                // let the dispatcher in between polls
                thread::yield_now();
            }
            info!("Deck {} reader stopped", serial);
        })
}
