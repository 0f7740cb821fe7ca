//! HID module - Stream Deck sessions and the key event worker

mod device;
mod reader;
mod session;

pub use device::StreamDeckSession;
pub use reader::spawn_reader;
pub use session::{shared, DeckError, DeckSession, SharedDeck};
