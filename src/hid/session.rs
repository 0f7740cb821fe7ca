//! Device session boundary shared by the reader worker and the view controller

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::render::{KeyImage, KeyShape};

/// Errors from the deck hardware
#[derive(Debug, Error)]
pub enum DeckError {
    #[error("no Stream Deck with a display was found")]
    NotFound,
    #[error("no Stream Deck with serial {0} was found")]
    SerialNotFound(String),
    #[error("HID error: {0}")]
    Hid(String),
    #[error("device I/O failed: {0}")]
    Io(String),
    #[error("device handle is closed")]
    Closed,
}

impl From<hidapi::HidError> for DeckError {
    fn from(err: hidapi::HidError) -> Self {
        DeckError::Hid(err.to_string())
    }
}

/// One opened deck.
///
/// All calls happen under the [`SharedDeck`] lock, so implementations need not
/// synchronize internally.
pub trait DeckSession: Send {
    /// Serial number, used to tag log lines
    fn serial(&self) -> &str;

    fn key_count(&self) -> u8;

    /// Pixel size of one key image
    fn key_shape(&self) -> KeyShape;

    /// Blank every key and restore the device defaults
    fn reset(&mut self) -> Result<(), DeckError>;

    /// Screen brightness in percent, 0-100
    fn set_brightness(&mut self, percent: u8) -> Result<(), DeckError>;

    /// Upload the image for one key
    fn set_key_image(&mut self, key: u8, image: &KeyImage) -> Result<(), DeckError>;

    /// Wait up to `timeout` for input. Returns the state of every key when it
    /// changed, `None` when nothing happened.
    fn poll_buttons(&mut self, timeout: Duration) -> Result<Option<Vec<bool>>, DeckError>;

    /// Release the handle; later calls fail with [`DeckError::Closed`]
    fn close(&mut self);
}

/// Deck handle guarded by the lock that serializes uploads and teardown
pub type SharedDeck = Arc<Mutex<Box<dyn DeckSession>>>;

pub fn shared(session: impl DeckSession + 'static) -> SharedDeck {
    Arc::new(Mutex::new(Box::new(session)))
}
